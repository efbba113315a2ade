//! Parametric curves
//!
//! `Curve` is a closed set of segment types evaluated on `t` in `[0, 1]`.
//! Arc length is approximated by chord sums over an evenly spaced sample grid
//! (exact for lines), and inverted by binary search.

pub mod arc;
pub mod arena;
pub mod point;

pub use arc::{ArcParameterization, EllipticalArc};
pub use arena::{Contour, CurveArena, CurveId};
pub use point::Point;

/// Samples used for arc-length approximation
pub const DEFAULT_LENGTH_STEPS: usize = 64;

/// Binary search budget for `find_t_at_length`
pub const DEFAULT_MAX_ITERATIONS: usize = 32;

/// Arc-length tolerance for `find_t_at_length`
pub const LENGTH_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    Line { p0: Point, p1: Point },
    Quadratic { p0: Point, p1: Point, p2: Point },
    Cubic { p0: Point, p1: Point, p2: Point, p3: Point },
    Arc(EllipticalArc),
}

impl Curve {
    pub fn line(p0: Point, p1: Point) -> Self {
        Curve::Line { p0, p1 }
    }

    pub fn quadratic(p0: Point, p1: Point, p2: Point) -> Self {
        Curve::Quadratic { p0, p1, p2 }
    }

    pub fn cubic(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Curve::Cubic { p0, p1, p2, p3 }
    }

    /// Curve for an SVG arc command.
    ///
    /// A zero radius gives a straight line; coincident endpoints give `None`.
    pub fn from_svg_arc(
        from: Point,
        radii: (f64, f64),
        x_axis_rotation_deg: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    ) -> Option<Self> {
        match EllipticalArc::from_endpoints(from, radii, x_axis_rotation_deg, large_arc, sweep, to) {
            ArcParameterization::Center(arc) => Some(Curve::Arc(arc)),
            ArcParameterization::LineTo => Some(Curve::line(from, to)),
            ArcParameterization::Omit => None,
        }
    }

    pub fn start(&self) -> Point {
        match *self {
            Curve::Line { p0, .. } | Curve::Quadratic { p0, .. } | Curve::Cubic { p0, .. } => p0,
            Curve::Arc(ref arc) => arc.from,
        }
    }

    pub fn end(&self) -> Point {
        match *self {
            Curve::Line { p1, .. } => p1,
            Curve::Quadratic { p2, .. } => p2,
            Curve::Cubic { p3, .. } => p3,
            Curve::Arc(ref arc) => arc.to,
        }
    }

    /// Position at `t`
    pub fn eval(&self, t: f64) -> Point {
        match *self {
            Curve::Line { p0, p1 } => p0.lerp(p1, t),
            Curve::Quadratic { p0, p1, p2 } => {
                let mt = 1.0 - t;
                p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t)
            }
            Curve::Cubic { p0, p1, p2, p3 } => {
                let mt = 1.0 - t;
                p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
            }
            Curve::Arc(ref arc) => arc.eval(t),
        }
    }

    /// Derivative with respect to `t` (not normalized)
    pub fn eval_tangent(&self, t: f64) -> Point {
        match *self {
            Curve::Line { p0, p1 } => p1 - p0,
            Curve::Quadratic { p0, p1, p2 } => (p1 - p0) * (2.0 * (1.0 - t)) + (p2 - p1) * (2.0 * t),
            Curve::Cubic { p0, p1, p2, p3 } => {
                let mt = 1.0 - t;
                (p1 - p0) * (3.0 * mt * mt) + (p2 - p1) * (6.0 * mt * t) + (p3 - p2) * (3.0 * t * t)
            }
            Curve::Arc(ref arc) => arc.eval_tangent(t),
        }
    }

    /// Unit normal: the normalized tangent rotated +90 degrees
    pub fn eval_normal(&self, t: f64) -> Point {
        self.eval_tangent(t).normalize().perp()
    }

    #[inline]
    fn sample(&self, i: usize, steps: usize) -> Point {
        self.eval(i as f64 / steps as f64)
    }

    /// Polyline length over `steps` evenly spaced samples
    pub fn compute_length(&self, steps: usize) -> f64 {
        if let Curve::Line { p0, p1 } = *self {
            return p0.distance(p1);
        }
        let steps = steps.max(1);
        let mut length = 0.0;
        let mut prev = self.sample(0, steps);
        for i in 1..=steps {
            let next = self.sample(i, steps);
            length += prev.distance(next);
            prev = next;
        }
        length
    }

    /// Arc length from 0 to `t` on the same sample grid as `compute_length`.
    ///
    /// Linear inside the last interval, so the result is non-decreasing in `t`
    /// and `length_to(1.0, n) == compute_length(n)`.
    pub fn length_to(&self, t: f64, steps: usize) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if let Curve::Line { p0, p1 } = *self {
            return p0.distance(p1) * t;
        }
        let steps = steps.max(1);
        let pos = t * steps as f64;
        let whole = (pos.floor() as usize).min(steps);

        let mut length = 0.0;
        let mut prev = self.sample(0, steps);
        for i in 1..=whole {
            let next = self.sample(i, steps);
            length += prev.distance(next);
            prev = next;
        }
        if whole < steps {
            let frac = pos - whole as f64;
            if frac > 0.0 {
                length += prev.distance(self.sample(whole + 1, steps)) * frac;
            }
        }
        length
    }

    /// Arc length between two parameters
    pub fn length_between(&self, t0: f64, t1: f64) -> f64 {
        let a = self.length_to(t0, DEFAULT_LENGTH_STEPS);
        let b = self.length_to(t1, DEFAULT_LENGTH_STEPS);
        (b - a).abs()
    }

    /// Parameter at which the arc length from the start reaches `length`.
    ///
    /// Clamped: 0 for `length <= 0`, 1 at or past the total length.
    pub fn find_t_at_length(&self, length: f64, max_iterations: usize) -> f64 {
        self.find_t_at_length_within(length, self.length(), max_iterations)
    }

    /// `find_t_at_length` against an already measured `total`
    pub fn find_t_at_length_within(&self, length: f64, total: f64, max_iterations: usize) -> f64 {
        if length <= 0.0 || total <= 0.0 {
            return 0.0;
        }
        if length >= total {
            return 1.0;
        }
        if let Curve::Line { .. } = self {
            return length / total;
        }

        let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
        for _ in 0..max_iterations {
            let mid = 0.5 * (lo + hi);
            let at = self.length_to(mid, DEFAULT_LENGTH_STEPS);
            if (at - length).abs() < LENGTH_TOLERANCE {
                return mid;
            }
            if at < length {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        0.5 * (lo + hi)
    }

    /// Total length with the default sample count
    pub fn length(&self) -> f64 {
        self.compute_length(DEFAULT_LENGTH_STEPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn quad() -> Curve {
        Curve::quadratic(Point::new(0.0, 0.0), Point::new(50.0, 100.0), Point::new(100.0, 0.0))
    }

    fn cubic() -> Curve {
        Curve::cubic(
            Point::new(0.0, 0.0),
            Point::new(0.0, 40.0),
            Point::new(60.0, 40.0),
            Point::new(60.0, 0.0),
        )
    }

    fn arc() -> Curve {
        Curve::from_svg_arc(Point::new(0.0, 0.0), (30.0, 15.0), 30.0, true, false, Point::new(40.0, 10.0))
            .unwrap()
    }

    #[test]
    fn test_line_is_exact() {
        let line = Curve::line(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert_eq!(line.compute_length(1), 5.0);
        assert_eq!(line.compute_length(64), 5.0);
        assert_eq!(line.length_to(0.5, 64), 2.5);
        assert_eq!(line.find_t_at_length(2.5, DEFAULT_MAX_ITERATIONS), 0.5);
        assert_eq!(line.eval(0.5), Point::new(1.5, 2.0));
    }

    #[test]
    fn test_endpoints() {
        for curve in [quad(), cubic()] {
            assert_eq!(curve.eval(0.0), curve.start());
            assert_eq!(curve.eval(1.0), curve.end());
        }
    }

    #[test]
    fn test_tangent_and_normal() {
        let c = cubic();
        assert_eq!(c.eval_tangent(0.0), Point::new(0.0, 120.0));
        assert!(c.eval_normal(0.0).approx_eq(Point::new(-1.0, 0.0), 1e-12));
        let q = quad();
        assert_eq!(q.eval_tangent(0.5), Point::new(100.0, 0.0));
        assert!(q.eval_normal(0.5).approx_eq(Point::new(0.0, 1.0), 1e-12));
    }

    #[test]
    fn test_find_t_clamps() {
        for curve in [quad(), cubic(), arc()] {
            assert_eq!(curve.find_t_at_length(-1.0, DEFAULT_MAX_ITERATIONS), 0.0);
            assert_eq!(curve.find_t_at_length(0.0, DEFAULT_MAX_ITERATIONS), 0.0);
            let total = curve.length();
            assert_eq!(curve.find_t_at_length(total, DEFAULT_MAX_ITERATIONS), 1.0);
            assert_eq!(curve.find_t_at_length(total * 2.0, DEFAULT_MAX_ITERATIONS), 1.0);
        }
    }

    #[test]
    fn test_find_t_is_monotonic() {
        for curve in [cubic(), arc()] {
            let total = curve.length();
            let mut last = 0.0;
            for i in 0..=200 {
                let t = curve.find_t_at_length(total * i as f64 / 200.0, DEFAULT_MAX_ITERATIONS);
                assert!(t >= last, "t went backwards at sample {i}: {t} < {last}");
                assert!((0.0..=1.0).contains(&t));
                last = t;
            }
        }
    }

    #[test]
    fn test_find_t_with_known_total() {
        for curve in [quad(), cubic(), arc()] {
            let total = curve.length();
            for fraction in [0.1, 0.5, 0.9] {
                let length = total * fraction;
                assert_eq!(
                    curve.find_t_at_length_within(length, total, DEFAULT_MAX_ITERATIONS),
                    curve.find_t_at_length(length, DEFAULT_MAX_ITERATIONS)
                );
            }
        }
    }

    #[test]
    fn test_find_t_inverts_length_to() {
        let curve = quad();
        let total = curve.length();
        let t = curve.find_t_at_length(total * 0.3, DEFAULT_MAX_ITERATIONS);
        let at = curve.length_to(t, DEFAULT_LENGTH_STEPS);
        assert!((at - total * 0.3).abs() < 1e-3);
    }

    #[test]
    fn test_length_to_matches_total() {
        for curve in [quad(), cubic()] {
            assert_eq!(curve.length_to(1.0, 64), curve.compute_length(64));
            assert_eq!(curve.length_to(0.0, 64), 0.0);
            let mut last = 0.0;
            for i in 0..=100 {
                let l = curve.length_to(i as f64 / 100.0, 64);
                assert!(l >= last);
                last = l;
            }
        }
    }

    #[test]
    fn test_symmetric_quad_midpoint() {
        let curve = quad();
        let t = curve.find_t_at_length(curve.length() / 2.0, DEFAULT_MAX_ITERATIONS);
        assert!((t - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_arc_length() {
        let arc = Curve::from_svg_arc(Point::new(0.0, 0.0), (5.0, 5.0), 0.0, false, true, Point::new(10.0, 0.0))
            .unwrap();
        assert!((arc.length() - 5.0 * PI).abs() < 1e-2);
        assert!(arc.eval(0.5).approx_eq(Point::new(5.0, -5.0), 1e-9));
    }

    #[test]
    fn test_degenerate_arc() {
        let p = Point::new(1.0, 1.0);
        assert_eq!(Curve::from_svg_arc(p, (5.0, 5.0), 0.0, false, true, p), None);
        assert_eq!(
            Curve::from_svg_arc(Point::ZERO, (0.0, 0.0), 0.0, false, true, p),
            Some(Curve::line(Point::ZERO, p))
        );
    }

    #[test]
    fn test_length_between() {
        let curve = cubic();
        let whole = curve.length_between(0.0, 1.0);
        let parts = curve.length_between(0.0, 0.4) + curve.length_between(0.4, 1.0);
        assert!((whole - parts).abs() < 1e-9);
    }
}
