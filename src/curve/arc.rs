//! Elliptical arcs in center parameterization
//!
//! SVG describes arcs by their endpoints; evaluation needs the center form.
//! The conversion follows SVG 2 appendix B.2.4.

use super::point::Point;
use std::f64::consts::PI;

/// Result of converting an endpoint arc
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcParameterization {
    /// Center, radii and angles, ready to evaluate
    Center(EllipticalArc),
    /// A radius is zero: the arc is a straight line between the endpoints
    LineTo,
    /// The endpoints coincide: the arc is omitted
    Omit,
}

/// An arc of an ellipse, `theta` in `theta1 .. theta1 + delta_theta`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticalArc {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    /// x-axis rotation, radians
    pub phi: f64,
    pub theta1: f64,
    pub delta_theta: f64,
    pub from: Point,
    pub to: Point,
}

impl EllipticalArc {
    /// Endpoint-to-center conversion
    pub fn from_endpoints(
        from: Point,
        radii: (f64, f64),
        x_axis_rotation_deg: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    ) -> ArcParameterization {
        if from == to {
            return ArcParameterization::Omit;
        }

        let (mut rx, mut ry) = radii;
        if rx * rx < f64::EPSILON || ry * ry < f64::EPSILON {
            return ArcParameterization::LineTo;
        }
        rx = rx.abs();
        ry = ry.abs();

        let phi = x_axis_rotation_deg.to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        // midpoint frame, rotated onto the ellipse axes
        let mid_x = (from.x - to.x) / 2.0;
        let mid_y = (from.y - to.y) / 2.0;
        let x1_ = cos_phi * mid_x + sin_phi * mid_y;
        let y1_ = -sin_phi * mid_x + cos_phi * mid_y;

        let lambda = (x1_ / rx).powi(2) + (y1_ / ry).powi(2);
        if lambda > 1.0 {
            rx *= lambda.sqrt();
            ry *= lambda.sqrt();
        }

        let d = (rx * y1_).powi(2) + (ry * x1_).powi(2);
        if d == 0.0 {
            return ArcParameterization::Omit;
        }
        let mut k = ((rx * ry).powi(2) / d - 1.0).abs().sqrt();
        if sweep == large_arc {
            k = -k;
        }
        let cx_ = k * rx * y1_ / ry;
        let cy_ = -k * ry * x1_ / rx;

        let center = Point::new(
            cos_phi * cx_ - sin_phi * cy_ + (from.x + to.x) / 2.0,
            sin_phi * cx_ + cos_phi * cy_ + (from.y + to.y) / 2.0,
        );

        let ux = (x1_ - cx_) / rx;
        let uy = (y1_ - cy_) / ry;
        let u_len = ux.hypot(uy);
        if u_len == 0.0 {
            return ArcParameterization::Omit;
        }
        let mut theta1 = (ux / u_len).clamp(-1.0, 1.0).acos();
        if uy < 0.0 {
            theta1 = -theta1;
        }

        let vx = (-x1_ - cx_) / rx;
        let vy = (-y1_ - cy_) / ry;
        let v_len = vx.hypot(vy);
        if v_len == 0.0 {
            return ArcParameterization::Omit;
        }
        let cos_delta = ((ux * vx + uy * vy) / (u_len * v_len)).clamp(-1.0, 1.0);
        let mut delta_theta = cos_delta.acos();
        if ux * vy - uy * vx < 0.0 {
            delta_theta = -delta_theta;
        }
        if sweep && delta_theta < 0.0 {
            delta_theta += 2.0 * PI;
        } else if !sweep && delta_theta > 0.0 {
            delta_theta -= 2.0 * PI;
        }

        ArcParameterization::Center(EllipticalArc {
            center,
            rx,
            ry,
            phi,
            theta1,
            delta_theta,
            from,
            to,
        })
    }

    #[inline]
    fn angle(&self, t: f64) -> f64 {
        self.theta1 + t * self.delta_theta
    }

    /// Ellipse-frame vector rotated by `phi`
    #[inline]
    fn rotate(&self, v: Point) -> Point {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        Point::new(cos_phi * v.x - sin_phi * v.y, sin_phi * v.x + cos_phi * v.y)
    }

    pub fn eval(&self, t: f64) -> Point {
        if t <= 0.0 {
            return self.from;
        }
        if t >= 1.0 {
            return self.to;
        }
        let (sin, cos) = self.angle(t).sin_cos();
        self.center + self.rotate(Point::new(self.rx * cos, self.ry * sin))
    }

    pub fn eval_tangent(&self, t: f64) -> Point {
        let (sin, cos) = self.angle(t).sin_cos();
        self.rotate(Point::new(-self.rx * sin, self.ry * cos)) * self.delta_theta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center_form(param: ArcParameterization) -> EllipticalArc {
        match param {
            ArcParameterization::Center(arc) => arc,
            other => panic!("expected a center parameterization, got {other:?}"),
        }
    }

    #[test]
    fn test_half_circle() {
        let arc = center_form(EllipticalArc::from_endpoints(
            Point::new(0.0, 0.0),
            (5.0, 5.0),
            0.0,
            false,
            true,
            Point::new(10.0, 0.0),
        ));
        assert!(arc.center.approx_eq(Point::new(5.0, 0.0), 1e-9));
        assert!((arc.theta1 - PI).abs() < 1e-9);
        assert!((arc.delta_theta - PI).abs() < 1e-9);
        assert!(arc.eval(0.5).approx_eq(Point::new(5.0, -5.0), 1e-9));
    }

    #[test]
    fn test_sweep_flag_flips_side() {
        let arc = center_form(EllipticalArc::from_endpoints(
            Point::new(0.0, 0.0),
            (5.0, 5.0),
            0.0,
            false,
            false,
            Point::new(10.0, 0.0),
        ));
        assert!(arc.delta_theta < 0.0);
        assert!(arc.eval(0.5).approx_eq(Point::new(5.0, 5.0), 1e-9));
    }

    #[test]
    fn test_large_arc_center_sign() {
        // quarter circle radius 10 between (10,0) and (0,10)
        let small = center_form(EllipticalArc::from_endpoints(
            Point::new(10.0, 0.0),
            (10.0, 10.0),
            0.0,
            false,
            true,
            Point::new(0.0, 10.0),
        ));
        let large = center_form(EllipticalArc::from_endpoints(
            Point::new(10.0, 0.0),
            (10.0, 10.0),
            0.0,
            true,
            true,
            Point::new(0.0, 10.0),
        ));
        assert!(small.center.approx_eq(Point::new(0.0, 0.0), 1e-9));
        assert!(large.center.approx_eq(Point::new(10.0, 10.0), 1e-9));
        assert!((small.delta_theta - PI / 2.0).abs() < 1e-9);
        assert!((large.delta_theta - 3.0 * PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_radii_scaled_up() {
        let arc = center_form(EllipticalArc::from_endpoints(
            Point::new(0.0, 0.0),
            (1.0, 1.0),
            0.0,
            false,
            true,
            Point::new(10.0, 0.0),
        ));
        assert!((arc.rx - 5.0).abs() < 1e-9);
        assert!((arc.ry - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_cases() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(
            EllipticalArc::from_endpoints(p, (5.0, 5.0), 0.0, false, true, p),
            ArcParameterization::Omit
        );
        assert_eq!(
            EllipticalArc::from_endpoints(Point::ZERO, (0.0, 5.0), 0.0, false, true, p),
            ArcParameterization::LineTo
        );
    }

    #[test]
    fn test_rotated_endpoints_are_exact() {
        let from = Point::new(1.0, 2.0);
        let to = Point::new(7.0, -3.0);
        let arc = center_form(EllipticalArc::from_endpoints(from, (8.0, 3.0), 30.0, true, false, to));
        assert_eq!(arc.eval(0.0), from);
        assert_eq!(arc.eval(1.0), to);
        // interior points stay on the ellipse and near the endpoints at the ends
        assert!(arc.eval(1e-9).approx_eq(from, 1e-6));
        assert!(arc.eval(1.0 - 1e-9).approx_eq(to, 1e-6));
    }
}
