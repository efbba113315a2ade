//! Path programs - canonical drawing operations
//!
//! A `Normalizer` turns raw segments into absolute `MoveTo / LineTo / QuadTo /
//! CubicTo / ArcTo / Close` ops, ending with `End`:
//! - relative coordinates are resolved against the current point
//! - `H`/`V` become `LineTo`
//! - `S`/`T` get their first control point by reflection
//! - repeated `M` groups become `LineTo`
//! - after `Z`, drawing resumes from the subpath start (see `ClosePolicy`)

use super::command::PathCommand;
use super::segment::{PathSegment, SegmentReader};
use crate::curve::Point;
use crate::error::PathError;

/// One canonical drawing operation, absolute coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    QuadTo { x1: f64, y1: f64, x: f64, y: f64 },
    CubicTo { x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64 },
    ArcTo {
        rx: f64,
        ry: f64,
        /// Degrees
        x_axis_rotation: f64,
        large_arc: bool,
        sweep: bool,
        x: f64,
        y: f64,
    },
    Close,
    End,
}

/// Op tag, with the length of the op's flat float layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    MoveTo,
    LineTo,
    QuadTo,
    CubicTo,
    ArcTo,
    Close,
    End,
}

impl OpCode {
    pub const fn arity(self) -> usize {
        match self {
            OpCode::MoveTo | OpCode::LineTo => 2,
            OpCode::QuadTo => 4,
            OpCode::CubicTo => 6,
            OpCode::ArcTo => 7,
            OpCode::Close | OpCode::End => 0,
        }
    }
}

impl PathOp {
    pub fn code(&self) -> OpCode {
        match self {
            PathOp::MoveTo { .. } => OpCode::MoveTo,
            PathOp::LineTo { .. } => OpCode::LineTo,
            PathOp::QuadTo { .. } => OpCode::QuadTo,
            PathOp::CubicTo { .. } => OpCode::CubicTo,
            PathOp::ArcTo { .. } => OpCode::ArcTo,
            PathOp::Close => OpCode::Close,
            PathOp::End => OpCode::End,
        }
    }

    /// Flat float arguments; the first `code().arity()` entries are meaningful.
    /// Arc flags are stored as 0.0 / 1.0.
    pub fn args(&self) -> [f64; 7] {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match *self {
            PathOp::MoveTo { x, y } | PathOp::LineTo { x, y } => [x, y, 0.0, 0.0, 0.0, 0.0, 0.0],
            PathOp::QuadTo { x1, y1, x, y } => [x1, y1, x, y, 0.0, 0.0, 0.0],
            PathOp::CubicTo { x1, y1, x2, y2, x, y } => [x1, y1, x2, y2, x, y, 0.0],
            PathOp::ArcTo {
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => [rx, ry, x_axis_rotation, flag(large_arc), flag(sweep), x, y],
            PathOp::Close | PathOp::End => [0.0; 7],
        }
    }

    /// End point, for ops that move the pen
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathOp::MoveTo { x, y }
            | PathOp::LineTo { x, y }
            | PathOp::QuadTo { x, y, .. }
            | PathOp::CubicTo { x, y, .. }
            | PathOp::ArcTo { x, y, .. } => Some(Point::new(x, y)),
            PathOp::Close | PathOp::End => None,
        }
    }
}

/// What happens when drawing resumes after a `Close`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClosePolicy {
    /// Emit `MoveTo(current point)` before the next drawing op
    #[default]
    ReinjectMoveTo,
    /// Leave the moveto implicit
    Implicit,
}

/// Normalizer options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    pub close_policy: ClosePolicy,
}

/// Iterator adaptor from raw segments to canonical ops
pub struct Normalizer<I> {
    segments: I,
    options: BuildOptions,
    current: Point,
    start: Point,
    /// Second control point of the previous C/S, absolute
    previous_cubic: Option<Point>,
    /// Control point of the previous Q/T, absolute
    previous_quad: Option<Point>,
    needs_move: bool,
    pending: Option<PathOp>,
    finished: bool,
}

impl<I: Iterator<Item = PathSegment>> Normalizer<I> {
    pub fn new(segments: I) -> Self {
        Self::with_options(segments, BuildOptions::default())
    }

    pub fn with_options(segments: I, options: BuildOptions) -> Self {
        Normalizer {
            segments,
            options,
            current: Point::ZERO,
            start: Point::ZERO,
            previous_cubic: None,
            previous_quad: None,
            needs_move: true,
            pending: None,
            finished: false,
        }
    }

    /// Current point after the ops emitted so far
    pub fn current_point(&self) -> Point {
        self.current
    }

    fn point(&self, seg: &PathSegment, i: usize) -> Point {
        let p = Point::new(seg.arg(i), seg.arg(i + 1));
        if seg.command.is_relative() {
            self.current + p
        } else {
            p
        }
    }

    fn smooth_cubic_ctrl1(&self) -> Point {
        match self.previous_cubic {
            Some(ctrl2) => ctrl2.reflect(self.current),
            None => self.current,
        }
    }

    fn smooth_quad_ctrl(&self) -> Point {
        match self.previous_quad {
            Some(ctrl) => ctrl.reflect(self.current),
            None => self.current,
        }
    }

    fn normalize(&mut self, seg: &PathSegment) -> PathOp {
        use PathCommand as C;

        let absolute = seg.command.to_absolute();
        let mut cubic = None;
        let mut quad = None;

        let op = match absolute {
            C::MoveTo if seg.iteration == 0 => {
                let p = self.point(seg, 0);
                self.start = p;
                self.needs_move = false;
                PathOp::MoveTo { x: p.x, y: p.y }
            }
            C::MoveTo | C::LineTo => {
                let p = self.point(seg, 0);
                PathOp::LineTo { x: p.x, y: p.y }
            }
            C::Horizontal => {
                let x = if seg.command.is_relative() {
                    self.current.x + seg.arg(0)
                } else {
                    seg.arg(0)
                };
                PathOp::LineTo { x, y: self.current.y }
            }
            C::Vertical => {
                let y = if seg.command.is_relative() {
                    self.current.y + seg.arg(0)
                } else {
                    seg.arg(0)
                };
                PathOp::LineTo { x: self.current.x, y }
            }
            C::CubicTo | C::SmoothCubicTo => {
                let (ctrl1, ctrl2, to) = if absolute == C::CubicTo {
                    (self.point(seg, 0), self.point(seg, 2), self.point(seg, 4))
                } else {
                    (self.smooth_cubic_ctrl1(), self.point(seg, 0), self.point(seg, 2))
                };
                cubic = Some(ctrl2);
                PathOp::CubicTo {
                    x1: ctrl1.x,
                    y1: ctrl1.y,
                    x2: ctrl2.x,
                    y2: ctrl2.y,
                    x: to.x,
                    y: to.y,
                }
            }
            C::QuadTo | C::SmoothQuadTo => {
                let (ctrl, to) = if absolute == C::QuadTo {
                    (self.point(seg, 0), self.point(seg, 2))
                } else {
                    (self.smooth_quad_ctrl(), self.point(seg, 0))
                };
                quad = Some(ctrl);
                PathOp::QuadTo {
                    x1: ctrl.x,
                    y1: ctrl.y,
                    x: to.x,
                    y: to.y,
                }
            }
            C::ArcTo => {
                let to = self.point(seg, 5);
                PathOp::ArcTo {
                    rx: seg.arg(0),
                    ry: seg.arg(1),
                    x_axis_rotation: seg.arg(2),
                    large_arc: seg.arg(3) != 0.0,
                    sweep: seg.arg(4) != 0.0,
                    x: to.x,
                    y: to.y,
                }
            }
            _ => {
                self.current = self.start;
                self.needs_move = true;
                PathOp::Close
            }
        };

        self.previous_cubic = cubic;
        self.previous_quad = quad;
        if let Some(p) = op.end_point() {
            self.current = p;
        }
        op
    }
}

impl<I: Iterator<Item = PathSegment>> Iterator for Normalizer<I> {
    type Item = PathOp;

    fn next(&mut self) -> Option<PathOp> {
        if let Some(op) = self.pending.take() {
            return Some(op);
        }
        if self.finished {
            return None;
        }

        let Some(seg) = self.segments.next() else {
            self.finished = true;
            return Some(PathOp::End);
        };

        let resumes_drawing = self.needs_move && !seg.command.is_move() && !seg.command.is_close();
        if resumes_drawing {
            // the subpath restarts at the current point either way
            self.start = self.current;
            self.needs_move = false;
            if self.options.close_policy == ClosePolicy::ReinjectMoveTo {
                log::trace!(
                    "re-injecting moveto ({}, {}) before '{}'",
                    self.current.x,
                    self.current.y,
                    seg.command
                );
                let resume = PathOp::MoveTo {
                    x: self.current.x,
                    y: self.current.y,
                };
                self.pending = Some(self.normalize(&seg));
                return Some(resume);
            }
        }

        Some(self.normalize(&seg))
    }
}

/// A normalized path, always terminated by `PathOp::End`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathProgram {
    ops: Vec<PathOp>,
}

impl PathProgram {
    /// Parse path data, failing on the first malformed segment
    pub fn parse(d: &[u8]) -> Result<Self, PathError> {
        Self::parse_with(d, BuildOptions::default())
    }

    pub fn parse_with(d: &[u8], options: BuildOptions) -> Result<Self, PathError> {
        let mut reader = SegmentReader::new(d);
        let ops: Vec<PathOp> = Normalizer::with_options(&mut reader, options).collect();
        match reader.into_error() {
            Some(e) => Err(e),
            None => Ok(PathProgram { ops }),
        }
    }

    /// Parse path data, keeping everything before the first error.
    ///
    /// This is the SVG "render up to the first error" rule.
    pub fn parse_lenient(d: &[u8]) -> Self {
        Self::parse_lenient_with(d, BuildOptions::default())
    }

    pub fn parse_lenient_with(d: &[u8], options: BuildOptions) -> Self {
        let reader = SegmentReader::new(d);
        PathProgram {
            ops: Normalizer::with_options(reader, options).collect(),
        }
    }

    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathOp> {
        self.ops.iter()
    }

    /// Number of ops, including the trailing `End`
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True when the program draws nothing (only `End`)
    pub fn is_empty(&self) -> bool {
        self.ops.iter().all(|op| *op == PathOp::End)
    }

    /// Op codes in order
    pub fn opcodes(&self) -> impl Iterator<Item = OpCode> + '_ {
        self.ops.iter().map(PathOp::code)
    }

    /// Every op's arguments, concatenated in the fixed per-op layout
    pub fn flat_args(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.ops.len() * 2);
        for op in &self.ops {
            out.extend_from_slice(&op.args()[..op.code().arity()]);
        }
        out
    }
}

impl<'p> IntoIterator for &'p PathProgram {
    type Item = &'p PathOp;
    type IntoIter = std::slice::Iter<'p, PathOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
