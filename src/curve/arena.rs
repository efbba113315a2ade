//! Curve storage
//!
//! Curves live in one `Vec` and are referenced by `CurveId` handles, so
//! segments, dash runs and contours can point at a curve without sharing
//! ownership.

use super::{Curve, Point};
use crate::path::{PathOp, PathProgram};
use std::ops::Range;

/// Handle to a curve in a `CurveArena`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurveId(pub u32);

impl CurveId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The curves of one subpath
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub curves: Range<u32>,
    pub closed: bool,
}

impl Contour {
    pub fn ids(&self) -> impl Iterator<Item = CurveId> {
        self.curves.clone().map(CurveId)
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveArena {
    curves: Vec<Curve>,
    contours: Vec<Contour>,
}

impl CurveArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a curve and return its handle
    pub fn push(&mut self, curve: Curve) -> CurveId {
        let id = CurveId(self.curves.len() as u32);
        self.curves.push(curve);
        id
    }

    pub fn get(&self, id: CurveId) -> Option<&Curve> {
        self.curves.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CurveId, &Curve)> + '_ {
        self.curves
            .iter()
            .enumerate()
            .map(|(i, curve)| (CurveId(i as u32), curve))
    }

    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Sum of curve lengths with `steps` samples each
    pub fn total_length(&self, steps: usize) -> f64 {
        self.curves.iter().map(|c| c.compute_length(steps)).sum()
    }

    /// Convert a program to curves, one contour per subpath.
    ///
    /// `Close` adds a closing line when the pen is away from the subpath
    /// start. Degenerate arcs (coincident endpoints) are dropped.
    pub fn from_program(program: &PathProgram) -> Self {
        let mut builder = ContourBuilder::default();
        for op in program {
            builder.op(op);
        }
        builder.finish()
    }
}

impl std::ops::Index<CurveId> for CurveArena {
    type Output = Curve;

    fn index(&self, id: CurveId) -> &Curve {
        &self.curves[id.index()]
    }
}

#[derive(Default)]
struct ContourBuilder {
    arena: CurveArena,
    current: Point,
    start: Point,
    open: Option<u32>,
}

impl ContourBuilder {
    fn begin(&mut self) {
        if self.open.is_none() {
            self.open = Some(self.arena.curves.len() as u32);
        }
    }

    fn end_contour(&mut self, closed: bool) {
        if let Some(first) = self.open.take() {
            let last = self.arena.curves.len() as u32;
            if last > first {
                self.arena.contours.push(Contour {
                    curves: first..last,
                    closed,
                });
            }
        }
    }

    fn draw(&mut self, curve: Curve) {
        self.begin();
        self.current = curve.end();
        self.arena.push(curve);
    }

    fn op(&mut self, op: &PathOp) {
        let from = self.current;
        match *op {
            PathOp::MoveTo { x, y } => {
                self.end_contour(false);
                self.current = Point::new(x, y);
                self.start = self.current;
                self.begin();
            }
            PathOp::LineTo { x, y } => self.draw(Curve::line(from, Point::new(x, y))),
            PathOp::QuadTo { x1, y1, x, y } => {
                self.draw(Curve::quadratic(from, Point::new(x1, y1), Point::new(x, y)))
            }
            PathOp::CubicTo { x1, y1, x2, y2, x, y } => self.draw(Curve::cubic(
                from,
                Point::new(x1, y1),
                Point::new(x2, y2),
                Point::new(x, y),
            )),
            PathOp::ArcTo {
                rx,
                ry,
                x_axis_rotation,
                large_arc,
                sweep,
                x,
                y,
            } => {
                let to = Point::new(x, y);
                match Curve::from_svg_arc(from, (rx, ry), x_axis_rotation, large_arc, sweep, to) {
                    Some(curve) => self.draw(curve),
                    None => log::trace!("omitting arc with coincident endpoints at ({x}, {y})"),
                }
            }
            PathOp::Close => {
                if self.current != self.start {
                    self.draw(Curve::line(self.current, self.start));
                }
                self.end_contour(true);
                self.current = self.start;
            }
            PathOp::End => self.end_contour(false),
        }
    }

    fn finish(mut self) -> CurveArena {
        self.end_contour(false);
        log::trace!(
            "built {} curves in {} contours",
            self.arena.len(),
            self.arena.contours.len()
        );
        self.arena
    }
}
