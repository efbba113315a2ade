//! Dash pattern segmentation
//!
//! `DashFilter` walks one curve by arc length and emits alternating
//! visible/invisible `CurveSegment`s. Every pattern element is one run (the
//! toggle flips per element, not per pair) and the index wraps around the
//! pattern. `DashState` carries a run across curves so a dash can continue
//! around a corner.
//!
//! The pattern is expected to be non-negative; this is not checked.

use crate::curve::{Curve, CurveArena, CurveId, DEFAULT_MAX_ITERATIONS};

/// A parameter range of one curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    pub curve: CurveId,
    pub t0: f64,
    pub t1: f64,
    pub visible: bool,
}

/// Position inside a dash pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashState {
    /// Current pattern element
    pub index: usize,
    /// Length left in the current element
    pub remaining: f64,
    pub visible: bool,
}

impl DashState {
    /// Start of the pattern: first element, visible
    pub fn start(pattern: &[f64]) -> Self {
        DashState {
            index: 0,
            remaining: pattern.first().copied().unwrap_or(0.0),
            visible: true,
        }
    }

    /// State after skipping `offset` units into the pattern (`stroke-dashoffset`).
    ///
    /// Negative offsets count backwards from the end of the pattern.
    pub fn with_offset(pattern: &[f64], offset: f64) -> Self {
        let mut state = Self::start(pattern);
        let period: f64 = pattern.iter().sum();
        if pattern.is_empty() || period <= 0.0 || !offset.is_finite() {
            return state;
        }

        let mut skip = offset.rem_euclid(period);
        while skip > 0.0 {
            if skip < state.remaining {
                state.remaining -= skip;
                break;
            }
            skip -= state.remaining;
            state.advance(pattern);
        }
        state
    }

    /// Move to the next pattern element
    fn advance(&mut self, pattern: &[f64]) {
        self.index = (self.index + 1) % pattern.len();
        self.remaining = pattern[self.index];
        self.visible = !self.visible;
    }
}

/// Iterator over the dash runs of a single curve
pub struct DashFilter<'a> {
    id: CurveId,
    curve: &'a Curve,
    pattern: &'a [f64],
    total: f64,
    position: f64,
    t: f64,
    state: DashState,
    solid: bool,
    done: bool,
}

impl<'a> DashFilter<'a> {
    pub fn new(id: CurveId, curve: &'a Curve, pattern: &'a [f64]) -> Self {
        Self::with_state(id, curve, pattern, DashState::start(pattern))
    }

    /// Resume a pattern from `state`
    pub fn with_state(id: CurveId, curve: &'a Curve, pattern: &'a [f64], state: DashState) -> Self {
        let solid = pattern.is_empty() || pattern.iter().sum::<f64>() <= 0.0;
        DashFilter {
            id,
            curve,
            pattern,
            total: curve.length(),
            position: 0.0,
            t: 0.0,
            state,
            solid,
            done: false,
        }
    }

    /// Pattern state at the current position; after the last segment this is
    /// the state to hand to the next curve.
    pub fn state(&self) -> DashState {
        self.state
    }

    /// Length of the curve being dashed
    pub fn total_length(&self) -> f64 {
        self.total
    }
}

impl Iterator for DashFilter<'_> {
    type Item = CurveSegment;

    fn next(&mut self) -> Option<CurveSegment> {
        if self.done {
            return None;
        }

        if self.solid {
            self.done = true;
            return Some(CurveSegment {
                curve: self.id,
                t0: 0.0,
                t1: 1.0,
                visible: true,
            });
        }

        // zero-length elements produce no geometry, only a toggle
        while self.state.remaining <= 0.0 {
            self.state.advance(self.pattern);
        }

        let left = self.total - self.position;
        if left <= 0.0 {
            self.done = true;
            return None;
        }

        let step = self.state.remaining.min(left);
        let visible = self.state.visible;
        let t0 = self.t;

        if step >= left {
            self.position = self.total;
            self.t = 1.0;
            self.done = true;
        } else {
            self.position += step;
            self.t = self
                .curve
                .find_t_at_length_within(self.position, self.total, DEFAULT_MAX_ITERATIONS);
        }

        self.state.remaining -= step;
        if self.state.remaining <= 0.0 {
            self.state.advance(self.pattern);
        }

        Some(CurveSegment {
            curve: self.id,
            t0,
            t1: self.t,
            visible,
        })
    }
}

/// Dash every contour of an arena.
///
/// The pattern restarts (at `offset`) at the beginning of each contour and
/// runs continuously across the curves inside it.
pub fn dash_contours(arena: &CurveArena, pattern: &[f64], offset: f64) -> Vec<CurveSegment> {
    let mut out = Vec::new();
    for contour in arena.contours() {
        let mut state = DashState::with_offset(pattern, offset);
        for id in contour.ids() {
            let Some(curve) = arena.get(id) else {
                continue;
            };
            let mut filter = DashFilter::with_state(id, curve, pattern, state);
            out.extend(filter.by_ref());
            state = filter.state();
        }
    }
    log::trace!("dashed {} contours into {} segments", arena.contours().len(), out.len());
    out
}
