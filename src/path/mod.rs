//! SVG path data
//!
//! `d` attribute text flows through two pull stages:
//! - `SegmentReader`: command letters and argument groups, implicit repetition
//! - `Normalizer`: canonical absolute ops collected into a `PathProgram`

pub mod command;
pub mod program;
pub mod segment;

pub use command::PathCommand;
pub use program::{BuildOptions, ClosePolicy, Normalizer, OpCode, PathOp, PathProgram};
pub use segment::{PathSegment, SegmentReader};
