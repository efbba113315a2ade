//! Compilation Strategy Module
//!
//! - Sequential: `PathProgram::parse` on one `d` string (default)
//! - Parallel: many independent `d` strings across the rayon pool

pub mod parallel;

pub use parallel::{compile_parallel, measure_parallel};
