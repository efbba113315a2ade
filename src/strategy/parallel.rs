//! Parallel path compilation
//!
//! Uses Rayon across independent paths. Each path still runs through its own
//! single-threaded pipeline; results keep input order.

use rayon::prelude::*;

use crate::curve::{CurveArena, DEFAULT_LENGTH_STEPS};
use crate::error::PathError;
use crate::path::{BuildOptions, PathOp, PathProgram};

/// Compile many path strings in parallel
pub fn compile_parallel<D>(paths: &[D], options: BuildOptions) -> Vec<Result<PathProgram, PathError>>
where
    D: AsRef<[u8]> + Sync,
{
    paths
        .par_iter()
        .map(|d| PathProgram::parse_with(d.as_ref(), options))
        .collect()
}

/// Total length of each path; malformed data is measured up to the first error
pub fn measure_parallel<D>(paths: &[D]) -> Vec<f64>
where
    D: AsRef<[u8]> + Sync,
{
    paths
        .par_iter()
        .map(|d| {
            let program = PathProgram::parse_lenient(d.as_ref());
            CurveArena::from_program(&program).total_length(DEFAULT_LENGTH_STEPS)
        })
        .collect()
}

/// Compile a path string and map each op in parallel
pub fn path_map<F, T>(d: &[u8], mapper: F) -> Result<Vec<T>, PathError>
where
    F: Fn(&PathOp) -> T + Sync + Send,
    T: Send,
{
    let program = PathProgram::parse(d)?;
    Ok(program.ops().par_iter().map(mapper).collect())
}
