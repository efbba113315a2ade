//! RustySVG - Zero-copy SVG scanning and path geometry
//!
//! Pipeline (each stage pulls from the previous one):
//! 1. ByteSpan / CharSet: borrowed cursor and byte classes
//! 2. XML scanner: tokens and structural elements
//! 3. Path segment reader: `d` commands with implicit repetition
//! 4. Normalizer: canonical `PathProgram`
//! 5. Curves: evaluation and arc-length parameterization
//! 6. Dash filter: visible/invisible curve sub-ranges
//!
//! Strategies:
//! A: One path at a time (parse_path, path_length, dash_path)
//! B: Document resource with cached programs (document_new, document_paths)
//! C: Parallel batch compilation (parse_paths_parallel)

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod memory;
pub mod core;
pub mod curve;
pub mod dash;
pub mod error;
pub mod path;
pub mod resource;
pub mod strategy;
mod term;

use crate::core::{AttributeReader, ByteSpan, ElementScanner, XmlTokenizer};
use curve::{CurveArena, DEFAULT_LENGTH_STEPS};
use path::{PathProgram, SegmentReader};
use resource::{SvgDocumentRef, SvgDocumentResource};

// ============================================================================
// Memory Tracking NIFs
// ============================================================================

#[rustler::nif]
fn get_rust_memory() -> usize {
    memory::stats().current
}

#[rustler::nif]
fn get_rust_memory_peak() -> usize {
    memory::stats().peak
}

#[rustler::nif]
fn reset_rust_memory_stats() -> (usize, usize) {
    let before = memory::reset_peak();
    (before.current, before.peak)
}

// ============================================================================
// XML Scanning
// ============================================================================

/// Lexical tokens up to the first error
#[rustler::nif]
fn tokenize<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    let mut tokenizer = XmlTokenizer::new(input.as_slice());
    let tokens: Vec<_> = tokenizer.by_ref().collect();
    match tokenizer.error() {
        Some(e) => Ok(term::xml_error_to_term(env, e)),
        None => Ok((term::ok(), term::tokens_to_term(env, &tokens)).encode(env)),
    }
}

/// Structural elements in document order
#[rustler::nif]
fn scan_elements<'a>(env: Env<'a>, input: Binary<'a>, skip_whitespace: bool) -> NifResult<Term<'a>> {
    let options = crate::core::ScanOptions {
        skip_whitespace_content: skip_whitespace,
    };
    let mut scanner = ElementScanner::with_options(input.as_slice(), options);
    let elements: Vec<_> = scanner.by_ref().collect();
    match scanner.error() {
        Some(e) => Ok(term::xml_error_to_term(env, e)),
        None => Ok((term::ok(), term::elements_to_term(env, &elements)).encode(env)),
    }
}

/// Walk the attributes of a tag interior (the `data` of a start tag)
#[rustler::nif]
fn element_attributes<'a>(env: Env<'a>, data: Binary<'a>) -> NifResult<Term<'a>> {
    let attrs: Vec<_> = AttributeReader::new(ByteSpan::new(data.as_slice())).collect();
    Ok(term::attributes_to_term(env, &attrs))
}

// ============================================================================
// Strategy A: Single Path
// ============================================================================

/// Raw segments, before normalization
#[rustler::nif]
fn path_segments<'a>(env: Env<'a>, d: Binary<'a>) -> NifResult<Term<'a>> {
    let mut reader = SegmentReader::new(d.as_slice());
    let mut list = Vec::new();
    for seg in reader.by_ref() {
        list.push(term::segment_to_term(env, &seg));
    }
    match reader.error() {
        Some(e) => Ok(term::path_error_to_term(env, e)),
        None => Ok((term::ok(), list).encode(env)),
    }
}

#[rustler::nif]
fn parse_path<'a>(env: Env<'a>, d: Binary<'a>) -> NifResult<Term<'a>> {
    Ok(term::program_result_to_term(env, &PathProgram::parse(d.as_slice())))
}

/// Program up to the first error, never fails
#[rustler::nif]
fn parse_path_lenient<'a>(env: Env<'a>, d: Binary<'a>) -> NifResult<Term<'a>> {
    let program = PathProgram::parse_lenient(d.as_slice());
    Ok(term::program_to_term(env, &program))
}

#[rustler::nif]
fn path_length(d: Binary, steps: usize) -> f64 {
    let program = PathProgram::parse_lenient(d.as_slice());
    let steps = if steps == 0 { DEFAULT_LENGTH_STEPS } else { steps };
    CurveArena::from_program(&program).total_length(steps)
}

/// Dash runs for every curve of a path, pattern restarting per subpath
#[rustler::nif]
fn dash_path<'a>(env: Env<'a>, d: Binary<'a>, pattern: Vec<f64>, offset: f64) -> NifResult<Term<'a>> {
    let program = match PathProgram::parse(d.as_slice()) {
        Ok(p) => p,
        Err(e) => return Ok(term::path_error_to_term(env, &e)),
    };
    if pattern.iter().any(|v| *v < 0.0 || !v.is_finite()) {
        return Err(rustler::Error::BadArg);
    }
    let arena = CurveArena::from_program(&program);
    let segments = dash::dash_contours(&arena, &pattern, offset);
    let list: Vec<Term<'a>> = segments
        .iter()
        .map(|s| term::curve_segment_to_term(env, s))
        .collect();
    Ok((term::ok(), list).encode(env))
}

// ============================================================================
// Strategy B: Document Resource
// ============================================================================

/// Copy a document into a resource with an empty program cache
#[rustler::nif]
fn document_new(input: Binary) -> SvgDocumentRef {
    ResourceArc::new(SvgDocumentResource::new(input.as_slice().to_vec()))
}

/// `[{element_name, ops}]` for every element with a `d` attribute
#[rustler::nif]
fn document_paths<'a>(env: Env<'a>, doc: SvgDocumentRef) -> NifResult<Term<'a>> {
    let paths = doc
        .paths()
        .map_err(|reason| rustler::Error::Term(Box::new(reason)))?;
    let list: Vec<Term<'a>> = paths
        .iter()
        .map(|p| (p.element.as_str(), term::program_to_term(env, &p.program)).encode(env))
        .collect();
    Ok(list.encode(env))
}

// ============================================================================
// Strategy C: Parallel Batch
// ============================================================================

/// Compile many paths across the rayon pool, results in input order
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_paths_parallel<'a>(env: Env<'a>, paths: Vec<Binary<'a>>) -> NifResult<Term<'a>> {
    let slices: Vec<&[u8]> = paths.iter().map(|b| b.as_slice()).collect();
    let results = strategy::compile_parallel(&slices, path::BuildOptions::default());
    let list: Vec<Term<'a>> = results
        .iter()
        .map(|r| term::program_result_to_term(env, r))
        .collect();
    Ok(list.encode(env))
}

/// Length of each path, measured up to its first error
#[rustler::nif(schedule = "DirtyCpu")]
fn path_lengths_parallel<'a>(paths: Vec<Binary<'a>>) -> Vec<f64> {
    let slices: Vec<&[u8]> = paths.iter().map(|b| b.as_slice()).collect();
    strategy::measure_parallel(&slices)
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.RustySVG.Native");
