//! ResourceArc Wrappers
//!
//! Persistent state for SVG documents: the copied source bytes plus an LRU
//! cache of compiled path programs, keyed by the byte offset of each `d`
//! attribute value.

use crate::core::{ByteSpan, ElementScanner};
use crate::path::{BuildOptions, PathProgram};
use lru::LruCache;
use rustler::ResourceArc;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Compiled programs kept per document
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// A path-bearing element found in the document
pub struct DocumentPath {
    pub element: String,
    pub offset: usize,
    pub program: Arc<PathProgram>,
}

/// Wrapper for an SVG document that can be stored in a ResourceArc
pub struct SvgDocumentResource {
    bytes: Vec<u8>,
    options: BuildOptions,
    programs: Mutex<LruCache<usize, Arc<PathProgram>>>,
}

impl SvgDocumentResource {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self::with_capacity(bytes, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(bytes: Vec<u8>, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        log::debug!(
            "svg document resource: {} bytes, cache capacity {capacity}",
            bytes.len()
        );
        SvgDocumentResource {
            bytes,
            options: BuildOptions::default(),
            programs: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Compiled program for the `d` value at `offset`, from cache when present.
    ///
    /// Path data is compiled leniently, so a malformed `d` yields everything
    /// before the first error.
    ///
    /// # Errors
    ///
    /// Returns `"mutex_poisoned"` if the cache mutex is poisoned.
    pub fn program_at(&self, offset: usize, d: ByteSpan<'_>) -> Result<Arc<PathProgram>, &'static str> {
        let mut cache = self.programs.lock().map_err(|_| "mutex_poisoned")?;
        if let Some(program) = cache.get(&offset) {
            return Ok(Arc::clone(program));
        }
        log::debug!("path cache miss at byte {offset} ({} bytes of path data)", d.size());
        let program = Arc::new(PathProgram::parse_lenient_with(d.as_bytes(), self.options));
        cache.put(offset, Arc::clone(&program));
        Ok(program)
    }

    /// Every element carrying a `d` attribute, in document order.
    ///
    /// Scanning stops at the first malformed construct; paths found before it
    /// are still returned.
    ///
    /// # Errors
    ///
    /// Returns `"mutex_poisoned"` if the cache mutex is poisoned.
    pub fn paths(&self) -> Result<Vec<DocumentPath>, &'static str> {
        let base = ByteSpan::new(&self.bytes);
        let mut scanner = ElementScanner::new(&self.bytes);
        let mut out = Vec::new();

        for element in scanner.by_ref() {
            if !element.is_start() {
                continue;
            }
            let Some(d) = element.attribute(b"d") else {
                continue;
            };
            let Some(offset) = d.offset_in(&base) else {
                continue;
            };
            out.push(DocumentPath {
                element: String::from_utf8_lossy(element.name().as_bytes()).into_owned(),
                offset,
                program: self.program_at(offset, d)?,
            });
        }

        if let Some(e) = scanner.error() {
            log::debug!("document scan ended early: {e}");
        }
        Ok(out)
    }

    /// Number of cached programs
    pub fn cached(&self) -> usize {
        self.programs.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[rustler::resource_impl]
impl rustler::Resource for SvgDocumentResource {}

/// Type alias for the ResourceArc
pub type SvgDocumentRef = ResourceArc<SvgDocumentResource>;
