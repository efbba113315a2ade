//! ByteSpan - borrowed view and cursor over input bytes
//!
//! Zero-copy reference to a portion of the input document. Every derived span
//! is a sub-slice of the one it came from, so a span can shrink but never grow
//! past the bytes it was created over. The backing buffer outlives every span.

use super::charset::CharSet;
use memchr::{memchr, memchr2, memmem};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// Non-owning view over a contiguous byte range.
///
/// Cursor operations (`advance`, `skip_while`, `take_while`, ...) move the
/// start of this span forward. They never touch the backing storage.
#[derive(Clone, Copy, Default)]
pub struct ByteSpan<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteSpan<'a> {
    /// Create a span over the given bytes
    #[inline]
    pub const fn new(bytes: &'a [u8]) -> Self {
        ByteSpan { bytes }
    }

    /// Create an empty span
    #[inline]
    pub const fn empty() -> Self {
        ByteSpan { bytes: &[] }
    }

    /// Number of bytes in the span
    #[inline]
    pub const fn size(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Underlying bytes
    #[inline]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// View as UTF-8, if valid
    #[inline]
    pub fn as_str(&self) -> Option<&'a str> {
        std::str::from_utf8(self.bytes).ok()
    }

    /// Byte at `index`.
    ///
    /// Bounds are the caller's responsibility; an out-of-range index panics.
    #[inline]
    pub fn byte(&self, index: usize) -> u8 {
        self.bytes[index]
    }

    /// Byte at `index`, or `None` past the end
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    /// First byte, if any
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Sub-span starting at `offset`, at most `len` bytes long.
    ///
    /// Both arguments are clamped to the available bytes, so the result is
    /// never larger than `self.size() - offset`.
    #[inline]
    pub fn sub_span(&self, offset: usize, len: usize) -> ByteSpan<'a> {
        let start = offset.min(self.bytes.len());
        let end = start.saturating_add(len).min(self.bytes.len());
        ByteSpan::new(&self.bytes[start..end])
    }

    /// The first `n` bytes (clamped)
    #[inline]
    pub fn take(&self, n: usize) -> ByteSpan<'a> {
        self.sub_span(0, n)
    }

    /// Everything from `offset` to the end (clamped)
    #[inline]
    pub fn tail(&self, offset: usize) -> ByteSpan<'a> {
        ByteSpan::new(&self.bytes[offset.min(self.bytes.len())..])
    }

    /// Split into `[..mid]` and `[mid..]`, clamping `mid`
    #[inline]
    pub fn split_at(&self, mid: usize) -> (ByteSpan<'a>, ByteSpan<'a>) {
        let (head, tail) = self.bytes.split_at(mid.min(self.bytes.len()));
        (ByteSpan::new(head), ByteSpan::new(tail))
    }

    /// Move the start forward by `n` bytes (clamped)
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.bytes = &self.bytes[n.min(self.bytes.len())..];
    }

    /// Skip leading bytes in `set`, returning how many were skipped
    #[inline]
    pub fn skip_while(&mut self, set: &CharSet) -> usize {
        let n = self.bytes.iter().take_while(|&&b| set.contains(b)).count();
        self.bytes = &self.bytes[n..];
        n
    }

    /// Consume and return the leading run of bytes in `set`
    #[inline]
    pub fn take_while(&mut self, set: &CharSet) -> ByteSpan<'a> {
        let n = self.bytes.iter().take_while(|&&b| set.contains(b)).count();
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        ByteSpan::new(head)
    }

    /// Consume and return the leading run of bytes not in `set`
    #[inline]
    pub fn take_until(&mut self, set: &CharSet) -> ByteSpan<'a> {
        let n = self.bytes.iter().take_while(|&&b| !set.contains(b)).count();
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        ByteSpan::new(head)
    }

    /// Drop leading bytes in `set`
    #[inline]
    pub fn trim_start(&self, set: &CharSet) -> ByteSpan<'a> {
        let mut s = *self;
        s.skip_while(set);
        s
    }

    /// Drop trailing bytes in `set`
    #[inline]
    pub fn trim_end(&self, set: &CharSet) -> ByteSpan<'a> {
        let keep = self
            .bytes
            .iter()
            .rposition(|&b| !set.contains(b))
            .map_or(0, |i| i + 1);
        ByteSpan::new(&self.bytes[..keep])
    }

    /// Drop leading and trailing bytes in `set`
    #[inline]
    pub fn trim(&self, set: &CharSet) -> ByteSpan<'a> {
        self.trim_start(set).trim_end(set)
    }

    /// Check if the span starts with `needle`
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.bytes.starts_with(needle)
    }

    /// Check if the span ends with `needle`
    #[inline]
    pub fn ends_with(&self, needle: &[u8]) -> bool {
        self.bytes.ends_with(needle)
    }

    /// Consume `prefix` if the span starts with it
    #[inline]
    pub fn eat(&mut self, prefix: &[u8]) -> bool {
        if self.bytes.starts_with(prefix) {
            self.bytes = &self.bytes[prefix.len()..];
            true
        } else {
            false
        }
    }

    /// Offset of the first occurrence of `byte` (SIMD via memchr)
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, self.bytes)
    }

    /// Offset of the first occurrence of either byte
    #[inline]
    pub fn find_byte2(&self, b1: u8, b2: u8) -> Option<usize> {
        memchr2(b1, b2, self.bytes)
    }

    /// Offset of the first occurrence of `needle`
    #[inline]
    pub fn find(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(self.bytes, needle)
    }

    /// Offset of the first `byte` that is not inside a quoted string
    pub fn find_unquoted(&self, byte: u8) -> Option<usize> {
        let mut quote: Option<u8> = None;
        for (i, &b) in self.bytes.iter().enumerate() {
            match quote {
                Some(q) if b == q => quote = None,
                Some(_) => {}
                None if b == b'"' || b == b'\'' => quote = Some(b),
                None if b == byte => return Some(i),
                None => {}
            }
        }
        None
    }

    /// Pointer identity: same start address and same length
    #[inline]
    pub fn is_same(&self, other: &ByteSpan<'_>) -> bool {
        std::ptr::eq(self.bytes.as_ptr(), other.bytes.as_ptr()) && self.bytes.len() == other.bytes.len()
    }

    /// Byte offset of this span's start within `base`, if it lies inside it
    pub fn offset_in(&self, base: &ByteSpan<'_>) -> Option<usize> {
        let base_start = base.bytes.as_ptr() as usize;
        let start = self.bytes.as_ptr() as usize;
        if start >= base_start && start + self.bytes.len() <= base_start + base.bytes.len() {
            Some(start - base_start)
        } else {
            None
        }
    }

    /// Case-insensitive ASCII comparison
    #[inline]
    pub fn eq_ignore_ascii_case(&self, other: &[u8]) -> bool {
        self.bytes.eq_ignore_ascii_case(other)
    }
}

impl PartialEq for ByteSpan<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for ByteSpan<'_> {}

impl PartialEq<[u8]> for ByteSpan<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialEq<&[u8]> for ByteSpan<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.bytes == *other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for ByteSpan<'_> {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.bytes == other.as_slice()
    }
}

impl PartialEq<&str> for ByteSpan<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.bytes == other.as_bytes()
    }
}

impl PartialOrd for ByteSpan<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByteSpan<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes.cmp(other.bytes)
    }
}

impl Hash for ByteSpan<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl std::ops::Index<usize> for ByteSpan<'_> {
    type Output = u8;

    #[inline]
    fn index(&self, index: usize) -> &u8 {
        &self.bytes[index]
    }
}

impl<'a> From<&'a [u8]> for ByteSpan<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        ByteSpan::new(bytes)
    }
}

impl<'a> From<&'a str> for ByteSpan<'a> {
    fn from(s: &'a str) -> Self {
        ByteSpan::new(s.as_bytes())
    }
}

impl std::fmt::Debug for ByteSpan<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ByteSpan({:?})", String::from_utf8_lossy(self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::charset::{PATH_SEPARATORS, WHITESPACE};

    #[test]
    fn test_sub_span_clamps() {
        let span = ByteSpan::from("hello world");
        assert_eq!(span.sub_span(6, 5), b"world");
        assert_eq!(span.sub_span(6, 100), b"world");
        assert!(span.sub_span(50, 3).is_empty());
        assert_eq!(span.take(100).size(), span.size());
    }

    #[test]
    fn test_sub_span_never_grows() {
        let span = ByteSpan::from("0123456789");
        for offset in 0..14 {
            for len in 0..14 {
                let sub = span.sub_span(offset, len);
                assert!(sub.size() <= span.size().saturating_sub(offset));
                assert!(sub.size() <= len);
                if !sub.is_empty() {
                    assert_eq!(sub.offset_in(&span), Some(offset));
                }
            }
        }
    }

    #[test]
    fn test_advance_and_skip() {
        let mut span = ByteSpan::from("  , 12 rest");
        assert_eq!(span.skip_while(&PATH_SEPARATORS), 4);
        assert_eq!(span.peek(), Some(b'1'));
        span.advance(100);
        assert!(span.is_empty());
        assert_eq!(span.peek(), None);
    }

    #[test]
    fn test_take_while_until() {
        let mut span = ByteSpan::from("name  = value");
        let name = span.take_until(&WHITESPACE.insert(b'='));
        assert_eq!(name, b"name");
        let ws = span.take_while(&WHITESPACE);
        assert_eq!(ws.size(), 2);
        assert!(span.eat(b"="));
        assert_eq!(span.trim(&WHITESPACE), b"value");
    }

    #[test]
    fn test_trim() {
        let span = ByteSpan::from("  abc \n");
        assert_eq!(span.trim(&WHITESPACE), b"abc");
        assert_eq!(span.trim_start(&WHITESPACE), b"abc \n");
        assert_eq!(span.trim_end(&WHITESPACE), b"  abc");
        assert!(ByteSpan::from("   ").trim(&WHITESPACE).is_empty());
    }

    #[test]
    fn test_equality_is_bytewise() {
        let a = b"same text".to_vec();
        let b = b"same text".to_vec();
        let sa = ByteSpan::new(&a);
        let sb = ByteSpan::new(&b);
        assert_eq!(sa, sb);
        assert!(!sa.is_same(&sb));
        assert!(sa.is_same(&ByteSpan::new(&a)));
        assert!(ByteSpan::from("abc") < ByteSpan::from("abd"));
    }

    #[test]
    fn test_find() {
        let span = ByteSpan::from("<!-- a -- b -->");
        assert_eq!(span.find_byte(b'!'), Some(1));
        assert_eq!(span.find(b"-->"), Some(12));
        assert_eq!(span.find_byte2(b'x', b'b'), Some(10));
    }

    #[test]
    fn test_find_unquoted() {
        let span = ByteSpan::from("a x=\">\" y='>'>tail");
        assert_eq!(span.find_unquoted(b'>'), Some(13));
        assert_eq!(ByteSpan::from("a=\"unterminated >").find_unquoted(b'>'), None);
    }

    #[test]
    fn test_split_at() {
        let (head, tail) = ByteSpan::from("abcdef").split_at(2);
        assert_eq!(head, b"ab");
        assert_eq!(tail, b"cdef");
        let (head, tail) = ByteSpan::from("ab").split_at(10);
        assert_eq!(head, b"ab");
        assert!(tail.is_empty());
    }

    #[test]
    fn test_indexing() {
        let span = ByteSpan::from("xyz");
        assert_eq!(span[1], b'y');
        assert_eq!(span.byte(2), b'z');
        assert_eq!(span.get(3), None);
    }
}
