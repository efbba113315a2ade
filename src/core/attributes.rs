//! XML Attribute Parsing
//!
//! Walks `name="value"` pairs in the raw interior of a tag. Values are handed
//! back as-is (no entity decoding) and borrow from the input.

use super::charset::{WHITESPACE, XML_NAME_CHAR, XML_NAME_START};
use super::span::ByteSpan;
use memchr::memchr;

/// A parsed XML attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Attribute name (may include namespace prefix)
    pub name: ByteSpan<'a>,
    /// Attribute value, quotes stripped
    pub value: ByteSpan<'a>,
}

impl<'a> Attribute<'a> {
    /// Get the name as a string
    pub fn name_str(&self) -> Option<&'a str> {
        self.name.as_str()
    }

    /// Get the value as a string
    pub fn value_str(&self) -> Option<&'a str> {
        self.value.as_str()
    }

    /// Namespace prefix (before colon), if any
    pub fn prefix(&self) -> Option<ByteSpan<'a>> {
        split_name(self.name).0
    }

    /// Local name (after colon, if namespaced)
    pub fn local_name(&self) -> ByteSpan<'a> {
        split_name(self.name).1
    }
}

/// Split a name into prefix and local name at the colon
fn split_name(name: ByteSpan<'_>) -> (Option<ByteSpan<'_>>, ByteSpan<'_>) {
    match memchr(b':', name.as_bytes()) {
        Some(colon_pos) => (Some(name.take(colon_pos)), name.tail(colon_pos + 1)),
        None => (None, name),
    }
}

/// Iterator over the attributes of a tag interior.
///
/// Stops at the first malformed pair (missing `=`, unquoted or unterminated
/// value); `is_malformed` reports whether that happened.
#[derive(Debug, Clone)]
pub struct AttributeReader<'a> {
    rest: ByteSpan<'a>,
    malformed: bool,
}

impl<'a> AttributeReader<'a> {
    pub fn new(input: ByteSpan<'a>) -> Self {
        AttributeReader {
            rest: input,
            malformed: false,
        }
    }

    /// True once the walk stopped on something that is not `name="value"`
    pub fn is_malformed(&self) -> bool {
        self.malformed
    }

    fn stop(&mut self) -> Option<Attribute<'a>> {
        self.malformed = true;
        self.rest = ByteSpan::empty();
        None
    }
}

impl<'a> Iterator for AttributeReader<'a> {
    type Item = Attribute<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rest.skip_while(&WHITESPACE);
        let first = self.rest.peek()?;
        if !XML_NAME_START.contains(first) {
            return self.stop();
        }
        let name = self.rest.take_while(&XML_NAME_CHAR);

        self.rest.skip_while(&WHITESPACE);
        if !self.rest.eat(b"=") {
            return self.stop();
        }
        self.rest.skip_while(&WHITESPACE);

        let quote = match self.rest.peek() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return self.stop(),
        };
        let body = self.rest.tail(1);
        let Some(close) = body.find_byte(quote) else {
            return self.stop();
        };
        let value = body.take(close);
        self.rest = body.tail(close + 1);

        Some(Attribute { name, value })
    }
}

/// Value of the first attribute named `name` in a tag interior
pub fn find_attribute<'a>(input: ByteSpan<'a>, name: &[u8]) -> Option<ByteSpan<'a>> {
    AttributeReader::new(input)
        .find(|attr| attr.name == name)
        .map(|attr| attr.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Vec<Attribute<'_>> {
        AttributeReader::new(ByteSpan::from(input)).collect()
    }

    #[test]
    fn test_simple_attributes() {
        let attrs = parse(" id=\"test\" class=\"foo\"");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].name_str(), Some("id"));
        assert_eq!(attrs[0].value_str(), Some("test"));
        assert_eq!(attrs[1].name_str(), Some("class"));
        assert_eq!(attrs[1].value_str(), Some("foo"));
    }

    #[test]
    fn test_single_quoted() {
        let attrs = parse(" d='M0 0 L10 10'");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value_str(), Some("M0 0 L10 10"));
    }

    #[test]
    fn test_namespaced_attribute() {
        let attrs = parse(" xmlns:xlink=\"http://www.w3.org/1999/xlink\"");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].name_str(), Some("xmlns:xlink"));
        assert_eq!(attrs[0].prefix(), Some(ByteSpan::from("xmlns")));
        assert_eq!(attrs[0].local_name(), b"xlink");
    }

    #[test]
    fn test_value_kept_raw() {
        let attrs = parse(" title=\"&lt;hello&gt;\"");
        assert_eq!(attrs[0].value_str(), Some("&lt;hello&gt;"));
    }

    #[test]
    fn test_empty_attributes() {
        let mut reader = AttributeReader::new(ByteSpan::empty());
        assert!(reader.next().is_none());
        assert!(!reader.is_malformed());
    }

    #[test]
    fn test_whitespace_handling() {
        let attrs = parse("  id  =  \"test\"  ");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].name_str(), Some("id"));
        assert_eq!(attrs[0].value_str(), Some("test"));
    }

    #[test]
    fn test_malformed_stops_walk() {
        let mut reader = AttributeReader::new(ByteSpan::from("a=\"1\" checked b=\"2\""));
        assert_eq!(reader.next().map(|a| a.name), Some(ByteSpan::from("a")));
        assert!(reader.next().is_none());
        assert!(reader.is_malformed());

        let mut reader = AttributeReader::new(ByteSpan::from("w=10"));
        assert!(reader.next().is_none());
        assert!(reader.is_malformed());
    }

    #[test]
    fn test_find_attribute() {
        let input = ByteSpan::from("x=\"1\" y=\"2\" x=\"3\"");
        assert_eq!(find_attribute(input, b"x"), Some(ByteSpan::from("1")));
        assert_eq!(find_attribute(input, b"y"), Some(ByteSpan::from("2")));
        assert_eq!(find_attribute(input, b"z"), None);
    }
}
