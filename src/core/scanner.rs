//! Element scanner - structural XML elements over a ByteSpan cursor
//!
//! `read_element` pulls one element (tag, content run, comment, CDATA, DOCTYPE,
//! processing instruction, XML declaration, ENTITY) from the front of a cursor
//! and advances the cursor past it. Tag interiors are not split into
//! attributes here; the raw interior is handed back as `data` and can be walked
//! later with an `AttributeReader`, which keeps this path allocation-free and
//! attribute order intact.
//!
//! Delimiter searches use memchr (SSE2/AVX2/NEON when available).

use super::attributes::{find_attribute, AttributeReader};
use super::charset::{WHITESPACE, XML_NAME_CHAR, XML_NAME_START};
use super::span::ByteSpan;
use crate::error::XmlError;

/// Kind of structural element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `<name attrs...>`
    StartTag,
    /// `</name>`
    EndTag,
    /// `<name attrs.../>`
    SelfClosing,
    /// Character data between tags
    Content,
    /// `<!--...-->`
    Comment,
    /// `<![CDATA[...]]>`
    CData,
    /// `<!DOCTYPE ...>`
    DocType,
    /// `<?target ...?>`
    ProcessingInstruction,
    /// `<?xml ...?>`
    XmlDecl,
    /// `<!ENTITY ...>`
    Entity,
}

/// One structural element. `name` and `data` borrow from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlElement<'a> {
    kind: ElementKind,
    name: ByteSpan<'a>,
    data: ByteSpan<'a>,
}

impl<'a> XmlElement<'a> {
    pub fn new(kind: ElementKind, name: ByteSpan<'a>, data: ByteSpan<'a>) -> Self {
        XmlElement { kind, name, data }
    }

    #[inline]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Tag name, PI target, DOCTYPE root or entity name. Empty for other kinds.
    #[inline]
    pub fn name(&self) -> ByteSpan<'a> {
        self.name
    }

    /// Unparsed interior: attribute text for tags, literal text otherwise
    #[inline]
    pub fn data(&self) -> ByteSpan<'a> {
        self.data
    }

    /// Get the name as a string
    pub fn name_str(&self) -> Option<&'a str> {
        self.name.as_str()
    }

    /// True for start and self-closing tags
    pub fn is_start(&self) -> bool {
        matches!(self.kind, ElementKind::StartTag | ElementKind::SelfClosing)
    }

    /// True for content made only of XML whitespace
    pub fn is_whitespace(&self) -> bool {
        self.kind == ElementKind::Content && self.data.trim_start(&WHITESPACE).is_empty()
    }

    /// Walk the attributes in the tag interior
    pub fn attributes(&self) -> AttributeReader<'a> {
        match self.kind {
            ElementKind::StartTag | ElementKind::SelfClosing | ElementKind::XmlDecl => {
                AttributeReader::new(self.data)
            }
            _ => AttributeReader::new(ByteSpan::empty()),
        }
    }

    /// Value of the first attribute named `name`
    pub fn attribute(&self, name: &[u8]) -> Option<ByteSpan<'a>> {
        if !matches!(
            self.kind,
            ElementKind::StartTag | ElementKind::SelfClosing | ElementKind::XmlDecl
        ) {
            return None;
        }
        find_attribute(self.data, name)
    }
}

/// Read the next element from the front of `cursor`.
///
/// Returns `Ok(None)` once the cursor is empty. On malformed markup the cursor
/// is left at the offending `<` and the error offset is relative to the cursor
/// position at the call.
pub fn read_element<'a>(cursor: &mut ByteSpan<'a>) -> Result<Option<XmlElement<'a>>, XmlError> {
    if cursor.is_empty() {
        return Ok(None);
    }

    let lt = cursor.find_byte(b'<').unwrap_or(cursor.size());
    if lt > 0 {
        let text = cursor.take(lt);
        cursor.advance(lt);
        return Ok(Some(XmlElement::new(ElementKind::Content, ByteSpan::empty(), text)));
    }

    let mut rest = cursor.tail(1);
    let element = match rest.peek() {
        Some(b'?') => {
            rest.advance(1);
            read_instruction(&mut rest)?
        }
        Some(b'!') => {
            rest.advance(1);
            read_declaration(&mut rest)?
        }
        Some(b'/') => {
            rest.advance(1);
            read_end_tag(&mut rest)?
        }
        Some(_) => read_start_tag(&mut rest)?,
        None => return Err(XmlError::Unterminated { construct: "tag", offset: 0 }),
    };

    *cursor = rest;
    Ok(Some(element))
}

fn read_name<'a>(rest: &mut ByteSpan<'a>) -> Result<ByteSpan<'a>, XmlError> {
    match rest.peek() {
        Some(b) if XML_NAME_START.contains(b) => Ok(rest.take_while(&XML_NAME_CHAR)),
        _ => Err(XmlError::InvalidName { offset: 0 }),
    }
}

/// `<?target data?>`, `rest` positioned after `<?`
fn read_instruction<'a>(rest: &mut ByteSpan<'a>) -> Result<XmlElement<'a>, XmlError> {
    let target = read_name(rest)?;
    let end = rest.find(b"?>").ok_or(XmlError::Unterminated {
        construct: "processing instruction",
        offset: 0,
    })?;
    let data = rest.take(end).trim(&WHITESPACE);
    rest.advance(end + 2);

    let kind = if target == b"xml" {
        ElementKind::XmlDecl
    } else {
        ElementKind::ProcessingInstruction
    };
    Ok(XmlElement::new(kind, target, data))
}

/// `<!...>`, `rest` positioned after `<!`
fn read_declaration<'a>(rest: &mut ByteSpan<'a>) -> Result<XmlElement<'a>, XmlError> {
    if rest.eat(b"--") {
        let end = rest
            .find(b"-->")
            .ok_or(XmlError::Unterminated { construct: "comment", offset: 0 })?;
        let data = rest.take(end);
        rest.advance(end + 3);
        return Ok(XmlElement::new(ElementKind::Comment, ByteSpan::empty(), data));
    }

    if rest.eat(b"[CDATA[") {
        let end = rest
            .find(b"]]>")
            .ok_or(XmlError::Unterminated { construct: "CDATA section", offset: 0 })?;
        let data = rest.take(end);
        rest.advance(end + 3);
        return Ok(XmlElement::new(ElementKind::CData, ByteSpan::empty(), data));
    }

    if rest.eat(b"DOCTYPE") {
        rest.skip_while(&WHITESPACE);
        let name = rest.take_while(&XML_NAME_CHAR);
        let end = doctype_end(*rest)
            .ok_or(XmlError::Unterminated { construct: "DOCTYPE", offset: 0 })?;
        let data = rest.take(end).trim(&WHITESPACE);
        rest.advance(end + 1);
        return Ok(XmlElement::new(ElementKind::DocType, name, data));
    }

    if rest.eat(b"ENTITY") {
        rest.skip_while(&WHITESPACE);
        if rest.eat(b"%") {
            rest.skip_while(&WHITESPACE);
        }
        let name = read_name(rest)?;
        let end = rest
            .find_unquoted(b'>')
            .ok_or(XmlError::Unterminated { construct: "ENTITY", offset: 0 })?;
        let data = rest.take(end).trim(&WHITESPACE);
        rest.advance(end + 1);
        return Ok(XmlElement::new(ElementKind::Entity, name, data));
    }

    Err(XmlError::UnknownDeclaration { offset: 0 })
}

/// Offset of the `>` closing a DOCTYPE, skipping an internal subset `[...]`
fn doctype_end(body: ByteSpan<'_>) -> Option<usize> {
    let gt = body.find_unquoted(b'>')?;
    match body.find_unquoted(b'[') {
        Some(open) if open < gt => {
            let subset = body.tail(open + 1);
            let close = open + 1 + subset.find_unquoted(b']')?;
            let after = body.tail(close + 1);
            Some(close + 1 + after.find_byte(b'>')?)
        }
        _ => Some(gt),
    }
}

/// `</name>`, `rest` positioned after `</`
fn read_end_tag<'a>(rest: &mut ByteSpan<'a>) -> Result<XmlElement<'a>, XmlError> {
    let name = read_name(rest)?;
    let end = rest
        .find_byte(b'>')
        .ok_or(XmlError::Unterminated { construct: "end tag", offset: 0 })?;
    let data = rest.take(end).trim(&WHITESPACE);
    rest.advance(end + 1);
    Ok(XmlElement::new(ElementKind::EndTag, name, data))
}

/// `<name ...>` or `<name .../>`, `rest` positioned after `<`
fn read_start_tag<'a>(rest: &mut ByteSpan<'a>) -> Result<XmlElement<'a>, XmlError> {
    let name = read_name(rest)?;
    let end = rest
        .find_unquoted(b'>')
        .ok_or(XmlError::Unterminated { construct: "start tag", offset: 0 })?;
    let body = rest.take(end);
    rest.advance(end + 1);

    if body.ends_with(b"/") {
        let data = body.take(body.size() - 1);
        Ok(XmlElement::new(ElementKind::SelfClosing, name, data))
    } else {
        Ok(XmlElement::new(ElementKind::StartTag, name, body))
    }
}

/// Scanner options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Drop `Content` elements made only of whitespace
    pub skip_whitespace_content: bool,
}

/// Iterator over the elements of a document, in document order.
///
/// Stops at the first malformed construct and keeps the error in `error()`.
pub struct ElementScanner<'a> {
    input: ByteSpan<'a>,
    cursor: ByteSpan<'a>,
    options: ScanOptions,
    error: Option<XmlError>,
}

impl<'a> ElementScanner<'a> {
    /// Create a scanner with default options
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_options(input, ScanOptions::default())
    }

    pub fn with_options(input: &'a [u8], options: ScanOptions) -> Self {
        let input = ByteSpan::new(input);
        ElementScanner {
            input,
            cursor: input,
            options,
            error: None,
        }
    }

    /// Byte offset of the cursor from the start of the input
    pub fn offset(&self) -> usize {
        self.input.size() - self.cursor.size()
    }

    /// Unscanned input
    pub fn remaining(&self) -> ByteSpan<'a> {
        self.cursor
    }

    /// First error encountered, if any
    pub fn error(&self) -> Option<&XmlError> {
        self.error.as_ref()
    }

    /// Get the next element, or None at end of input or after an error
    pub fn next_element(&mut self) -> Option<XmlElement<'a>> {
        while self.error.is_none() {
            let at = self.offset();
            match read_element(&mut self.cursor) {
                Ok(Some(element)) => {
                    if self.options.skip_whitespace_content && element.is_whitespace() {
                        continue;
                    }
                    return Some(element);
                }
                Ok(None) => return None,
                Err(e) => {
                    let e = e.rebase(at);
                    log::debug!("element scanner stopped: {e}");
                    self.error = Some(e);
                }
            }
        }
        None
    }
}

impl<'a> Iterator for ElementScanner<'a> {
    type Item = XmlElement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_element()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> Vec<XmlElement<'_>> {
        ElementScanner::new(input.as_bytes()).collect()
    }

    #[test]
    fn test_offset_after_partial_read() {
        let mut scanner = ElementScanner::new(b"<a x=\"1\"><b/>text</a>");
        assert_eq!(scanner.offset(), 0);
        assert_eq!(scanner.next().map(|e| e.kind()), Some(ElementKind::StartTag));
        assert_eq!(scanner.offset(), 9);
        assert_eq!(scanner.next().map(|e| e.kind()), Some(ElementKind::SelfClosing));
        assert_eq!(scanner.offset(), 13);
        assert_eq!(scanner.remaining(), b"text</a>");
    }

    #[test]
    fn test_document_order() {
        let elements = scan("<a x=\"1\"><b/>text</a>");
        let kinds: Vec<_> = elements.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ElementKind::StartTag,
                ElementKind::SelfClosing,
                ElementKind::Content,
                ElementKind::EndTag
            ]
        );
        assert_eq!(elements[0].name(), b"a");
        assert_eq!(elements[1].name(), b"b");
        assert_eq!(elements[2].data(), b"text");
        assert_eq!(elements[3].name(), b"a");
        assert_eq!(elements[0].attribute(b"x"), Some(ByteSpan::from("1")));
    }

    #[test]
    fn test_xml_declaration_and_pi() {
        let elements = scan("<?xml version=\"1.0\"?><?xml-stylesheet href=\"a.css\"?><svg/>");
        assert_eq!(elements[0].kind(), ElementKind::XmlDecl);
        assert_eq!(elements[0].attribute(b"version"), Some(ByteSpan::from("1.0")));
        assert_eq!(elements[1].kind(), ElementKind::ProcessingInstruction);
        assert_eq!(elements[1].name(), b"xml-stylesheet");
        assert_eq!(elements[1].data(), b"href=\"a.css\"");
        assert_eq!(elements[2].kind(), ElementKind::SelfClosing);
    }

    #[test]
    fn test_comment_and_cdata() {
        let elements = scan("<!-- a > b --><![CDATA[x < y]]>");
        assert_eq!(elements[0].kind(), ElementKind::Comment);
        assert_eq!(elements[0].data(), b" a > b ");
        assert_eq!(elements[1].kind(), ElementKind::CData);
        assert_eq!(elements[1].data(), b"x < y");
    }

    #[test]
    fn test_doctype_with_internal_subset() {
        let input = "<!DOCTYPE svg [ <!ENTITY ns \"http://x\"> ]><svg/>";
        let elements = scan(input);
        assert_eq!(elements[0].kind(), ElementKind::DocType);
        assert_eq!(elements[0].name(), b"svg");
        assert!(elements[0].data().starts_with(b"["));
        assert_eq!(elements[1].kind(), ElementKind::SelfClosing);
        assert_eq!(elements.len(), 2);
    }

    #[test]
    fn test_doctype_external() {
        let elements = scan("<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"x.dtd\"><svg/>");
        assert_eq!(elements[0].kind(), ElementKind::DocType);
        assert_eq!(elements[0].name(), b"svg");
        assert!(elements[0].data().starts_with(b"PUBLIC"));
    }

    #[test]
    fn test_entity_declaration() {
        let elements = scan("<!ENTITY copy \"&#169;\">");
        assert_eq!(elements[0].kind(), ElementKind::Entity);
        assert_eq!(elements[0].name(), b"copy");
        assert_eq!(elements[0].data(), b"\"&#169;\"");
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let elements = scan("<text label=\"a>b\">x</text>");
        assert_eq!(elements[0].kind(), ElementKind::StartTag);
        assert_eq!(elements[0].attribute(b"label"), Some(ByteSpan::from("a>b")));
        assert_eq!(elements[1].data(), b"x");
    }

    #[test]
    fn test_unterminated_comment_stops() {
        let mut scanner = ElementScanner::new(b"<a/><!-- never closed");
        assert_eq!(scanner.next().map(|e| e.kind()), Some(ElementKind::SelfClosing));
        assert!(scanner.next().is_none());
        assert_eq!(
            scanner.error(),
            Some(&XmlError::Unterminated { construct: "comment", offset: 4 })
        );
        assert_eq!(scanner.offset(), 4);
    }

    #[test]
    fn test_missing_gt_stops() {
        let mut scanner = ElementScanner::new(b"text<rect x=\"1\"");
        assert_eq!(scanner.next().map(|e| e.kind()), Some(ElementKind::Content));
        assert!(scanner.next().is_none());
        assert!(matches!(scanner.error(), Some(XmlError::Unterminated { offset: 4, .. })));
    }

    #[test]
    fn test_unknown_declaration() {
        let mut scanner = ElementScanner::new(b"<!BOGUS>");
        assert!(scanner.next().is_none());
        assert_eq!(scanner.error(), Some(&XmlError::UnknownDeclaration { offset: 0 }));
    }

    #[test]
    fn test_invalid_name() {
        let mut scanner = ElementScanner::new(b"< a>");
        assert!(scanner.next().is_none());
        assert_eq!(scanner.error(), Some(&XmlError::InvalidName { offset: 0 }));
    }

    #[test]
    fn test_skip_whitespace_content() {
        let input = b"<svg>\n  <path/>\n</svg>";
        assert_eq!(ElementScanner::new(input).count(), 5);
        let options = ScanOptions { skip_whitespace_content: true };
        let kinds: Vec<_> = ElementScanner::with_options(input, options)
            .map(|e| e.kind())
            .collect();
        assert_eq!(
            kinds,
            vec![ElementKind::StartTag, ElementKind::SelfClosing, ElementKind::EndTag]
        );
    }

    #[test]
    fn test_read_element_advances_cursor() {
        let mut cursor = ByteSpan::from("<a>rest");
        let element = read_element(&mut cursor).unwrap().unwrap();
        assert_eq!(element.kind(), ElementKind::StartTag);
        assert_eq!(cursor, b"rest");
        let element = read_element(&mut cursor).unwrap().unwrap();
        assert_eq!(element.kind(), ElementKind::Content);
        assert!(read_element(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn test_end_tag_whitespace() {
        let elements = scan("<g></g >");
        assert_eq!(elements[1].kind(), ElementKind::EndTag);
        assert_eq!(elements[1].name(), b"g");
        assert!(elements[1].data().is_empty());
    }
}
