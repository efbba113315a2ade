//! XML Tokenizer - lexical tokens over a ByteSpan
//!
//! Two states only:
//! - Content: scanning for the next `<`; everything before it is one `Text` token
//! - Tag: splitting the inside of `<...>` into `Slash`, `Eq`, `Name`, `String` until `>`
//!
//! Tokens are views into the input. Nothing is decoded or copied.

use super::charset::{TAG_DELIMITERS, WHITESPACE};
use super::span::ByteSpan;
use crate::error::XmlError;

/// Type of lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `/`
    Slash,
    /// `=`
    Eq,
    /// Bare word inside a tag (element or attribute name, `?xml`, `!--`, ...)
    Name,
    /// Quoted string inside a tag; the span excludes the quotes
    String,
    /// Text run between tags
    Text,
}

/// A lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlToken<'a> {
    pub kind: TokenKind,
    pub span: ByteSpan<'a>,
}

/// Current lexer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexState {
    /// Between tags
    Content,
    /// Between `<` and `>`
    Tag,
}

/// Pull tokenizer over a byte buffer
pub struct XmlTokenizer<'a> {
    input: ByteSpan<'a>,
    cursor: ByteSpan<'a>,
    state: LexState,
    error: Option<XmlError>,
}

impl<'a> XmlTokenizer<'a> {
    /// Create a tokenizer positioned in content state
    pub fn new(input: &'a [u8]) -> Self {
        let input = ByteSpan::new(input);
        XmlTokenizer {
            input,
            cursor: input,
            state: LexState::Content,
            error: None,
        }
    }

    /// Get the current lexer state
    pub fn state(&self) -> LexState {
        self.state
    }

    /// Byte offset of the cursor from the start of the input
    pub fn offset(&self) -> usize {
        self.input.size() - self.cursor.size()
    }

    /// First error encountered, if any
    pub fn error(&self) -> Option<&XmlError> {
        self.error.as_ref()
    }

    fn fail(&mut self, error: XmlError) -> Option<XmlToken<'a>> {
        log::debug!("xml tokenizer stopped: {error}");
        self.error = Some(error);
        None
    }

    /// Get the next token, or None at end of input or after an error
    pub fn next_token(&mut self) -> Option<XmlToken<'a>> {
        if self.error.is_some() {
            return None;
        }
        match self.state {
            LexState::Content => self.next_content_token(),
            LexState::Tag => self.next_tag_token(),
        }
    }

    fn next_content_token(&mut self) -> Option<XmlToken<'a>> {
        if self.cursor.peek()? == b'<' {
            let span = self.cursor.take(1);
            self.cursor.advance(1);
            self.state = LexState::Tag;
            return Some(XmlToken { kind: TokenKind::Lt, span });
        }

        let end = self.cursor.find_byte(b'<').unwrap_or(self.cursor.size());
        let span = self.cursor.take(end);
        self.cursor.advance(end);
        Some(XmlToken { kind: TokenKind::Text, span })
    }

    fn next_tag_token(&mut self) -> Option<XmlToken<'a>> {
        self.cursor.skip_while(&WHITESPACE);

        let offset = self.offset();
        let Some(b) = self.cursor.peek() else {
            return self.fail(XmlError::Unterminated { construct: "tag", offset });
        };

        let one = self.cursor.take(1);
        let kind = match b {
            b'>' => {
                self.state = LexState::Content;
                TokenKind::Gt
            }
            b'/' => TokenKind::Slash,
            b'=' => TokenKind::Eq,
            b'<' => return self.fail(XmlError::Unterminated { construct: "tag", offset }),
            b'"' | b'\'' => {
                let body = self.cursor.tail(1);
                let Some(close) = body.find_byte(b) else {
                    return self.fail(XmlError::UnterminatedString { offset });
                };
                self.cursor.advance(close + 2);
                return Some(XmlToken {
                    kind: TokenKind::String,
                    span: body.take(close),
                });
            }
            _ => {
                let span = self.cursor.take_until(&TAG_DELIMITERS);
                return Some(XmlToken { kind: TokenKind::Name, span });
            }
        };

        self.cursor.advance(1);
        Some(XmlToken { kind, span: one })
    }
}

impl<'a> Iterator for XmlTokenizer<'a> {
    type Item = XmlToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
