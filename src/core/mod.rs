//! Core scanning primitives
//!
//! This module contains the fundamental building blocks shared by the XML and
//! path-data readers:
//! - CharSet: 256-bit byte class tables
//! - ByteSpan: zero-copy cursor over the input, searches via memchr
//! - Number: path-data number and flag scanning
//! - Tokenizer: two-state lexer for XML tokens
//! - Scanner: element-level reader (tags, comments, CDATA, DOCTYPE, ...)
//! - Attributes: `name="value"` walker over tag interiors

pub mod attributes;
pub mod charset;
pub mod number;
pub mod scanner;
pub mod span;
pub mod tokenizer;

pub use attributes::{Attribute, AttributeReader};
pub use charset::CharSet;
pub use scanner::{read_element, ElementKind, ElementScanner, ScanOptions, XmlElement};
pub use span::ByteSpan;
pub use tokenizer::{TokenKind, XmlToken, XmlTokenizer};
