//! Error types for the scanner and the path pipeline
//!
//! Every error carries the byte offset (from the start of the scanned input)
//! where reading stopped.

/// Malformed markup found by the element scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum XmlError {
    #[error("unterminated {construct} starting at byte {offset}")]
    Unterminated { construct: &'static str, offset: usize },

    #[error("unknown declaration at byte {offset}")]
    UnknownDeclaration { offset: usize },

    #[error("invalid or missing name at byte {offset}")]
    InvalidName { offset: usize },

    #[error("unterminated quoted string at byte {offset}")]
    UnterminatedString { offset: usize },
}

impl XmlError {
    /// Shift the offset by `base`, for errors found in a sub-span
    pub fn rebase(self, base: usize) -> Self {
        match self {
            XmlError::Unterminated { construct, offset } => XmlError::Unterminated {
                construct,
                offset: offset + base,
            },
            XmlError::UnknownDeclaration { offset } => XmlError::UnknownDeclaration { offset: offset + base },
            XmlError::InvalidName { offset } => XmlError::InvalidName { offset: offset + base },
            XmlError::UnterminatedString { offset } => XmlError::UnterminatedString { offset: offset + base },
        }
    }

    pub fn offset(&self) -> usize {
        match *self {
            XmlError::Unterminated { offset, .. }
            | XmlError::UnknownDeclaration { offset }
            | XmlError::InvalidName { offset }
            | XmlError::UnterminatedString { offset } => offset,
        }
    }
}

/// Malformed path data found by the segment reader
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("unknown path command {found:?} at byte {offset}")]
    UnknownCommand { found: char, offset: usize },

    #[error("number at byte {offset} does not follow a repeatable command")]
    UnexpectedNumber { offset: usize },

    #[error("command '{command}' is missing arguments at byte {offset}")]
    MissingArguments { command: char, offset: usize },

    #[error("invalid number at byte {offset}")]
    InvalidNumber { offset: usize },

    #[error("invalid arc flag at byte {offset}")]
    InvalidFlag { offset: usize },
}

impl PathError {
    pub fn offset(&self) -> usize {
        match *self {
            PathError::UnknownCommand { offset, .. }
            | PathError::UnexpectedNumber { offset }
            | PathError::MissingArguments { offset, .. }
            | PathError::InvalidNumber { offset }
            | PathError::InvalidFlag { offset } => offset,
        }
    }
}
