//! Path command table
//!
//! Arity and per-argument kinds come from a static table indexed by command:
//! `c` coordinate, `r` radius, `a` angle, `f` flag.

/// One of the twenty SVG path command letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PathCommand {
    MoveTo = b'M',
    MoveToRel = b'm',
    LineTo = b'L',
    LineToRel = b'l',
    Horizontal = b'H',
    HorizontalRel = b'h',
    Vertical = b'V',
    VerticalRel = b'v',
    CubicTo = b'C',
    CubicToRel = b'c',
    SmoothCubicTo = b'S',
    SmoothCubicToRel = b's',
    QuadTo = b'Q',
    QuadToRel = b'q',
    SmoothQuadTo = b'T',
    SmoothQuadToRel = b't',
    ArcTo = b'A',
    ArcToRel = b'a',
    ClosePath = b'Z',
    ClosePathRel = b'z',
}

impl PathCommand {
    /// Command for a letter, or None if the byte is not a path command
    pub const fn from_byte(b: u8) -> Option<Self> {
        use PathCommand::*;
        Some(match b {
            b'M' => MoveTo,
            b'm' => MoveToRel,
            b'L' => LineTo,
            b'l' => LineToRel,
            b'H' => Horizontal,
            b'h' => HorizontalRel,
            b'V' => Vertical,
            b'v' => VerticalRel,
            b'C' => CubicTo,
            b'c' => CubicToRel,
            b'S' => SmoothCubicTo,
            b's' => SmoothCubicToRel,
            b'Q' => QuadTo,
            b'q' => QuadToRel,
            b'T' => SmoothQuadTo,
            b't' => SmoothQuadToRel,
            b'A' => ArcTo,
            b'a' => ArcToRel,
            b'Z' => ClosePath,
            b'z' => ClosePathRel,
            _ => return None,
        })
    }

    /// The command letter
    #[inline]
    pub const fn letter(self) -> char {
        self as u8 as char
    }

    /// Lowercase commands take coordinates relative to the current point
    #[inline]
    pub const fn is_relative(self) -> bool {
        (self as u8).is_ascii_lowercase()
    }

    /// Same command, absolute form
    pub const fn to_absolute(self) -> Self {
        match Self::from_byte((self as u8).to_ascii_uppercase()) {
            Some(cmd) => cmd,
            None => self,
        }
    }

    /// Argument kinds, one byte per argument
    pub const fn arg_kinds(self) -> &'static str {
        match (self as u8).to_ascii_uppercase() {
            b'M' | b'L' | b'T' => "cc",
            b'H' | b'V' => "c",
            b'C' => "cccccc",
            b'S' | b'Q' => "cccc",
            b'A' => "rraffcc",
            _ => "",
        }
    }

    /// Number of arguments per group
    #[inline]
    pub const fn arity(self) -> usize {
        self.arg_kinds().len()
    }

    #[inline]
    pub const fn is_close(self) -> bool {
        matches!(self, PathCommand::ClosePath | PathCommand::ClosePathRel)
    }

    #[inline]
    pub const fn is_move(self) -> bool {
        matches!(self, PathCommand::MoveTo | PathCommand::MoveToRel)
    }
}

impl std::fmt::Display for PathCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}
