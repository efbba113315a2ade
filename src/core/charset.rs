//! Byte character classes
//!
//! A `CharSet` is a 256-bit membership table answering "is byte X in this class"
//! with a single shift and mask. Sets are built at compile time from literal
//! byte lists and copied freely.

/// 256-entry byte membership table
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CharSet {
    bits: [u64; 4],
}

impl CharSet {
    /// Build a set from a literal list of member bytes
    pub const fn new(members: &[u8]) -> Self {
        let mut bits = [0u64; 4];
        let mut i = 0;
        while i < members.len() {
            let b = members[i];
            bits[(b >> 6) as usize] |= 1u64 << (b & 63);
            i += 1;
        }
        CharSet { bits }
    }

    /// Build a set containing every byte in `lo..=hi`
    pub const fn from_range(lo: u8, hi: u8) -> Self {
        let mut bits = [0u64; 4];
        let mut b = lo as usize;
        while b <= hi as usize {
            bits[b >> 6] |= 1u64 << (b & 63);
            b += 1;
        }
        CharSet { bits }
    }

    /// The empty set
    pub const fn empty() -> Self {
        CharSet { bits: [0; 4] }
    }

    /// Test membership
    #[inline]
    pub const fn contains(&self, b: u8) -> bool {
        self.bits[(b >> 6) as usize] & (1u64 << (b & 63)) != 0
    }

    /// Return a copy with `b` added
    pub const fn insert(self, b: u8) -> Self {
        let mut bits = self.bits;
        bits[(b >> 6) as usize] |= 1u64 << (b & 63);
        CharSet { bits }
    }

    /// Union of two sets
    pub const fn union(self, other: CharSet) -> Self {
        CharSet {
            bits: [
                self.bits[0] | other.bits[0],
                self.bits[1] | other.bits[1],
                self.bits[2] | other.bits[2],
                self.bits[3] | other.bits[3],
            ],
        }
    }

    /// Every byte not in this set
    pub const fn complement(self) -> Self {
        CharSet {
            bits: [!self.bits[0], !self.bits[1], !self.bits[2], !self.bits[3]],
        }
    }

    /// Number of member bytes
    pub const fn len(&self) -> u32 {
        self.bits[0].count_ones()
            + self.bits[1].count_ones()
            + self.bits[2].count_ones()
            + self.bits[3].count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for CharSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for b in 0..=255u8 {
            if self.contains(b) {
                list.entry(&(b as char));
            }
        }
        list.finish()
    }
}

/// XML whitespace (space, tab, newline, carriage return)
pub const WHITESPACE: CharSet = CharSet::new(b" \t\r\n");

/// Separators allowed between path-data arguments
pub const PATH_SEPARATORS: CharSet = WHITESPACE.insert(b',');

/// ASCII decimal digits
pub const DIGITS: CharSet = CharSet::from_range(b'0', b'9');

/// Bytes that can begin a path-data number
pub const NUMBER_START: CharSet = DIGITS.union(CharSet::new(b"+-."));

/// The twenty SVG path command letters
pub const PATH_COMMANDS: CharSet = CharSet::new(b"MmLlHhVvCcSsQqTtAaZz");

/// XML NameStartChar, ASCII part plus every byte of a UTF-8 multibyte sequence
pub const XML_NAME_START: CharSet = CharSet::from_range(b'A', b'Z')
    .union(CharSet::from_range(b'a', b'z'))
    .union(CharSet::new(b"_:"))
    .union(CharSet::from_range(0x80, 0xFF));

/// XML NameChar
pub const XML_NAME_CHAR: CharSet = XML_NAME_START
    .union(DIGITS)
    .union(CharSet::new(b"-."));

/// Bytes that end a bare token inside a tag
pub const TAG_DELIMITERS: CharSet = WHITESPACE.union(CharSet::new(b"<>/=\"'"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_membership() {
        let set = CharSet::new(b"abc");
        assert!(set.contains(b'a'));
        assert!(set.contains(b'c'));
        assert!(!set.contains(b'd'));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_high_bytes() {
        assert!(XML_NAME_START.contains(0x80));
        assert!(XML_NAME_START.contains(0xFF));
        assert!(!XML_NAME_START.contains(b'1'));
        assert!(XML_NAME_CHAR.contains(b'1'));
    }

    #[test]
    fn test_complement_and_union() {
        let ws = WHITESPACE.complement();
        assert!(!ws.contains(b' '));
        assert!(ws.contains(b'x'));
        assert_eq!(ws.len(), 252);
        assert!(PATH_SEPARATORS.contains(b','));
        assert!(PATH_SEPARATORS.contains(b'\n'));
    }

    #[test]
    fn test_number_start() {
        for b in b"+-.0123456789" {
            assert!(NUMBER_START.contains(*b));
        }
        assert!(!NUMBER_START.contains(b'e'));
        assert!(!PATH_COMMANDS.contains(b'e'));
        assert!(PATH_COMMANDS.contains(b'z'));
    }

    #[test]
    fn test_empty() {
        assert!(CharSet::empty().is_empty());
        assert!(!CharSet::empty().contains(0));
    }
}
