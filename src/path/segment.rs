//! Path segment reader
//!
//! Pulls one command plus its argument group per call from a `d` attribute.
//! Numbers following a completed group repeat the current command (implicit
//! repetition), with `iteration` counting the repeats.

use super::command::PathCommand;
use crate::core::charset::{NUMBER_START, PATH_SEPARATORS};
use crate::core::number::{read_flag, read_number};
use crate::core::span::ByteSpan;
use crate::error::PathError;

/// Maximum arguments of any command (A has 7)
pub const MAX_ARGS: usize = 8;

/// One command and its argument group
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSegment {
    pub command: PathCommand,
    /// 0 for the group right after the letter, then 1, 2, ... for repeats
    pub iteration: u32,
    pub arg_kinds: &'static str,
    pub args: [f64; MAX_ARGS],
    pub arg_count: u8,
}

impl PathSegment {
    /// Arguments actually read
    #[inline]
    pub fn args(&self) -> &[f64] {
        &self.args[..self.arg_count as usize]
    }

    #[inline]
    pub fn arg(&self, index: usize) -> f64 {
        self.args[index]
    }
}

/// Streaming reader over path data
pub struct SegmentReader<'a> {
    input: ByteSpan<'a>,
    cursor: ByteSpan<'a>,
    command: Option<PathCommand>,
    iteration: u32,
    error: Option<PathError>,
}

impl<'a> SegmentReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        let input = ByteSpan::new(input);
        SegmentReader {
            input,
            cursor: input,
            command: None,
            iteration: 0,
            error: None,
        }
    }

    /// Byte offset of the cursor from the start of the input
    pub fn offset(&self) -> usize {
        self.input.size() - self.cursor.size()
    }

    /// First error encountered, if any
    pub fn error(&self) -> Option<&PathError> {
        self.error.as_ref()
    }

    /// Consume the reader, returning the first error
    pub fn into_error(self) -> Option<PathError> {
        self.error
    }

    fn fail(&mut self, error: PathError) -> Option<PathSegment> {
        log::debug!("path reader stopped: {error}");
        self.error = Some(error);
        None
    }

    /// Read the next segment, or None at end of input or after an error
    pub fn next_segment(&mut self) -> Option<PathSegment> {
        if self.error.is_some() {
            return None;
        }

        self.cursor.skip_while(&PATH_SEPARATORS);
        let offset = self.offset();
        let b = self.cursor.peek()?;

        let command = if let Some(cmd) = PathCommand::from_byte(b) {
            self.cursor.advance(1);
            self.command = Some(cmd);
            self.iteration = 0;
            cmd
        } else if NUMBER_START.contains(b) {
            match self.command {
                Some(cmd) if !cmd.is_close() => {
                    self.iteration += 1;
                    cmd
                }
                _ => return self.fail(PathError::UnexpectedNumber { offset }),
            }
        } else {
            return self.fail(PathError::UnknownCommand {
                found: b as char,
                offset,
            });
        };

        let arg_kinds = command.arg_kinds();
        let mut args = [0.0; MAX_ARGS];
        for (slot, kind) in args.iter_mut().zip(arg_kinds.bytes()) {
            self.cursor.skip_while(&PATH_SEPARATORS);
            let at = self.offset();
            let Some(next) = self.cursor.peek() else {
                return self.fail(PathError::MissingArguments {
                    command: command.letter(),
                    offset: at,
                });
            };

            *slot = if kind == b'f' {
                match read_flag(&mut self.cursor) {
                    Some(flag) => f64::from(u8::from(flag)),
                    None => return self.fail(PathError::InvalidFlag { offset: at }),
                }
            } else if NUMBER_START.contains(next) {
                match read_number(&mut self.cursor) {
                    Some(value) => value,
                    None => return self.fail(PathError::InvalidNumber { offset: at }),
                }
            } else {
                return self.fail(PathError::MissingArguments {
                    command: command.letter(),
                    offset: at,
                });
            };
        }

        Some(PathSegment {
            command,
            iteration: self.iteration,
            arg_kinds,
            args,
            arg_count: arg_kinds.len() as u8,
        })
    }
}

impl Iterator for SegmentReader<'_> {
    type Item = PathSegment;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_segment()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(d: &str) -> Vec<PathSegment> {
        SegmentReader::new(d.as_bytes()).collect()
    }

    #[test]
    fn test_basic_commands() {
        let segs = read("M10,10 L20,20 L30,10");
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[0].command, PathCommand::MoveTo);
        assert_eq!(segs[0].args(), &[10.0, 10.0]);
        assert_eq!(segs[2].args(), &[30.0, 10.0]);
        assert!(segs.iter().all(|s| s.iteration == 0));
    }

    #[test]
    fn test_offset_after_partial_read() {
        let mut reader = SegmentReader::new(b"M10,10 L20,20");
        assert_eq!(reader.offset(), 0);
        assert_eq!(reader.next().map(|s| s.command), Some(PathCommand::MoveTo));
        assert_eq!(reader.offset(), 6);
        assert_eq!(reader.next().map(|s| s.command), Some(PathCommand::LineTo));
        assert_eq!(reader.offset(), 13);
        assert!(reader.next().is_none());
        assert!(reader.error().is_none());
    }

    #[test]
    fn test_implicit_repetition() {
        let segs = read("L 10 10 20 20");
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].iteration, 0);
        assert_eq!(segs[1].iteration, 1);
        assert_eq!(segs[1].command, PathCommand::LineTo);
        assert_eq!(segs[1].args(), &[20.0, 20.0]);
    }

    #[test]
    fn test_iteration_resets_on_new_letter() {
        let segs = read("m0 0 1 1 2 2 l3 3");
        let iterations: Vec<_> = segs.iter().map(|s| s.iteration).collect();
        assert_eq!(iterations, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_arg_count_matches_arity() {
        for seg in read("M0 0 H5 V5 C1 2 3 4 5 6 S1 2 3 4 Q1 2 3 4 T5 5 A5 5 0 1 0 9 9 Z") {
            assert_eq!(seg.arg_count as usize, seg.command.arity());
            assert_eq!(seg.arg_kinds, seg.command.arg_kinds());
        }
    }

    #[test]
    fn test_concatenated_flags() {
        let segs = read("A 5 5 0 11 10 10");
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].args(), &[5.0, 5.0, 0.0, 1.0, 1.0, 10.0, 10.0]);
        // flags need no separator before the following coordinate either
        let segs = read("a5 5 0 1110 10");
        assert_eq!(segs[0].args(), &[5.0, 5.0, 0.0, 1.0, 1.0, 10.0, 10.0]);
    }

    #[test]
    fn test_compact_numbers() {
        let segs = read("M.5.5L-1-1");
        assert_eq!(segs[0].args(), &[0.5, 0.5]);
        assert_eq!(segs[1].args(), &[-1.0, -1.0]);
        let segs = read("M1e2,2E-1");
        assert_eq!(segs[0].args(), &[100.0, 0.2]);
    }

    #[test]
    fn test_unknown_command() {
        let mut reader = SegmentReader::new(b"M0 0 X 1 1");
        assert!(reader.next().is_some());
        assert!(reader.next().is_none());
        assert_eq!(
            reader.error(),
            Some(&PathError::UnknownCommand { found: 'X', offset: 5 })
        );
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_missing_arguments() {
        let mut reader = SegmentReader::new(b"M0 0 C1 2 3");
        let _ = reader.by_ref().count();
        assert_eq!(
            reader.error(),
            Some(&PathError::MissingArguments { command: 'C', offset: 11 })
        );
    }

    #[test]
    fn test_letter_inside_group_is_missing_argument() {
        let mut reader = SegmentReader::new(b"L10 Z");
        assert!(reader.next().is_none());
        assert!(matches!(reader.error(), Some(PathError::MissingArguments { command: 'L', .. })));
    }

    #[test]
    fn test_number_after_close() {
        let mut reader = SegmentReader::new(b"M0 0 Z 5 5");
        assert_eq!(reader.by_ref().count(), 2);
        assert_eq!(reader.error(), Some(&PathError::UnexpectedNumber { offset: 7 }));
    }

    #[test]
    fn test_number_without_command() {
        let mut reader = SegmentReader::new(b"10 10");
        assert!(reader.next().is_none());
        assert_eq!(reader.error(), Some(&PathError::UnexpectedNumber { offset: 0 }));
    }

    #[test]
    fn test_bad_flag_and_number() {
        let mut reader = SegmentReader::new(b"A5 5 0 2 0 1 1");
        assert!(reader.next().is_none());
        assert_eq!(reader.error(), Some(&PathError::InvalidFlag { offset: 7 }));

        let mut reader = SegmentReader::new(b"M-. 0");
        assert!(reader.next().is_none());
        assert_eq!(reader.error(), Some(&PathError::InvalidNumber { offset: 1 }));
    }

    #[test]
    fn test_empty_and_separators_only() {
        assert!(read("").is_empty());
        let mut reader = SegmentReader::new(b" ,\n ");
        assert!(reader.next().is_none());
        assert!(reader.error().is_none());
    }
}
