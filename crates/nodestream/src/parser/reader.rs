use std::io::{self, BufRead};

use alloc::vec::Vec;
use bstr::ByteSlice;

use super::{ParserOptions, StreamingParser};
use crate::{Event, ReadError};

/// Pulls events out of a byte source, one line of input at a time.
///
/// Invalid UTF-8 is replaced with U+FFFD rather than rejected. A failing
/// reader ends the stream with an [`Event::Error`] carrying a
/// [`ReadError`](crate::ReadError).
///
/// ```rust
/// use nodestream::{Event, EventReader};
///
/// let input: &[u8] = b"r\nc a\n^\n^\n";
/// let events: Vec<_> = EventReader::new(input).collect();
/// assert_eq!(events, vec![Event::Root, Event::node("a"), Event::Up, Event::Up]);
/// ```
#[derive(Debug)]
pub struct EventReader<R> {
    reader: R,
    parser: StreamingParser,
    line: Vec<u8>,
}

impl<R: BufRead> EventReader<R> {
    /// Creates a reader with default parser options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ParserOptions::default())
    }

    /// Creates a reader with the given parser options.
    pub fn with_options(reader: R, options: ParserOptions) -> Self {
        Self {
            reader,
            parser: StreamingParser::new(options),
            line: Vec::new(),
        }
    }

    /// Reads the next line into the parser, or closes it at end of input.
    fn fill(&mut self) -> Result<(), io::Error> {
        self.line.clear();
        loop {
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => {
                    self.parser.close();
                    return Ok(());
                }
                Ok(_) => {
                    self.parser.feed(&self.line.to_str_lossy());
                    return Ok(());
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.parser.next() {
                return Some(event);
            }
            if self.parser.is_halted() {
                return None;
            }
            if let Err(err) = self.fill() {
                return Some(self.parser.halt(ReadError::from(err)));
            }
        }
    }
}
