//! The export parser.
//!
//! The parser is a character-level state machine: every step consumes
//! exactly one character (or the end-of-input marker) and at most one
//! [`Event`] falls out of it. Text can be fed in arbitrary chunks; events are
//! pulled through `Iterator`, and only the partial token of the current line
//! is ever held.
//!
//! # Examples
//!
//! ```rust
//! use nodestream::{Event, ParserOptions, StreamingParser};
//!
//! let mut parser = StreamingParser::new(ParserOptions::default());
//! parser.feed("r\nc fo");
//! assert_eq!(parser.next(), Some(Event::Root));
//! assert_eq!(parser.next(), None); // the name may continue
//! parser.feed("o\n^\n");
//! let rest: Vec<_> = parser.finish().collect();
//! assert_eq!(rest, vec![Event::node("foo"), Event::Up]);
//! ```
#![allow(clippy::enum_glob_use)]

mod buffer;
mod options;
#[cfg(feature = "std")]
mod reader;

#[cfg(test)]
mod tests;

use alloc::string::String;
use core::mem;

use buffer::Buffer;
pub use options::ParserOptions;
#[cfg(feature = "std")]
pub use reader::EventReader;

use crate::{ErrorSource, Event, ParserError, SyntaxError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Represents a peeked character from the input buffer.
enum PeekedChar {
    /// The buffer is drained but more input may follow.
    Empty,
    /// Some character
    Char(char),
    /// End of input, the input stream is closed.
    EndOfInput,
}

use PeekedChar::*;

/// Which command is being lexed, and where within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    /// Between commands.
    Start,
    /// After `r`.
    Root,
    /// After `^`.
    Up,
    /// After `c`, before the mandatory whitespace.
    Node,
    NodeSpace,
    NodeName,
    /// After `p`, before the mandatory whitespace.
    Property,
    PropertySpace,
    PropertyType,
    PropertyTypeSpace,
    PropertyName,
    /// After `v`.
    Value,
    ValueSpace,
    ValueData,
    /// After a backslash in a literal value.
    ValueEscape,
    /// After `x`.
    Binary,
    BinarySpace,
    BinaryData,
    End,
    Error,
}

/// The streaming export parser.
///
/// `StreamingParser` can be fed partial or complete input in chunks. It
/// implements `Iterator` to yield the [`Event`]s that the input fed so far
/// fully determines; call [`StreamingParser::finish`] once the input is
/// exhausted to flush the last command.
///
/// A malformed input produces exactly one [`Event::Error`], for the first
/// problem found, after which the parser yields nothing.
#[derive(Debug)]
pub struct StreamingParser {
    source: Buffer,
    end_of_input: bool,

    line: usize,
    state: LexState,

    /// Node name, property name or payload being accumulated.
    buffer: String,
    /// Property type, kept until the name is complete.
    ty: String,

    ascii_whitespace_only: bool,
}

impl Default for StreamingParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl Iterator for StreamingParser {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

/// A [`StreamingParser`] that has been closed to further input.
///
/// Returned by [`StreamingParser::finish`] and [`parse_str`]. It yields the
/// remaining events, including a final command that was not terminated by a
/// newline, and then ends.
#[derive(Debug)]
pub struct ClosedStreamingParser {
    parser: StreamingParser,
}

impl Iterator for ClosedStreamingParser {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        self.parser.next_event()
    }
}

/// Parses a complete export held in memory.
///
/// ```rust
/// use nodestream::{Event, parse_str};
///
/// let events: Vec<_> = parse_str("c\n").collect();
/// assert!(matches!(&events[..], [Event::Error(err)] if err.line == 1));
/// ```
#[must_use]
pub fn parse_str(text: &str) -> ClosedStreamingParser {
    let mut parser = StreamingParser::default();
    parser.feed(text);
    parser.finish()
}

impl StreamingParser {
    /// Creates a new parser with the given options.
    #[must_use]
    pub fn new(options: ParserOptions) -> Self {
        Self {
            source: Buffer::new(),
            end_of_input: false,
            line: 1,
            state: LexState::Start,
            buffer: String::new(),
            ty: String::new(),
            ascii_whitespace_only: options.ascii_whitespace_only,
        }
    }

    /// Feeds a chunk of export text into the parser.
    ///
    /// Chunks may split commands anywhere, even inside a name or payload.
    pub fn feed(&mut self, text: &str) {
        self.source.push(text);
    }

    /// Marks the end of input and returns a closed parser to consume pending
    /// events.
    #[must_use]
    pub fn finish(mut self) -> ClosedStreamingParser {
        self.close();
        ClosedStreamingParser { parser: self }
    }

    /// The 1-based line the parser is currently on.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    pub(crate) fn close(&mut self) {
        self.end_of_input = true;
    }

    /// Whether the parser reached the end of input or failed.
    pub(crate) fn is_halted(&self) -> bool {
        matches!(self.state, LexState::End | LexState::Error)
    }

    /// Stops the parser with an error that did not come from the lexer.
    pub(crate) fn halt(&mut self, source: impl Into<ErrorSource>) -> Event {
        self.state = LexState::Error;
        Event::Error(ParserError::new(source, self.line))
    }

    /// Drive the lexer until it either
    ///   * produces one `Event`,
    ///   * runs out of buffered input, or
    ///   * halts at end of input or on an error.
    fn next_event(&mut self) -> Option<Event> {
        loop {
            if self.is_halted() {
                return None;
            }
            let next_char = self.peek_char();
            if next_char == Empty {
                return None;
            }
            self.source.next();
            if let Some(event) = self.lex_state_step(next_char) {
                return Some(event);
            }
        }
    }

    fn peek_char(&self) -> PeekedChar {
        if let Some(c) = self.source.peek() {
            return Char(c);
        }
        if self.end_of_input {
            return EndOfInput;
        }
        Empty
    }

    fn is_whitespace(&self, c: char) -> bool {
        if self.ascii_whitespace_only {
            c.is_ascii_whitespace()
        } else {
            c.is_whitespace()
        }
    }

    /// Emits `event` as the command ends at a newline or at end of input.
    fn flush(&mut self, c: PeekedChar, event: Event) -> Option<Event> {
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(
            self.buffer.is_empty() && self.ty.is_empty(),
            "Internal error: token left behind by {event:?}"
        );
        if c == EndOfInput {
            self.state = LexState::End;
        } else {
            self.line += 1;
            self.state = LexState::Start;
        }
        Some(event)
    }

    fn fail(&mut self, err: SyntaxError) -> Option<Event> {
        Some(self.halt(err))
    }

    /// Rejects `c` in a state that needs more characters of the command.
    fn incomplete(&mut self, c: PeekedChar) -> Option<Event> {
        match c {
            Char('\n') => self.fail(SyntaxError::UnexpectedNewline),
            Char(c) => self.fail(SyntaxError::InvalidCharacter(c)),
            EndOfInput | Empty => self.fail(SyntaxError::UnexpectedEndOfInput),
        }
    }

    fn take_buffer(&mut self) -> String {
        mem::take(&mut self.buffer)
    }

    fn start_buffer(&mut self, c: char) {
        self.buffer.clear();
        self.buffer.push(c);
    }

    #[allow(clippy::too_many_lines)]
    fn lex_state_step(&mut self, next_char: PeekedChar) -> Option<Event> {
        use LexState::*;

        match self.state {
            End | Error => None,

            Start => match next_char {
                EndOfInput | Empty => {
                    self.state = End;
                    None
                }
                Char('\n') => {
                    self.line += 1;
                    None
                }
                Char(c) if self.is_whitespace(c) => None,
                Char('r') => {
                    self.state = Root;
                    None
                }
                Char('^') => {
                    self.state = Up;
                    None
                }
                Char('c') => {
                    self.state = Node;
                    None
                }
                Char('p') => {
                    self.state = Property;
                    None
                }
                Char('v') => {
                    self.state = Value;
                    None
                }
                Char('x') => {
                    self.state = Binary;
                    None
                }
                Char(c) => self.fail(SyntaxError::InvalidCharacter(c)),
            },

            // ------------------------- r and ^ --------------------------
            Root | Up => {
                let event = if self.state == Root {
                    Event::Root
                } else {
                    Event::Up
                };
                match next_char {
                    EndOfInput | Char('\n') => self.flush(next_char, event),
                    Char(c) if self.is_whitespace(c) => None,
                    c => self.incomplete(c),
                }
            }

            // ------------------------- c <name> -------------------------
            Node => match next_char {
                Char(c) if c != '\n' && self.is_whitespace(c) => {
                    self.state = NodeSpace;
                    None
                }
                c => self.incomplete(c),
            },
            NodeSpace => match next_char {
                Char(c) if c != '\n' && self.is_whitespace(c) => None,
                Char(c) if c != '\n' => {
                    self.start_buffer(c);
                    self.state = NodeName;
                    None
                }
                c => self.incomplete(c),
            },
            NodeName => match next_char {
                EndOfInput | Char('\n') => {
                    let name = self.take_buffer();
                    self.flush(next_char, Event::Node { name })
                }
                Char(c) => {
                    self.buffer.push(c);
                    None
                }
                Empty => None,
            },

            // ---------------------- p <type> <name> ---------------------
            Property => match next_char {
                Char(c) if c != '\n' && self.is_whitespace(c) => {
                    self.state = PropertySpace;
                    None
                }
                c => self.incomplete(c),
            },
            PropertySpace => match next_char {
                Char(c) if c != '\n' && self.is_whitespace(c) => None,
                Char(c) if c != '\n' => {
                    self.ty.clear();
                    self.ty.push(c);
                    self.state = PropertyType;
                    None
                }
                c => self.incomplete(c),
            },
            PropertyType => match next_char {
                Char(c) if c != '\n' && self.is_whitespace(c) => {
                    self.state = PropertyTypeSpace;
                    None
                }
                Char(c) if c != '\n' => {
                    self.ty.push(c);
                    None
                }
                c => self.incomplete(c),
            },
            PropertyTypeSpace => match next_char {
                Char(c) if c != '\n' && self.is_whitespace(c) => None,
                Char(c) if c != '\n' => {
                    self.start_buffer(c);
                    self.state = PropertyName;
                    None
                }
                c => self.incomplete(c),
            },
            PropertyName => match next_char {
                EndOfInput | Char('\n') => {
                    let event = Event::Property {
                        ty: mem::take(&mut self.ty),
                        name: self.take_buffer(),
                    };
                    self.flush(next_char, event)
                }
                Char(c) => {
                    self.buffer.push(c);
                    None
                }
                Empty => None,
            },

            // ------------------------- v [<data>] -----------------------
            Value | ValueSpace => match next_char {
                EndOfInput | Char('\n') => {
                    self.flush(next_char, Event::Value { data: String::new() })
                }
                Char(c) if self.is_whitespace(c) => {
                    self.state = ValueSpace;
                    None
                }
                Char(c) if self.state == ValueSpace => {
                    self.buffer.clear();
                    if c == '\\' {
                        self.state = ValueEscape;
                    } else {
                        self.buffer.push(c);
                        self.state = ValueData;
                    }
                    None
                }
                c => self.incomplete(c),
            },
            ValueData => match next_char {
                EndOfInput | Char('\n') => {
                    let data = self.take_buffer();
                    self.flush(next_char, Event::Value { data })
                }
                Char('\\') => {
                    self.state = ValueEscape;
                    None
                }
                Char(c) => {
                    self.buffer.push(c);
                    None
                }
                Empty => None,
            },
            ValueEscape => match next_char {
                Char('\\') => {
                    self.buffer.push('\\');
                    self.state = ValueData;
                    None
                }
                Char('n') => {
                    self.buffer.push('\n');
                    self.state = ValueData;
                    None
                }
                Char(c) if c != '\n' => self.fail(SyntaxError::InvalidEscape(c)),
                c => self.incomplete(c),
            },

            // ------------------------- x [<data>] -----------------------
            Binary | BinarySpace => match next_char {
                EndOfInput | Char('\n') => {
                    self.flush(next_char, Event::BinaryValue { data: String::new() })
                }
                Char(c) if self.is_whitespace(c) => {
                    self.state = BinarySpace;
                    None
                }
                Char(c) if self.state == BinarySpace => {
                    self.start_buffer(c);
                    self.state = BinaryData;
                    None
                }
                c => self.incomplete(c),
            },
            BinaryData => match next_char {
                EndOfInput | Char('\n') => {
                    let data = self.take_buffer();
                    self.flush(next_char, Event::BinaryValue { data })
                }
                Char(c) => {
                    self.buffer.push(c);
                    None
                }
                Empty => None,
            },
        }
    }
}
