use alloc::string::String;

use thiserror::Error;

/// A lexical or read failure reported by the parser, tagged with the 1-based
/// line where it was detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source} at line {line}")]
pub struct ParserError {
    /// What went wrong.
    pub source: ErrorSource,
    /// The line the parser was on when the failure was detected.
    pub line: usize,
}

impl ParserError {
    pub(crate) fn new(source: impl Into<ErrorSource>, line: usize) -> Self {
        Self {
            source: source.into(),
            line,
        }
    }

    /// Returns `true` if the input was malformed, as opposed to unreadable.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self.source, ErrorSource::Syntax(_))
    }
}

/// The cause of a [`ParserError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorSource {
    /// The input does not follow the export grammar.
    #[error("invalid input: {0}")]
    Syntax(#[from] SyntaxError),
    /// The byte source failed.
    #[cfg(feature = "std")]
    #[error("read error: {0}")]
    Read(#[from] ReadError),
}

/// Lexical failures. Every one of them terminates the event stream.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxError {
    /// A character that no command accepts at this position.
    #[error("unexpected character '{}'", .0.escape_debug())]
    InvalidCharacter(char),
    /// A backslash in a literal value followed by something other than `\`
    /// or `n`.
    #[error("invalid escape sequence '\\{}'", .0.escape_debug())]
    InvalidEscape(char),
    /// The line ended before the command was complete.
    #[error("unexpected end of line")]
    UnexpectedNewline,
    /// The input ended before the command was complete.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// An I/O failure from the byte source.
///
/// Only the kind and the message are kept, so that events carrying it stay
/// cloneable and comparable.
#[cfg(feature = "std")]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ReadError {
    /// The kind reported by the reader.
    pub kind: std::io::ErrorKind,
    /// The rendered error.
    pub message: String,
}

#[cfg(feature = "std")]
impl From<std::io::Error> for ReadError {
    fn from(err: std::io::Error) -> Self {
        use alloc::string::ToString;

        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// A target path that cannot be split into components.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path is the empty string.
    #[error("invalid path: empty")]
    Empty,
    /// The path does not start with `/`.
    #[error("invalid path '{0}': must start with '/'")]
    NotAbsolute(String),
}

/// A failure while aggregating statistics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// The event stream carried a parse failure.
    #[error(transparent)]
    Parse(#[from] ParserError),
    /// An event that the grammar does not allow in the current context.
    #[error("unexpected {found} event, expected {expected}")]
    UnexpectedEvent {
        /// The events that would have been legal.
        expected: &'static str,
        /// The kind of event that was found.
        found: &'static str,
    },
    /// The stream ended while a node or property was still open.
    #[error("unexpected end of events: {open} open context(s) left")]
    UnexpectedEnd {
        /// How many contexts were not closed.
        open: usize,
    },
}

/// A failure while rendering events back to text.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The event stream carried a parse failure.
    #[error(transparent)]
    Parse(#[from] ParserError),
    /// The formatter rejected the output.
    #[error("formatting failed")]
    Fmt(#[from] core::fmt::Error),
    /// The writer failed.
    #[cfg(feature = "std")]
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}
