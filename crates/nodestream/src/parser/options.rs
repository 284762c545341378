/// Configuration options for the export parser.
///
/// # Examples
///
/// ```rust
/// use nodestream::{ParserOptions, StreamingParser};
///
/// let parser = StreamingParser::new(ParserOptions {
///     ascii_whitespace_only: true,
/// });
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// Whether only ASCII whitespace separates commands and operands.
    ///
    /// By default any Unicode whitespace (`char::is_whitespace`) is skipped,
    /// including no-break spaces and the Unicode line separators. When
    /// `true`, such characters are rejected where whitespace is expected and
    /// kept verbatim inside names and payloads.
    ///
    /// The line feed always terminates a command regardless of this option.
    ///
    /// # Default
    ///
    /// `false`
    pub ascii_whitespace_only: bool,
}
