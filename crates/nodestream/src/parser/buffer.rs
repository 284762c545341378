use alloc::string::String;

/// Unread input backing the lexer.
///
/// Text fed to the parser is appended at the tail; the lexer consumes it one
/// character at a time from `pos`. The consumed prefix is dropped on the next
/// push, so the buffer never holds more than one unread feed plus the new
/// chunk.
#[derive(Debug, Default)]
pub(crate) struct Buffer {
    text: String,
    pos: usize,
}

impl Buffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, text: &str) {
        if self.pos == self.text.len() {
            self.text.clear();
        } else if self.pos > 0 {
            self.text.drain(..self.pos);
        }
        self.pos = 0;
        self.text.push_str(text);
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.pos == self.text.len()
    }
}

impl Iterator for Buffer {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::Buffer;

    #[test]
    fn drains_across_pushes() {
        let mut buffer = Buffer::new();
        buffer.push("ab");
        assert_eq!(buffer.next(), Some('a'));
        buffer.push("cd");
        let rest: String = buffer.by_ref().collect();
        assert_eq!(rest, "bcd");
        assert!(buffer.is_empty());
    }

    #[test]
    fn multibyte_characters_are_whole() {
        let mut buffer = Buffer::new();
        buffer.push("é✓");
        assert_eq!(buffer.peek(), Some('é'));
        assert_eq!(buffer.next(), Some('é'));
        assert_eq!(buffer.next(), Some('✓'));
        assert_eq!(buffer.next(), None);
    }
}
