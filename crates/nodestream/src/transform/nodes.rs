use alloc::string::String;

use crate::{Event, ParserError, PathStack};

/// Lists the fully qualified path of every node, the root included.
///
/// ```rust
/// use nodestream::{nodes, parse_str};
///
/// let paths: Result<Vec<_>, _> = nodes(parse_str("r\nc a\nc b\n^\n^\n^\n")).collect();
/// assert_eq!(paths.unwrap(), ["/", "/a", "/a/b"]);
/// ```
pub fn nodes<I>(events: I) -> Nodes<I::IntoIter>
where
    I: IntoIterator<Item = Event>,
{
    Nodes {
        events: events.into_iter(),
        current: PathStack::new(),
        done: false,
    }
}

/// Iterator returned by [`nodes`].
///
/// Yields at most one `Err`, after which it ends.
#[derive(Debug)]
pub struct Nodes<I> {
    events: I,
    current: PathStack,
    done: bool,
}

impl<I: Iterator<Item = Event>> Iterator for Nodes<I> {
    type Item = Result<String, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for event in self.events.by_ref() {
            if let Event::Error(err) = event {
                self.done = true;
                return Some(Err(err));
            }
            self.current.apply(&event);
            if matches!(event, Event::Root | Event::Node { .. }) {
                return Some(Ok(self.current.to_path_string()));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::{SyntaxError, parse_str};

    #[test]
    fn lists_nested_nodes() {
        let events = parse_str(
            "
		r
		c 1
		p t n
		v x
		^
		c 1.1
		p t n
		v x
		^
		^
		c 1.2
		^
		^
		^
	",
        );
        let paths: Vec<_> = nodes(events).collect::<Result<_, _>>().unwrap();
        assert_eq!(paths, ["/", "/1", "/1/1.1", "/1/1.2"]);
    }

    #[test]
    fn stops_at_the_first_error() {
        let results: Vec<_> = nodes(parse_str("r\nc a\n^\nc\nc b\n")).collect();
        assert_eq!(
            results,
            [
                Ok(String::from("/")),
                Ok(String::from("/a")),
                Err(ParserError::new(SyntaxError::UnexpectedNewline, 4)),
            ]
        );
    }
}
