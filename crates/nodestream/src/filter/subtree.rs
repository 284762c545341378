use alloc::{string::String, vec::Vec};

use crate::{Event, PathError, PathStack, is_in_subtree, parse_path};

/// Keeps only the subtree rooted at a path, and makes it the new root.
///
/// The `Node` that enters the path is rewritten to [`Event::Root`]; its
/// closing `Up` closes the new root. Everything outside the path is
/// dropped. The subtree of `/` is the whole stream; the subtree of a path
/// that never occurs is empty.
///
/// ```rust
/// use nodestream::{Event, Subtree, parse_str};
///
/// let events = parse_str("r\nc a\nc b\n^\n^\nc c\n^\n^\n");
/// let kept: Vec<_> = Subtree::new("/a", events)?.collect();
/// assert_eq!(
///     kept,
///     vec![Event::Root, Event::node("b"), Event::Up, Event::Up]
/// );
/// # Ok::<(), nodestream::PathError>(())
/// ```
#[derive(Debug)]
pub struct Subtree<I> {
    events: I,
    target: Vec<String>,
    current: PathStack,
    send: bool,
    done: bool,
}

impl<I: Iterator<Item = Event>> Subtree<I> {
    /// Creates a filter that extracts `path` from `events`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not an absolute path.
    pub fn new(path: &str, events: I) -> Result<Self, PathError> {
        Ok(Self {
            events,
            target: parse_path(path)?,
            current: PathStack::new(),
            send: false,
            done: false,
        })
    }

    fn inside_target(&self) -> bool {
        is_in_subtree(self.current.segments(), &self.target)
    }
}

impl<I: Iterator<Item = Event>> Iterator for Subtree<I> {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let event = self.events.next()?;
            match &event {
                Event::Error(_) => {
                    self.done = true;
                    return Some(event);
                }
                Event::Root => {
                    self.current.apply(&event);
                    self.send = self.inside_target();
                    if self.send {
                        return Some(event);
                    }
                }
                Event::Node { .. } => {
                    self.current.apply(&event);
                    if self.send {
                        return Some(event);
                    }
                    self.send = self.inside_target();
                    if self.send {
                        return Some(Event::Root);
                    }
                }
                Event::Property { .. } => {
                    self.current.apply(&event);
                    if self.send {
                        return Some(event);
                    }
                }
                Event::Up => {
                    let send = self.send;
                    self.current.apply(&event);
                    self.send = self.inside_target();
                    if send {
                        return Some(event);
                    }
                }
                Event::Value { .. } | Event::BinaryValue { .. } => {
                    if self.send {
                        return Some(event);
                    }
                }
            }
        }
    }
}
