use alloc::{string::String, vec::Vec};

use crate::{Event, PathError, PathStack, is_in_subtree, parse_path};

/// Removes the subtree rooted at a path, and nothing else.
///
/// The `Node` that enters the pruned path, everything below it and its
/// closing `Up` are dropped. Pruning `/` drops the whole stream; pruning a
/// path that never occurs forwards the stream unchanged.
///
/// ```rust
/// use nodestream::{Event, Prune, parse_str};
///
/// let events = parse_str("r\nc a\n^\nc b\n^\n^\n");
/// let kept: Vec<_> = Prune::new("/a", events)?.collect();
/// assert_eq!(kept, vec![Event::Root, Event::node("b"), Event::Up, Event::Up]);
/// # Ok::<(), nodestream::PathError>(())
/// ```
#[derive(Debug)]
pub struct Prune<I> {
    events: I,
    target: Vec<String>,
    current: PathStack,
    emit: bool,
    done: bool,
}

impl<I: Iterator<Item = Event>> Prune<I> {
    /// Creates a filter that prunes `path` from `events`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not an absolute path.
    pub fn new(path: &str, events: I) -> Result<Self, PathError> {
        Ok(Self {
            events,
            target: parse_path(path)?,
            current: PathStack::new(),
            emit: false,
            done: false,
        })
    }

    fn outside_target(&self) -> bool {
        !is_in_subtree(self.current.segments(), &self.target)
    }
}

impl<I: Iterator<Item = Event>> Iterator for Prune<I> {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let event = self.events.next()?;
            let forward = match &event {
                Event::Error(_) => {
                    self.done = true;
                    true
                }
                Event::Root | Event::Node { .. } => {
                    self.current.apply(&event);
                    self.emit = self.outside_target();
                    self.emit
                }
                // A property never changes the decision of its node.
                Event::Property { .. } => {
                    self.current.apply(&event);
                    self.emit
                }
                Event::Up => {
                    let forward = self.emit;
                    self.current.apply(&event);
                    self.emit = self.outside_target();
                    forward
                }
                Event::Value { .. } | Event::BinaryValue { .. } => self.emit,
            };
            if forward {
                return Some(event);
            }
        }
    }
}
