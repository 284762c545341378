//! Single-pass tree transducers.
//!
//! Both filters track the current path with a [`PathStack`] and decide, event
//! by event, whether to forward. They are lazy iterator adapters: nothing is
//! read from the upstream iterator until the filter is polled, and an
//! [`Event::Error`] is passed through as soon as it arrives and ends the
//! filtered stream.
//!
//! [`PathStack`]: crate::PathStack
mod prune;
mod subtree;

pub use prune::Prune;
pub use subtree::Subtree;

use crate::{Event, PathError};

/// Drops the subtree rooted at `path` from `events`.
///
/// See [`Prune`].
pub fn prune<I>(path: &str, events: I) -> Result<Prune<I::IntoIter>, PathError>
where
    I: IntoIterator<Item = Event>,
{
    Prune::new(path, events.into_iter())
}

/// Keeps only the subtree rooted at `path`, re-rooted.
///
/// See [`Subtree`].
pub fn subtree<I>(path: &str, events: I) -> Result<Subtree<I::IntoIter>, PathError>
where
    I: IntoIterator<Item = Event>,
{
    Subtree::new(path, events.into_iter())
}

/// Method-call sugar for the filters.
///
/// ```rust
/// use nodestream::{EventsExt, parse_str};
///
/// let kept = parse_str("r\nc a\n^\nc b\n^\n^\n")
///     .prune("/a")?
///     .count();
/// assert_eq!(kept, 4);
/// # Ok::<(), nodestream::PathError>(())
/// ```
pub trait EventsExt: Iterator<Item = Event> + Sized {
    /// See [`Prune`].
    fn prune(self, path: &str) -> Result<Prune<Self>, PathError> {
        Prune::new(path, self)
    }

    /// See [`Subtree`].
    fn subtree(self, path: &str) -> Result<Subtree<Self>, PathError> {
        Subtree::new(path, self)
    }
}

impl<I: Iterator<Item = Event>> EventsExt for I {}

/// A two-level tree with one property on every node.
#[cfg(test)]
pub(crate) fn sample_events() -> alloc::vec::Vec<Event> {
    alloc::vec![
        Event::Root,
        Event::node("a"),
        Event::property("string", "p"),
        Event::value("a"),
        Event::Up, // /a[p]
        Event::node("c"),
        Event::property("string", "q"),
        Event::value("c"),
        Event::Up, // /a/c[q]
        Event::Up, // /a/c
        Event::Up, // /a
        Event::node("b"),
        Event::property("string", "r"),
        Event::value("b"),
        Event::Up, // /b[r]
        Event::node("d"),
        Event::property("string", "s"),
        Event::value("d"),
        Event::Up, // /b/d[s]
        Event::Up, // /b/d
        Event::Up, // /b
        Event::Up, // /
    ]
}
