//! Path components and the path tracker shared by every transducer.
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;

use crate::{Event, PathError};

/// Splits an absolute path into its components.
///
/// The path must start with `/`. Repeated separators collapse, so `//a/` is
/// `["a"]`, and `/` is the empty list.
///
/// ```rust
/// use nodestream::parse_path;
///
/// assert_eq!(parse_path("/content//site/").unwrap(), ["content", "site"]);
/// assert!(parse_path("/").unwrap().is_empty());
/// assert!(parse_path("content").is_err());
/// ```
pub fn parse_path(path: &str) -> Result<Vec<String>, PathError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(if path.is_empty() {
            PathError::Empty
        } else {
            PathError::NotAbsolute(path.to_string())
        });
    };
    Ok(rest
        .split('/')
        .filter(|component| !component.is_empty())
        .map(ToString::to_string)
        .collect())
}

/// Whether `current` is `target` or lies below it.
///
/// Every path is in the subtree of the empty path.
#[must_use]
pub fn is_in_subtree<S: AsRef<str>>(current: &[S], target: &[S]) -> bool {
    current.len() >= target.len()
        && current
            .iter()
            .zip(target)
            .all(|(a, b)| a.as_ref() == b.as_ref())
}

/// Tracks the path of the innermost open root, node or property.
///
/// Feed every event to [`PathStack::apply`] in stream order. `Root` opens the
/// synthetic empty segment, `Node` and `Property` push their name and `Up`
/// pops exactly one segment, closing the root once no named segment is left.
/// Payload and error events leave the stack alone.
///
/// ```rust
/// use nodestream::{Event, PathStack};
///
/// let mut stack = PathStack::new();
/// stack.apply(&Event::Root);
/// stack.apply(&Event::node("a"));
/// stack.apply(&Event::property("String", "b"));
/// assert_eq!(stack.to_path_string(), "/a/b");
/// stack.apply(&Event::Up);
/// assert_eq!(stack.depth(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathStack {
    rooted: bool,
    segments: Vec<String>,
}

impl PathStack {
    /// Creates an empty stack, before any `Root`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the stack for one event.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::Root => self.rooted = true,
            Event::Node { name } | Event::Property { name, .. } => self.push(name.clone()),
            Event::Up => self.pop(),
            Event::Value { .. } | Event::BinaryValue { .. } | Event::Error(_) => {}
        }
    }

    /// Pushes a named segment.
    pub fn push(&mut self, name: String) {
        self.segments.push(name);
    }

    /// Pops the innermost segment. Popping with no named segments closes the
    /// root; popping a closed stack does nothing.
    pub fn pop(&mut self) {
        if self.segments.pop().is_none() {
            self.rooted = false;
        }
    }

    /// The named segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The number of named segments. The root is at depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether a root is open.
    #[must_use]
    pub fn is_rooted(&self) -> bool {
        self.rooted
    }

    /// The `/`-joined path, `/` for the root alone.
    #[must_use]
    pub fn to_path_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PathStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
