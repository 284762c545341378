use alloc::string::String;

use crate::{Event, ParserError, PathStack};

/// The fully qualified path of a property and its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
pub struct PropertyPath {
    /// The declared type.
    #[cfg_attr(any(test, feature = "serde"), serde(rename = "type"))]
    pub ty: String,
    /// The path of the owning node, followed by the property name.
    pub path: String,
}

/// Lists every property with its fully qualified path.
///
/// ```rust
/// use nodestream::{PropertyPath, parse_str, properties};
///
/// let found: Result<Vec<_>, _> =
///     properties(parse_str("r\nc a\np Long n\nv 1\n^\n^\n^\n")).collect();
/// assert_eq!(
///     found.unwrap(),
///     [PropertyPath { ty: "Long".into(), path: "/a/n".into() }]
/// );
/// ```
pub fn properties<I>(events: I) -> Properties<I::IntoIter>
where
    I: IntoIterator<Item = Event>,
{
    Properties {
        events: events.into_iter(),
        current: PathStack::new(),
        done: false,
    }
}

/// Iterator returned by [`properties`].
#[derive(Debug)]
pub struct Properties<I> {
    events: I,
    current: PathStack,
    done: bool,
}

impl<I: Iterator<Item = Event>> Iterator for Properties<I> {
    type Item = Result<PropertyPath, ParserError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for event in self.events.by_ref() {
            match event {
                Event::Error(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
                Event::Property { ty, name } => {
                    self.current.push(name);
                    return Some(Ok(PropertyPath {
                        ty,
                        path: self.current.to_path_string(),
                    }));
                }
                event => self.current.apply(&event),
            }
        }
        None
    }
}
