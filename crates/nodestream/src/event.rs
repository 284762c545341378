//! Structural events produced by the parser and consumed by every filter.
//!
//! A well-formed stream is a preorder traversal of the exported tree: a
//! single [`Event::Root`], then balanced [`Event::Node`]/[`Event::Property`]
//! opens and [`Event::Up`] closes. A property's payload events
//! ([`Event::Value`], [`Event::BinaryValue`]) follow it directly.
//!
//! # Examples
//!
//! ```
//! use nodestream::{Event, parse_str};
//!
//! let events: Vec<_> = parse_str("r\nc a\np string p\nv hi\n^\n^\n^\n").collect();
//! assert_eq!(
//!     events,
//!     vec![
//!         Event::Root,
//!         Event::node("a"),
//!         Event::property("string", "p"),
//!         Event::value("hi"),
//!         Event::Up,
//!         Event::Up,
//!         Event::Up,
//!     ]
//! );
//! ```
use alloc::string::String;

use crate::ParserError;

/// One unit of the structural event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum Event {
    /// Opens the implicit root of the tree.
    Root,
    /// Opens a named child of the current node.
    Node {
        /// The name of the child.
        name: String,
    },
    /// Opens a typed property of the current node.
    Property {
        /// The declared type of the property. Never validated.
        #[cfg_attr(any(test, feature = "serde"), serde(rename = "type"))]
        ty: String,
        /// The name of the property.
        name: String,
    },
    /// A literal payload for the enclosing property, already unescaped.
    Value {
        /// The payload.
        data: String,
    },
    /// A base64 payload for the enclosing property, kept encoded.
    BinaryValue {
        /// The encoded payload.
        data: String,
    },
    /// Closes the most recently opened root, node or property.
    Up,
    /// A terminal failure. Nothing follows it.
    #[cfg_attr(
        any(test, feature = "serde"),
        serde(serialize_with = "serialize_error")
    )]
    Error(ParserError),
}

impl Event {
    /// Shorthand for [`Event::Node`].
    pub fn node(name: impl Into<String>) -> Self {
        Self::Node { name: name.into() }
    }

    /// Shorthand for [`Event::Property`].
    pub fn property(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Property {
            ty: ty.into(),
            name: name.into(),
        }
    }

    /// Shorthand for [`Event::Value`].
    pub fn value(data: impl Into<String>) -> Self {
        Self::Value { data: data.into() }
    }

    /// Shorthand for [`Event::BinaryValue`].
    pub fn binary_value(data: impl Into<String>) -> Self {
        Self::BinaryValue { data: data.into() }
    }

    /// A short, stable name for the kind of event, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Node { .. } => "node",
            Self::Property { .. } => "property",
            Self::Value { .. } => "value",
            Self::BinaryValue { .. } => "binary value",
            Self::Up => "up",
            Self::Error(_) => "error",
        }
    }

    /// Returns `true` for [`Event::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<ParserError> for Event {
    fn from(err: ParserError) -> Self {
        Self::Error(err)
    }
}

#[cfg(any(test, feature = "serde"))]
fn serialize_error<S>(err: &ParserError, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(err)
}
