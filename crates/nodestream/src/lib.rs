//! A streaming parser for line-oriented tree exports, and the single-pass
//! filters built on top of it.
//!
//! An export describes a tree of named nodes carrying typed properties, one
//! command per line:
//!
//! ```text
//! r                  open the root
//! c <name>           open a child node
//! p <type> <name>    open a property of the current node
//! v <data>           a literal value, with `\\` and `\n` escapes
//! x <data>           a base64 value
//! ^                  close the innermost root, node or property
//! ```
//!
//! [`StreamingParser`] turns text into [`Event`]s without ever building the
//! tree. Everything else consumes and produces plain `Iterator`s of events:
//! [`Prune`] and [`Subtree`] rewrite the stream, [`nodes`] and [`properties`]
//! list paths, [`statistics`] aggregates, and [`serialize`] writes the stream
//! back out.
//!
//! ```rust
//! use nodestream::{EventsExt, parse_str, serialize};
//!
//! let export = "r\nc content\nc site\n^\n^\nc tmp\n^\n^\n";
//! let mut out = String::new();
//! serialize(parse_str(export).prune("/tmp")?, &mut out)?;
//! assert_eq!(out, "r\nc content\nc site\n^\n^\n^\n");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod event;
mod filter;
mod parser;
mod path;
mod serializer;
mod stats;
mod transform;

#[cfg(test)]
mod tests;

#[cfg(feature = "std")]
pub use error::ReadError;
pub use error::{ErrorSource, ParserError, PathError, SerializeError, StatsError, SyntaxError};
pub use event::Event;
pub use filter::{EventsExt, Prune, Subtree, prune, subtree};
#[cfg(feature = "std")]
pub use parser::EventReader;
pub use parser::{ClosedStreamingParser, ParserOptions, StreamingParser, parse_str};
pub use path::{PathStack, is_in_subtree, parse_path};
#[cfg(feature = "std")]
pub use serializer::write_events;
pub use serializer::serialize;
pub use stats::{
    DEFAULT_NODE_DEPTH_BUCKET_SIZE, DEFAULT_PROPERTY_DEPTH_BUCKET_SIZE,
    DEFAULT_VALUE_SIZE_BUCKET_SCALE, Stats, StatsOptions, decoded_len, linear_bucket,
    logarithmic_bucket, statistics, statistics_with,
};
pub use transform::{Nodes, Properties, PropertyPath, nodes, properties};

#[doc(hidden)]
pub use alloc::{string::String, vec};

/// Macro to build a `Vec<String>` of path components.
///
/// ```rust
/// use nodestream::{parse_path, path};
///
/// assert_eq!(parse_path("/content/site"), Ok(path!["content", "site"]));
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        $crate::vec![$($crate::String::from($elem)),*]
    }};
}
