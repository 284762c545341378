//! Path listings derived from the event stream.
mod nodes;
mod properties;

pub use nodes::{Nodes, nodes};
pub use properties::{Properties, PropertyPath, properties};
