//! Aggregate statistics over a whole export, computed in one pass.
//!
//! The aggregator checks the structure of the stream while it counts: a root,
//! then nodes and properties nested under it and closed by `Up`, with payload
//! events only directly inside a property. A closed root may be followed by
//! another one, as [`Subtree`](crate::Subtree) produces for repeated names.
//! The first event that breaks this shape fails the whole computation.
use alloc::{collections::BTreeMap, string::String, vec::Vec};

use base64::{
    Engine as _,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
};

use crate::{Event, StatsError};

/// Bucket size for [`Stats::nodes_per_depth`] unless configured otherwise.
pub const DEFAULT_NODE_DEPTH_BUCKET_SIZE: usize = 10;
/// Bucket size for [`Stats::properties_per_depth`] unless configured otherwise.
pub const DEFAULT_PROPERTY_DEPTH_BUCKET_SIZE: usize = 10;
/// Scale for [`Stats::values_per_size`] unless configured otherwise.
pub const DEFAULT_VALUE_SIZE_BUCKET_SCALE: u64 = 1024;

/// Configuration for [`statistics_with`].
///
/// # Default
///
/// Depth buckets are 10 levels wide and size buckets grow by a factor of
/// 1024.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsOptions {
    /// Width of the buckets of [`Stats::nodes_per_depth`].
    ///
    /// # Default
    ///
    /// `10`
    pub node_depth_bucket_size: usize,
    /// Width of the buckets of [`Stats::properties_per_depth`].
    ///
    /// # Default
    ///
    /// `10`
    pub property_depth_bucket_size: usize,
    /// Growth factor of the buckets of [`Stats::values_per_size`].
    ///
    /// # Default
    ///
    /// `1024`
    pub value_size_bucket_scale: u64,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            node_depth_bucket_size: DEFAULT_NODE_DEPTH_BUCKET_SIZE,
            property_depth_bucket_size: DEFAULT_PROPERTY_DEPTH_BUCKET_SIZE,
            value_size_bucket_scale: DEFAULT_VALUE_SIZE_BUCKET_SCALE,
        }
    }
}

/// Statistics about the data in an export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize))]
pub struct Stats {
    /// Number of nodes, the root included.
    pub nodes: usize,
    /// Number of properties.
    pub properties: usize,
    /// Payload bytes over every property. A literal value counts its UTF-8
    /// length; a binary value counts its decoded length.
    pub data: u64,
    /// Properties grouped by declared type.
    pub properties_per_type: BTreeMap<String, usize>,
    /// Properties grouped by the depth of their owning node, keyed by
    /// [`linear_bucket`].
    pub properties_per_depth: BTreeMap<usize, usize>,
    /// Nodes grouped by depth, keyed by [`linear_bucket`]. The root is at
    /// depth 0.
    pub nodes_per_depth: BTreeMap<usize, usize>,
    /// Values grouped by payload size, keyed by [`logarithmic_bucket`].
    pub values_per_size: BTreeMap<u32, usize>,
}

/// Computes statistics with the default [`StatsOptions`].
///
/// ```rust
/// use nodestream::{parse_str, statistics};
///
/// let stats = statistics(parse_str("r\nc a\np string p\nv hi\n^\n^\n^\n"))?;
/// assert_eq!((stats.nodes, stats.properties, stats.data), (2, 1, 2));
/// # Ok::<(), nodestream::StatsError>(())
/// ```
///
/// # Errors
///
/// See [`statistics_with`].
pub fn statistics<I>(events: I) -> Result<Stats, StatsError>
where
    I: IntoIterator<Item = Event>,
{
    statistics_with(StatsOptions::default(), events)
}

/// Computes statistics over a complete event stream.
///
/// An empty stream has empty statistics.
///
/// # Errors
///
/// Fails on the first [`Event::Error`], on any event out of place, and when
/// the stream ends inside the root.
pub fn statistics_with<I>(options: StatsOptions, events: I) -> Result<Stats, StatsError>
where
    I: IntoIterator<Item = Event>,
{
    let mut aggregator = Aggregator::new(options);
    for event in events {
        aggregator.push(event)?;
    }
    aggregator.finish()
}

/// The lower bound of the fixed-width bucket holding `value`.
///
/// A `size` of 0 disables bucketing.
///
/// ```rust
/// use nodestream::linear_bucket;
///
/// assert_eq!(linear_bucket(0, 10), 0);
/// assert_eq!(linear_bucket(19, 10), 10);
/// ```
#[must_use]
pub fn linear_bucket(value: usize, size: usize) -> usize {
    value.checked_div(size).map_or(value, |buckets| buckets * size)
}

/// The exponent `k` such that `scale^k <= size < scale^(k+1)`, with sizes
/// below `scale` in bucket 0.
///
/// Scales below 2 put every size in bucket 0.
///
/// ```rust
/// use nodestream::logarithmic_bucket;
///
/// assert_eq!(logarithmic_bucket(1023, 1024), 0);
/// assert_eq!(logarithmic_bucket(1024, 1024), 1);
/// assert_eq!(logarithmic_bucket(1024 * 1024, 1024), 2);
/// ```
#[must_use]
pub fn logarithmic_bucket(mut size: u64, scale: u64) -> u32 {
    if scale < 2 {
        return 0;
    }
    let mut bucket = 0;
    while size >= scale {
        size /= scale;
        bucket += 1;
    }
    bucket
}

/// The number of bytes that the base64 text `data` decodes to.
///
/// Surrounding ASCII whitespace, such as the `\r` of a CRLF export, is
/// ignored, and padding is optional. Text that is not standard base64 counts
/// its own UTF-8 length, like a literal value.
///
/// ```rust
/// use nodestream::decoded_len;
///
/// assert_eq!(decoded_len("aGVsbG8="), 5);
/// assert_eq!(decoded_len("not base64!"), 11);
/// ```
#[must_use]
pub fn decoded_len(data: &str) -> u64 {
    let text = data.trim_ascii();
    let decoded = STANDARD
        .decode(text)
        .or_else(|_| STANDARD_NO_PAD.decode(text));
    match decoded {
        Ok(bytes) => bytes.len() as u64,
        Err(_) => text.len() as u64,
    }
}

/// One open context of the stream.
#[derive(Debug, Clone, Copy)]
enum Frame {
    Node { depth: usize },
    Property,
}

#[derive(Debug)]
struct Aggregator {
    options: StatsOptions,
    stats: Stats,
    frames: Vec<Frame>,
}

impl Aggregator {
    fn new(options: StatsOptions) -> Self {
        Self {
            options,
            stats: Stats::default(),
            frames: Vec::new(),
        }
    }

    fn push(&mut self, event: Event) -> Result<(), StatsError> {
        if let Event::Error(err) = event {
            return Err(err.into());
        }

        let Some(&frame) = self.frames.last() else {
            return if event == Event::Root {
                self.open_node(0);
                Ok(())
            } else {
                Err(unexpected("root", &event))
            };
        };

        match (frame, event) {
            (Frame::Node { depth }, Event::Node { .. }) => self.open_node(depth + 1),
            (Frame::Node { depth }, Event::Property { ty, .. }) => self.open_property(ty, depth),
            (Frame::Property, Event::Value { data }) => self.count_value(data.len() as u64),
            (Frame::Property, Event::BinaryValue { data }) => self.count_value(decoded_len(&data)),
            (_, Event::Up) => {
                self.frames.pop();
            }
            (Frame::Node { .. }, event) => return Err(unexpected("node, property or up", &event)),
            (Frame::Property, event) => return Err(unexpected("value or up", &event)),
        }
        Ok(())
    }

    fn finish(self) -> Result<Stats, StatsError> {
        if self.frames.is_empty() {
            Ok(self.stats)
        } else {
            Err(StatsError::UnexpectedEnd {
                open: self.frames.len(),
            })
        }
    }

    fn open_node(&mut self, depth: usize) {
        let bucket = linear_bucket(depth, self.options.node_depth_bucket_size);
        self.stats.nodes += 1;
        *self.stats.nodes_per_depth.entry(bucket).or_default() += 1;
        self.frames.push(Frame::Node { depth });
    }

    fn open_property(&mut self, ty: String, depth: usize) {
        let bucket = linear_bucket(depth, self.options.property_depth_bucket_size);
        self.stats.properties += 1;
        *self.stats.properties_per_type.entry(ty).or_default() += 1;
        *self.stats.properties_per_depth.entry(bucket).or_default() += 1;
        self.frames.push(Frame::Property);
    }

    fn count_value(&mut self, size: u64) {
        let bucket = logarithmic_bucket(size, self.options.value_size_bucket_scale);
        self.stats.data += size;
        *self.stats.values_per_size.entry(bucket).or_default() += 1;
    }
}

fn unexpected(expected: &'static str, found: &Event) -> StatsError {
    StatsError::UnexpectedEvent {
        expected,
        found: found.kind(),
    }
}
