//! Human-readable rendering of [`Stats`].
use std::fmt;
use std::io::{self, Write};

use nodestream::{Stats, StatsOptions};

const UNITS: [&str; 7] = ["", "kB", "MB", "GB", "TB", "PB", "EB"];

/// A byte count truncated to its decimal magnitude, e.g. `12MB`.
pub struct HumanReadable(pub u64);

impl fmt::Display for HumanReadable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0;
        let mut magnitude = 0;
        while value >= 1000 {
            value /= 1000;
            magnitude += 1;
        }
        write!(f, "{value}{}", UNITS[magnitude])
    }
}

/// A byte count with its exact value, e.g. `12MB (12345678 bytes)`.
pub struct Size(pub u64);

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 1000 {
            write!(f, "{} bytes", self.0)
        } else {
            write!(f, "{} ({} bytes)", HumanReadable(self.0), self.0)
        }
    }
}

/// A fixed-width bucket, e.g. `10..20`.
pub struct LinearBucket {
    pub bucket: usize,
    pub size: usize,
}

impl fmt::Display for LinearBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}..{}", self.bucket, self.bucket + self.size))
    }
}

/// An exponential bucket, e.g. `1kB..1MB`.
pub struct LogarithmicBucket {
    pub bucket: u32,
    pub scale: u64,
}

impl LogarithmicBucket {
    fn begin(&self) -> u64 {
        if self.bucket == 0 {
            0
        } else {
            self.scale.saturating_pow(self.bucket)
        }
    }

    fn end(&self) -> u64 {
        self.scale.saturating_pow(self.bucket + 1)
    }
}

impl fmt::Display for LogarithmicBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!(
            "{}..{}",
            HumanReadable(self.begin()),
            HumanReadable(self.end())
        ))
    }
}

/// Writes the statistics report printed by `nodestream stats`.
pub fn write_stats<W: Write>(mut out: W, stats: &Stats, options: &StatsOptions) -> io::Result<()> {
    writeln!(out, "Nodes: {}", stats.nodes)?;
    writeln!(out, "Properties: {}", stats.properties)?;
    writeln!(out, "Data: {}", Size(stats.data))?;

    writeln!(out, "Properties per type:")?;
    for (ty, count) in &stats.properties_per_type {
        writeln!(out, "  {ty}: {count}")?;
    }

    writeln!(out, "Nodes per depth:")?;
    for (&bucket, count) in &stats.nodes_per_depth {
        let bucket = LinearBucket {
            bucket,
            size: options.node_depth_bucket_size,
        };
        writeln!(out, "  {bucket:>6}: {count}")?;
    }

    writeln!(out, "Properties per depth:")?;
    for (&bucket, count) in &stats.properties_per_depth {
        let bucket = LinearBucket {
            bucket,
            size: options.property_depth_bucket_size,
        };
        writeln!(out, "  {bucket:>6}: {count}")?;
    }

    writeln!(out, "Values per size:")?;
    for (&bucket, count) in &stats.values_per_size {
        let bucket = LogarithmicBucket {
            bucket,
            scale: options.value_size_bucket_scale,
        };
        writeln!(out, "  {bucket:>8}: {count}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use nodestream::{parse_str, statistics};

    use super::*;

    #[test]
    fn human_readable_magnitudes() {
        let rendered: Vec<String> = [0, 999, 1000, 1_500_000, 2_000_000_000, 3 * 10u64.pow(12)]
            .into_iter()
            .map(|n| HumanReadable(n).to_string())
            .collect();
        assert_eq!(rendered, ["0", "999", "1kB", "1MB", "2GB", "3TB"]);
        assert_eq!(HumanReadable(u64::MAX).to_string(), "18EB");
    }

    #[test]
    fn sizes() {
        assert_eq!(Size(999).to_string(), "999 bytes");
        assert_eq!(Size(123_456).to_string(), "123kB (123456 bytes)");
    }

    #[test]
    fn buckets() {
        assert_eq!(LinearBucket { bucket: 10, size: 10 }.to_string(), "10..20");
        assert_eq!(LogarithmicBucket { bucket: 0, scale: 1024 }.to_string(), "0..1kB");
        assert_eq!(LogarithmicBucket { bucket: 1, scale: 1024 }.to_string(), "1kB..1MB");
        assert_eq!(format!("{:>8}", LinearBucket { bucket: 0, size: 10 }), "   0..10");
    }

    #[test]
    fn report() {
        let stats = statistics(parse_str(
            "r\nc a\np String t\nv hi\n^\np Binary b\nx aGVsbG8=\n^\n^\n^\n",
        ))
        .unwrap();
        let mut out = Vec::new();
        write_stats(&mut out, &stats, &StatsOptions::default()).unwrap();
        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r"
        Nodes: 2
        Properties: 2
        Data: 7 bytes
        Properties per type:
          Binary: 1
          String: 1
        Nodes per depth:
           0..10: 2
        Properties per depth:
           0..10: 2
        Values per size:
            0..1kB: 2
        ");
    }
}
