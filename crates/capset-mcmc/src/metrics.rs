//! Trial-size histogram accumulation and serialization.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// A histogram of observed cap sizes across trials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizeHistogram {
    counts: BTreeMap<usize, u64>,
}

impl SizeHistogram {
    /// Records one trial's resulting cap size.
    pub fn record(&mut self, size: usize) {
        *self.counts.entry(size).or_insert(0) += 1;
    }

    /// Read-only access to the accumulated counts, keyed by cap size.
    pub fn counts(&self) -> &BTreeMap<usize, u64> {
        &self.counts
    }

    /// Renders the histogram in the original tool's `key: count` line
    /// format, one entry per line, in increasing size order.
    pub fn render_lines(&self) -> String {
        let mut out = String::new();
        for (size, count) in &self.counts {
            let _ = writeln!(out, "{size}: {count}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_accumulates_counts_per_size() {
        let mut hist = SizeHistogram::default();
        hist.record(4);
        hist.record(4);
        hist.record(3);
        assert_eq!(hist.counts()[&4], 2);
        assert_eq!(hist.counts()[&3], 1);
        assert_eq!(hist.render_lines(), "3: 1\n4: 2\n");
    }
}
