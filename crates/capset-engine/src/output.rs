//! Injectable output channel for the orderly engine's progress trace
//! (spec.md §6): a depth-marker line is emitted every time the search backs
//! out of a level, and a summary line is emitted for each completed maximal
//! cap.

use capset_graph::PointId;

/// Receives progress events from the orderly engine. Tests use
/// [`RecordingSink`]; the CLI uses [`StdoutSink`].
pub trait OutputSink {
    /// Called when the search descends to `depth` by adding `point`.
    fn enter(&mut self, depth: usize, point: PointId);

    /// Called when the search backs out of `depth`.
    fn leave(&mut self, depth: usize);

    /// Called when a canonical maximal cap of size `depth` is found.
    fn maximal(&mut self, depth: usize, cap: &[PointId]);
}

/// Prints the depth-marker trace to stdout, matching the original tool's
/// progress output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn enter(&mut self, depth: usize, point: PointId) {
        println!("{}+ point {}", "  ".repeat(depth), point.0);
    }

    fn leave(&mut self, depth: usize) {
        println!("{}-", "  ".repeat(depth));
    }

    fn maximal(&mut self, depth: usize, cap: &[PointId]) {
        let ids: Vec<String> = cap.iter().map(|p| p.0.to_string()).collect();
        println!("maximal cap of size {depth}: [{}]", ids.join(", "));
    }
}

/// A single recorded progress event, used by tests to assert on trace shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Enter { depth: usize, point: PointId },
    Leave { depth: usize },
    Maximal { depth: usize, cap: Vec<PointId> },
}

/// Records every event in memory instead of printing it.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<TraceEvent>,
}

impl OutputSink for RecordingSink {
    fn enter(&mut self, depth: usize, point: PointId) {
        self.events.push(TraceEvent::Enter { depth, point });
    }

    fn leave(&mut self, depth: usize) {
        self.events.push(TraceEvent::Leave { depth });
    }

    fn maximal(&mut self, depth: usize, cap: &[PointId]) {
        self.events.push(TraceEvent::Maximal {
            depth,
            cap: cap.to_vec(),
        });
    }
}
