//! Σ-invariant pruning, counters, and the orderly-generation backtracking
//! engine that enumerates maximal caps up to affine symmetry.

pub mod counters;
pub mod orderly;
pub mod output;
pub mod sigma;

pub use counters::Counters;
pub use orderly::{EngineContext, EngineOpts};
pub use output::{OutputSink, RecordingSink, StdoutSink};
pub use sigma::SigmaState;
