//! Greedy Monte-Carlo satellite sampler: a fast, non-exhaustive estimator
//! of the maximal-cap-size distribution, supplementing the orderly engine
//! (out of scope for the exhaustive enumeration itself, per spec.md's
//! Non-goals, but retained as the ambient sampler the original source also
//! ships alongside its exhaustive search).

pub mod determinism;
pub mod kernel;
pub mod metrics;

use capset_core::dimension::Dimension;
use capset_core::provenance::RunProvenance;
use capset_graph::IncidenceGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use metrics::SizeHistogram;

/// Configuration for one sampling run: dimension, trial count, and the
/// master seed all trial seeds derive from. No YAML layer — three scalar
/// knobs do not warrant a config file.
#[derive(Debug, Clone, Copy)]
pub struct SampleConfig {
    pub dimension: usize,
    pub trials: u64,
    pub seed: u64,
}

/// The outcome of a sampling run: the size histogram plus provenance for
/// the machine-readable summary the CLI writes alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSummary {
    pub histogram: SizeHistogram,
    pub provenance: RunProvenance,
}

/// Runs `config.trials` independent greedy trials sequentially and
/// accumulates the resulting cap-size histogram.
pub fn run_trials(config: SampleConfig) -> Result<SampleSummary, capset_core::errors::CapError> {
    let dim = Dimension::new(config.dimension)?;
    let graph = IncidenceGraph::build(dim)?;

    let mut histogram = SizeHistogram::default();
    for trial in 0..config.trials {
        let mut rng = determinism::trial_rng(config.seed, trial);
        let cap = kernel::greedy_grow(&graph, &mut rng);
        histogram.record(cap.len());
    }

    let provenance = RunProvenance {
        dimension: config.dimension as u32,
        graph_hash: graph.canonical_hash(),
        seed: config.seed,
        trials: config.trials,
        tool_versions: BTreeMap::from([("capset-mcmc".to_string(), env!("CARGO_PKG_VERSION").to_string())]),
    };

    Ok(SampleSummary { histogram, provenance })
}
