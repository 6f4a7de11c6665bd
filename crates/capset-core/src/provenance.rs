//! Provenance and schema descriptors shared across cap-enumeration artifacts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes and documentation updates.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance information attached to a satellite sampler run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RunProvenance {
    /// Dimension the run was executed against.
    pub dimension: u32,
    /// Canonical hash of the incidence graph used for the run.
    pub graph_hash: String,
    /// Master deterministic seed used for all randomness.
    pub seed: u64,
    /// Number of trials executed.
    pub trials: u64,
    /// Version map for all tools involved in the run.
    pub tool_versions: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_provenance_round_trips_through_json() {
        let mut provenance = RunProvenance {
            dimension: 3,
            graph_hash: "deadbeef".to_string(),
            seed: 7,
            trials: 100,
            ..Default::default()
        };
        provenance.tool_versions.insert("capset-mcmc".to_string(), "0.1.0".to_string());

        let json = serde_json::to_string(&provenance).unwrap();
        let parsed: RunProvenance = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, provenance);
    }
}
