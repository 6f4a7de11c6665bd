//! Builds the point-hyperplane incidence graph of `AF(n, 3)`.
//!
//! Every point lies on exactly `NORMALS` hyperplanes (one per canonical
//! normal direction, whichever offset its dot product with that normal
//! selects); every hyperplane contains exactly `QN / 3` points. The graph is
//! built once per dimension and never mutated afterward — the orderly engine
//! and symmetry oracle only ever read from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use capset_core::affine::{self, Point};
use capset_core::dimension::Dimension;
use capset_core::errors::{CapError, ErrorInfo};

/// Identifies a point vertex of the incidence graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointId(pub u32);

/// Identifies a hyperplane vertex of the incidence graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HyperplaneId(pub u32);

/// The point-hyperplane incidence graph of a fixed dimension `n`.
#[derive(Debug, Clone)]
pub struct IncidenceGraph {
    dim: Dimension,
    points: Vec<Point>,
    normals: Vec<Point>,
    setter: [[u8; 3]; 3],
    /// For each point, the hyperplanes it lies on, one per normal direction,
    /// indexed by normal index.
    point_hyp: Vec<Vec<HyperplaneId>>,
    /// For each hyperplane, the points it contains, in `PointId` order.
    hyp_point: Vec<Vec<PointId>>,
}

impl IncidenceGraph {
    /// Builds the incidence graph for dimension `dim`.
    pub fn build(dim: Dimension) -> Result<Self, CapError> {
        let points = affine::cards(&dim);
        let normals = affine::normals(&dim);
        let setter = affine::setter_table();

        if normals.len() != dim.normals() {
            return Err(CapError::Graph(
                ErrorInfo::new("normals-count-mismatch", "computed normal count disagrees with Dimension")
                    .with_context("expected", dim.normals().to_string())
                    .with_context("actual", normals.len().to_string()),
            ));
        }

        let mut point_hyp: Vec<Vec<HyperplaneId>> = vec![Vec::with_capacity(dim.normals()); points.len()];
        let mut hyp_point: Vec<Vec<PointId>> = vec![Vec::new(); dim.hyperplanes()];

        for (pi, p) in points.iter().enumerate() {
            let point_id = PointId(pi as u32);
            for (ni, normal) in normals.iter().enumerate() {
                let offset = affine::hyperplane_offset(&dim, normal, p);
                let hyp_id = HyperplaneId((ni * 3 + offset as usize) as u32);
                point_hyp[pi].push(hyp_id);
                hyp_point[hyp_id.0 as usize].push(point_id);
            }
        }

        for bucket in &hyp_point {
            if bucket.len() != dim.points_per_hyperplane() {
                return Err(CapError::Graph(
                    ErrorInfo::new(
                        "hyperplane-size-mismatch",
                        "a hyperplane did not collect exactly QN/3 points",
                    )
                    .with_context("expected", dim.points_per_hyperplane().to_string())
                    .with_context("actual", bucket.len().to_string()),
                ));
            }
        }

        Ok(Self {
            dim,
            points,
            normals,
            setter,
            point_hyp,
            hyp_point,
        })
    }

    /// The dimension this graph was built for.
    pub fn dimension(&self) -> &Dimension {
        &self.dim
    }

    /// The 3x3 collinearity-completion table shared with [`Self::third`].
    pub fn setter(&self) -> &[[u8; 3]; 3] {
        &self.setter
    }

    /// Returns the third point collinear with `a` and `b`.
    pub fn third(&self, a: &Point, b: &Point) -> Point {
        affine::third(&self.dim, &self.setter, a, b)
    }

    /// The point at a given id.
    pub fn point(&self, id: PointId) -> Point {
        self.points[id.0 as usize]
    }

    /// The id of a point, by its [`affine::Point::card_index`].
    pub fn point_id(&self, p: &Point) -> PointId {
        PointId(p.card_index(&self.dim) as u32)
    }

    /// Total number of point vertices (`QN`).
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Total number of hyperplane vertices (`HYPERPLANES`).
    pub fn num_hyperplanes(&self) -> usize {
        self.hyp_point.len()
    }

    /// The hyperplanes incident to a point, one per normal direction.
    pub fn hyperplanes_of(&self, id: PointId) -> &[HyperplaneId] {
        &self.point_hyp[id.0 as usize]
    }

    /// The points contained in a hyperplane.
    pub fn points_of(&self, id: HyperplaneId) -> &[PointId] {
        &self.hyp_point[id.0 as usize]
    }

    /// Canonical normal directions, in the order their hyperplane blocks of
    /// three (`normal_idx * 3 + offset`) are laid out.
    pub fn normals(&self) -> &[Point] {
        &self.normals
    }

    /// A stable structural digest of this graph, independent of any cap.
    ///
    /// Two `IncidenceGraph`s built for the same dimension always agree; used
    /// for provenance stamping and as a debug cross-check that construction
    /// is deterministic.
    pub fn canonical_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.dim.n().to_le_bytes());
        hasher.update(self.dim.qn().to_le_bytes());
        hasher.update(self.dim.hyperplanes().to_le_bytes());
        // Incidence is fully determined by (point_hyp, hyp_point) laid out in
        // id order, so hashing them in order is enough to distinguish any
        // construction bug from the expected layout.
        for row in &self.point_hyp {
            for h in row {
                hasher.update(h.0.to_le_bytes());
            }
        }
        for row in &self.hyp_point {
            for p in row {
                hasher.update(p.0.to_le_bytes());
            }
        }
        let digest = hasher.finalize();
        hex_encode(&digest)
    }

    /// A sorted, deterministic adjacency summary keyed by point id, exposed
    /// for the symmetry oracle's coloring step without forcing it to depend
    /// on this crate's internal layout.
    pub fn adjacency_snapshot(&self) -> BTreeMap<u32, Vec<u32>> {
        self.point_hyp
            .iter()
            .enumerate()
            .map(|(pi, hyps)| (pi as u32, hyps.iter().map(|h| h.0).collect()))
            .collect()
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn n2_graph_matches_expected_shape() {
        let dim = Dimension::new(2).unwrap();
        let graph = IncidenceGraph::build(dim).unwrap();
        assert_eq!(graph.num_points(), 9);
        assert_eq!(graph.num_hyperplanes(), 12);
        for pid in 0..graph.num_points() {
            assert_eq!(graph.hyperplanes_of(PointId(pid as u32)).len(), dim.normals());
        }
        for hid in 0..graph.num_hyperplanes() {
            assert_eq!(graph.points_of(HyperplaneId(hid as u32)).len(), dim.points_per_hyperplane());
        }
    }

    #[test]
    fn canonical_hash_is_deterministic() {
        let dim = Dimension::new(3).unwrap();
        let a = IncidenceGraph::build(dim).unwrap();
        let b = IncidenceGraph::build(dim).unwrap();
        assert_eq!(a.canonical_hash(), b.canonical_hash());
    }

    #[test]
    fn point_id_round_trips_through_card_index() {
        let dim = Dimension::new(3).unwrap();
        let graph = IncidenceGraph::build(dim).unwrap();
        for pid in 0..graph.num_points() {
            let id = PointId(pid as u32);
            let p = graph.point(id);
            assert_eq!(graph.point_id(&p), id);
        }
    }

    proptest::proptest! {
        #[test]
        fn every_point_lies_on_exactly_normals_hyperplanes(raw_pid in 0u32..27) {
            let dim = Dimension::new(3).unwrap();
            let graph = IncidenceGraph::build(dim).unwrap();
            let id = PointId(raw_pid % graph.num_points() as u32);
            proptest::prop_assert_eq!(graph.hyperplanes_of(id).len(), dim.normals());
        }
    }

    #[test]
    fn point_id_round_trips_through_json() {
        let id = PointId(42);
        let json = serde_json::to_string(&id).unwrap();
        let parsed: PointId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
