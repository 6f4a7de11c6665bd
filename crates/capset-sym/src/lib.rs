//! Symmetry oracle: canonical labeling and orbit computation for colored
//! incidence graphs.
//!
//! The orderly engine treats this crate as an opaque service (spec.md §4.5):
//! a colored partition goes in, an orbit array plus a canonical labeling plus
//! a stabilizer-order contribution comes out. No `nauty`-class canonicalizer
//! is available in this workspace's dependency stack, so `RefinementOracle`
//! is a real, self-contained backend: equitable (1-WL) partition refinement
//! followed by individualization/backtracking automorphism search, folded
//! into union-find orbits. It is a straightforward but slow fallback,
//! documented as adequate for small dimensions (n ≤ 3) rather than as a
//! competitor to a production canonicalizer.

use std::collections::BTreeMap;

use capset_core::errors::{CapError, ErrorInfo};
use capset_graph::IncidenceGraph;
use serde::{Deserialize, Serialize};

/// A vertex of the combined point/hyperplane graph: point ids occupy
/// `0..num_points`, hyperplane ids occupy `num_points..num_points+num_hyperplanes`.
pub type VertexId = u32;

/// A colored ordered partition in `lab`/`ptn` form (the nauty convention):
/// `lab` lists every vertex once, grouped into cells; `ptn[i] == 0` marks the
/// last position of a cell, `ptn[i] == 1` means position `i+1` is in the same
/// cell as `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coloring {
    pub lab: Vec<VertexId>,
    pub ptn: Vec<u8>,
}

impl Coloring {
    /// Builds a coloring from already-grouped cells, in cell order.
    pub fn from_cells(cells: &[Vec<VertexId>]) -> Self {
        let mut lab = Vec::new();
        let mut ptn = Vec::new();
        for cell in cells {
            for (i, v) in cell.iter().enumerate() {
                lab.push(*v);
                ptn.push(if i + 1 == cell.len() { 0 } else { 1 });
            }
        }
        Self { lab, ptn }
    }

    fn cells(&self) -> Vec<Vec<VertexId>> {
        let mut cells = Vec::new();
        let mut current = Vec::new();
        for (v, p) in self.lab.iter().zip(self.ptn.iter()) {
            current.push(*v);
            if *p == 0 {
                cells.push(std::mem::take(&mut current));
            }
        }
        debug_assert!(current.is_empty(), "ptn must end every cell with 0");
        cells
    }
}

/// Result of canonicalizing one colored graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleResult {
    /// Orbit representative (union-find root vertex id) for every vertex.
    pub orbits: Vec<VertexId>,
    /// A discrete labeling (one vertex per position) chosen as canonical.
    pub canonical_labeling: Vec<VertexId>,
    /// Number of color-respecting automorphisms found for this coloring.
    pub group_order: u64,
}

/// The contract the orderly engine relies on for canonicity testing
/// (spec.md §4.5): given a colored partition of the incidence graph, decide
/// orbits, a canonical labeling, and a group-order contribution.
pub trait SymmetryOracle {
    /// Canonicalizes `coloring` over `graph`. `coloring.ptn` must end every
    /// cell with a `0`.
    fn canonicalize(
        &self,
        graph: &IncidenceGraph,
        coloring: &Coloring,
    ) -> Result<OracleResult, CapError>;
}

/// Equitable-refinement + individualization/backtracking oracle.
pub struct RefinementOracle {
    /// Hard cap on the number of discrete leaves explored, guarding against
    /// runaway search on graphs too large for this fallback to be practical.
    pub max_leaves: usize,
}

impl Default for RefinementOracle {
    fn default() -> Self {
        Self { max_leaves: 200_000 }
    }
}

struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n as u32).collect(),
        }
    }

    fn find(&mut self, x: u32) -> u32 {
        if self.parent[x as usize] != x {
            let root = self.find(self.parent[x as usize]);
            self.parent[x as usize] = root;
        }
        self.parent[x as usize]
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

impl RefinementOracle {
    fn neighbors(graph: &IncidenceGraph, v: VertexId) -> Vec<VertexId> {
        let np = graph.num_points() as u32;
        if v < np {
            graph
                .hyperplanes_of(capset_graph::PointId(v))
                .iter()
                .map(|h| h.0 + np)
                .collect()
        } else {
            graph
                .points_of(capset_graph::HyperplaneId(v - np))
                .iter()
                .map(|p| p.0)
                .collect()
        }
    }

    /// Equitable (1-WL) partition refinement: repeatedly splits cells by each
    /// vertex's neighbor-count signature against the current cells, until no
    /// cell splits further.
    fn refine(graph: &IncidenceGraph, mut cells: Vec<Vec<VertexId>>) -> Vec<Vec<VertexId>> {
        loop {
            let mut cell_of = vec![0u32; graph.num_points() + graph.num_hyperplanes()];
            for (ci, cell) in cells.iter().enumerate() {
                for v in cell {
                    cell_of[*v as usize] = ci as u32;
                }
            }
            let mut next: Vec<Vec<VertexId>> = Vec::with_capacity(cells.len());
            let mut split_any = false;
            for cell in &cells {
                if cell.len() == 1 {
                    next.push(cell.clone());
                    continue;
                }
                let mut by_sig: BTreeMap<Vec<usize>, Vec<VertexId>> = BTreeMap::new();
                for &v in cell {
                    let mut sig = vec![0usize; cells.len()];
                    for nb in Self::neighbors(graph, v) {
                        sig[cell_of[nb as usize] as usize] += 1;
                    }
                    by_sig.entry(sig).or_default().push(v);
                }
                if by_sig.len() > 1 {
                    split_any = true;
                }
                for (_, group) in by_sig {
                    next.push(group);
                }
            }
            cells = next;
            if !split_any {
                return cells;
            }
        }
    }

    /// Enumerates every discrete leaf reachable by individualization from
    /// `cells`, refining after each individualization step.
    fn search(graph: &IncidenceGraph, cells: Vec<Vec<VertexId>>, leaves: &mut Vec<Vec<VertexId>>, budget: usize) {
        if leaves.len() >= budget {
            return;
        }
        let refined = Self::refine(graph, cells);
        if refined.iter().all(|c| c.len() == 1) {
            leaves.push(refined.into_iter().map(|c| c[0]).collect());
            return;
        }
        let target_idx = refined.iter().position(|c| c.len() > 1).expect("a non-singleton cell exists");
        let target = refined[target_idx].clone();
        for &v in &target {
            if leaves.len() >= budget {
                return;
            }
            let mut next_cells = Vec::with_capacity(refined.len() + 1);
            for (i, cell) in refined.iter().enumerate() {
                if i == target_idx {
                    let rest: Vec<VertexId> = cell.iter().copied().filter(|&x| x != v).collect();
                    next_cells.push(vec![v]);
                    if !rest.is_empty() {
                        next_cells.push(rest);
                    }
                } else {
                    next_cells.push(cell.clone());
                }
            }
            Self::search(graph, next_cells, leaves, budget);
        }
    }

    fn is_automorphism(graph: &IncidenceGraph, base: &[VertexId], other: &[VertexId]) -> bool {
        let np = graph.num_points() as u32;
        let mut perm = vec![0u32; base.len()];
        for (pos, &bv) in base.iter().enumerate() {
            perm[bv as usize] = other[pos];
        }
        for p in 0..np {
            let mapped_p = perm[p as usize];
            if (mapped_p < np) != (p < np) {
                return false;
            }
            let mut base_hyps: Vec<u32> = Self::neighbors(graph, p).iter().map(|h| perm[*h as usize]).collect();
            let mut mapped_hyps: Vec<u32> = Self::neighbors(graph, mapped_p).to_vec();
            base_hyps.sort_unstable();
            mapped_hyps.sort_unstable();
            if base_hyps != mapped_hyps {
                return false;
            }
        }
        true
    }
}

impl SymmetryOracle for RefinementOracle {
    fn canonicalize(&self, graph: &IncidenceGraph, coloring: &Coloring) -> Result<OracleResult, CapError> {
        debug_assert_eq!(
            *coloring.ptn.last().unwrap_or(&0),
            0,
            "the final partition cell must be closed"
        );
        let cells = coloring.cells();
        let total = graph.num_points() + graph.num_hyperplanes();
        let covered: usize = cells.iter().map(|c| c.len()).sum();
        if covered != total {
            return Err(CapError::Symmetry(
                ErrorInfo::new("coloring-incomplete", "coloring does not cover every vertex")
                    .with_context("covered", covered.to_string())
                    .with_context("total", total.to_string()),
            ));
        }

        let mut leaves = Vec::new();
        Self::search(graph, cells, &mut leaves, self.max_leaves);
        if leaves.is_empty() {
            return Err(CapError::Symmetry(ErrorInfo::new(
                "no-leaves",
                "individualization/refinement search produced no discrete leaf",
            )));
        }

        let base = leaves[0].clone();
        let mut uf = UnionFind::new(total);
        let mut group_order = 0u64;
        for leaf in &leaves {
            if Self::is_automorphism(graph, &base, leaf) {
                group_order += 1;
                for (&bv, &lv) in base.iter().zip(leaf.iter()) {
                    uf.union(bv, lv);
                }
            }
        }

        let canonical_labeling = leaves
            .iter()
            .min_by(|a, b| a.cmp(b))
            .cloned()
            .unwrap_or(base.clone());

        let orbits = (0..total as u32).map(|v| uf.find(v)).collect();

        Ok(OracleResult {
            orbits,
            canonical_labeling,
            group_order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capset_core::dimension::Dimension;

    #[test]
    fn discrete_coloring_has_trivial_group() {
        let dim = Dimension::new(2).unwrap();
        let graph = IncidenceGraph::build(dim).unwrap();
        let total = graph.num_points() + graph.num_hyperplanes();
        let cells: Vec<Vec<VertexId>> = (0..total as u32).map(|v| vec![v]).collect();
        let coloring = Coloring::from_cells(&cells);
        let oracle = RefinementOracle::default();
        let result = oracle.canonicalize(&graph, &coloring).unwrap();
        assert_eq!(result.group_order, 1);
        assert_eq!(result.orbits.len(), total);
        for (v, orbit) in result.orbits.iter().enumerate() {
            assert_eq!(*orbit, v as u32, "a fully individualized coloring has only singleton orbits");
        }
    }

    #[test]
    fn uniform_coloring_finds_a_nontrivial_automorphism() {
        let dim = Dimension::new(2).unwrap();
        let graph = IncidenceGraph::build(dim).unwrap();
        let total = graph.num_points() + graph.num_hyperplanes();
        let points: Vec<VertexId> = (0..graph.num_points() as u32).collect();
        let hyperplanes: Vec<VertexId> = (graph.num_points() as u32..total as u32).collect();
        let coloring = Coloring::from_cells(&[points, hyperplanes]);
        let oracle = RefinementOracle {
            max_leaves: 5_000,
        };
        let result = oracle.canonicalize(&graph, &coloring).unwrap();
        assert!(result.group_order >= 1);
    }

    #[test]
    fn oracle_result_round_trips_through_json() {
        let dim = Dimension::new(2).unwrap();
        let graph = IncidenceGraph::build(dim).unwrap();
        let total = graph.num_points() + graph.num_hyperplanes();
        let cells: Vec<Vec<VertexId>> = (0..total as u32).map(|v| vec![v]).collect();
        let coloring = Coloring::from_cells(&cells);
        let oracle = RefinementOracle::default();
        let result = oracle.canonicalize(&graph, &coloring).unwrap();

        let json = serde_json::to_string(&result).unwrap();
        let parsed: OracleResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.group_order, result.group_order);
        assert_eq!(parsed.orbits, result.orbits);
    }
}
