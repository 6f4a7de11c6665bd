//! Σ-pruning and the orderly-generation backtracking engine (spec.md §4.4,
//! §4.6): extend the current partial cap with canonically-chosen points,
//! pruned first by the cheap α-maximality test and then, if still tied, by
//! the symmetry oracle's canonical-representative test.

use capset_core::dimension::Dimension;
use capset_graph::{IncidenceGraph, PointId};
use capset_sym::{Coloring, SymmetryOracle, VertexId};

use crate::counters::Counters;
use crate::output::OutputSink;
use crate::sigma::SigmaState;

/// Toggles for the two independent pruning layers, exposed so tests (and
/// the CLI's `--no-alpha-prune` / `--no-symmetry-prune` flags) can disable
/// either one and compare the resulting `comps[]`/`tots[]` tables.
#[derive(Debug, Clone, Copy)]
pub struct EngineOpts {
    pub alpha_prune: bool,
    pub symmetry_prune: bool,
}

impl Default for EngineOpts {
    fn default() -> Self {
        Self {
            alpha_prune: true,
            symmetry_prune: true,
        }
    }
}

/// Owns every piece of mutable state the search touches. No `static`s: a
/// fresh context is built per run and threaded through recursion by `&mut`.
pub struct EngineContext<'a> {
    dim: Dimension,
    graph: &'a IncidenceGraph,
    oracle: &'a dyn SymmetryOracle,
    opts: EngineOpts,
    sigma: SigmaState,
    cap: Vec<PointId>,
    in_cap: Vec<bool>,
    elim: Vec<bool>,
    pub counters: Counters,
}

impl<'a> EngineContext<'a> {
    /// Builds a fresh context for one full enumeration run.
    pub fn new(graph: &'a IncidenceGraph, oracle: &'a dyn SymmetryOracle, opts: EngineOpts) -> Self {
        let dim = *graph.dimension();
        let width = dim.alpha() + 1;
        Self {
            dim,
            graph,
            oracle,
            opts,
            sigma: SigmaState::new(graph, width),
            cap: Vec::with_capacity(dim.max_depth()),
            in_cap: vec![false; graph.num_points()],
            elim: vec![false; graph.num_points()],
            counters: Counters::new(dim.max_depth()),
        }
    }

    /// Runs the full orderly generation from the empty cap.
    pub fn run(&mut self, sink: &mut dyn OutputSink) {
        self.extend(0, sink);
    }

    fn candidate_pool(&self) -> Vec<usize> {
        (0..self.graph.num_points())
            .filter(|&i| !self.in_cap[i] && !self.elim[i])
            .collect()
    }

    fn extend(&mut self, start: usize, sink: &mut dyn OutputSink) {
        if self.candidate_pool().is_empty() {
            let group_order = self.canonical_group_order();
            self.counters.record_maximal(self.cap.len(), group_order);
            sink.maximal(self.cap.len(), &self.cap);
            return;
        }

        for cand_idx in start..self.graph.num_points() {
            if self.in_cap[cand_idx] || self.elim[cand_idx] {
                continue;
            }
            let cand = PointId(cand_idx as u32);

            if self.opts.alpha_prune && !self.is_alpha_maximal(cand) {
                continue;
            }

            let eliminated = self.apply_point(cand);

            let canonical = if self.opts.symmetry_prune {
                self.is_canonical_choice(cand)
            } else {
                true
            };

            if canonical {
                self.counters.record_visit(self.cap.len());
                sink.enter(self.cap.len(), cand);
                self.extend(cand_idx + 1, sink);
                sink.leave(self.cap.len());
            }

            self.undo_point(cand, eliminated);
        }
    }

    /// Compares `cand`'s Σ-invariant histogram against every point already
    /// in the cap; `cand` may extend only if it is lexicographically
    /// maximal among them (spec.md §4.4(a), resolved against every prior
    /// point rather than only the most recent one).
    fn is_alpha_maximal(&self, cand: PointId) -> bool {
        self.cap.iter().all(|&p| self.sigma.vec_geq(cand, p))
    }

    fn apply_point(&mut self, cand: PointId) -> Vec<PointId> {
        let mut eliminated = Vec::new();
        let cap_snapshot = self.cap.clone();
        for p in cap_snapshot {
            let third = self.graph.third(&self.graph.point(p), &self.graph.point(cand));
            let tid = self.graph.point_id(&third);
            if !self.in_cap[tid.0 as usize] && !self.elim[tid.0 as usize] {
                self.elim[tid.0 as usize] = true;
                eliminated.push(tid);
            }
        }
        self.in_cap[cand.0 as usize] = true;
        self.cap.push(cand);
        self.sigma.add_point(self.graph, cand);
        eliminated
    }

    fn undo_point(&mut self, cand: PointId, eliminated: Vec<PointId>) {
        self.sigma.remove_point(self.graph, cand);
        self.cap.pop();
        self.in_cap[cand.0 as usize] = false;
        for tid in eliminated {
            self.elim[tid.0 as usize] = false;
        }
    }

    /// Builds the colored partition for the oracle: every already-fixed cap
    /// point is its own singleton cell (pinned in place), the live
    /// candidate pool (including `cand`) shares one cell, eliminated points
    /// share another, and hyperplanes form a final cell.
    fn build_coloring(&self, cand: PointId) -> Coloring {
        let np = self.graph.num_points() as u32;
        let nh = self.graph.num_hyperplanes() as u32;
        let mut cells: Vec<Vec<VertexId>> = Vec::new();

        for &p in &self.cap {
            if p != cand {
                cells.push(vec![p.0]);
            }
        }

        let mut candidates: Vec<VertexId> = (0..np)
            .filter(|&i| {
                let idx = i as usize;
                !self.in_cap[idx] && !self.elim[idx]
            })
            .collect();
        candidates.push(cand.0);
        candidates.sort_unstable();
        cells.push(candidates);

        let eliminated: Vec<VertexId> = (0..np)
            .filter(|&i| self.elim[i as usize])
            .collect();
        if !eliminated.is_empty() {
            cells.push(eliminated);
        }

        cells.push((np..np + nh).collect());

        Coloring::from_cells(&cells)
    }

    /// Accepts `cand` only if it is the smallest-index point in its orbit
    /// among the remaining (non-eliminated, non-cap) candidates — the
    /// canonical-representative rule that prevents visiting symmetric
    /// extensions more than once.
    fn is_canonical_choice(&self, cand: PointId) -> bool {
        let coloring = self.build_coloring(cand);
        let result = match self.oracle.canonicalize(self.graph, &coloring) {
            Ok(r) => r,
            Err(_) => return true,
        };
        let cand_root = result.orbits[cand.0 as usize];
        for i in 0..self.graph.num_points() {
            if self.in_cap[i] || self.elim[i] {
                continue;
            }
            if (i as u32) >= cand.0 {
                continue;
            }
            if result.orbits[i] == cand_root {
                return false;
            }
        }
        true
    }

    fn canonical_group_order(&self) -> u64 {
        if !self.opts.symmetry_prune || self.cap.is_empty() {
            return 1;
        }
        let last = *self.cap.last().unwrap();
        let coloring = self.build_coloring(last);
        self.oracle
            .canonicalize(self.graph, &coloring)
            .map(|r| r.group_order)
            .unwrap_or(1)
    }

    /// The ambient dimension this context was built for.
    pub fn dimension(&self) -> &Dimension {
        &self.dim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::RecordingSink;
    use capset_sym::RefinementOracle;

    #[test]
    fn n2_enumeration_finds_maximal_caps_of_size_four() {
        let dim = Dimension::new(2).unwrap();
        let graph = IncidenceGraph::build(dim).unwrap();
        let oracle = RefinementOracle::default();
        let opts = EngineOpts {
            alpha_prune: true,
            symmetry_prune: false,
        };
        let mut ctx = EngineContext::new(&graph, &oracle, opts);
        let mut sink = RecordingSink::default();
        ctx.run(&mut sink);

        assert!(!ctx.counters.comps[4].to_string().eq("0"), "n=2 has maximal caps of size 4");
    }
}
