//! Σ-invariant maintenance (spec.md §4.3): for every point `p` of the
//! ambient space, `alpha[p]` is the histogram, over the hyperplanes incident
//! to `p`, of how many of the current partial cap's points each hyperplane
//! already contains.

use capset_graph::{HyperplaneId, IncidenceGraph, PointId};

/// Incrementally maintained per-point hyperplane-intersection histograms.
pub struct SigmaState {
    /// `alpha[p][m]` = number of hyperplanes through point `p` that meet the
    /// current cap in exactly `m` points.
    alpha: Vec<Vec<u32>>,
    /// Number of current cap points each hyperplane already contains.
    hyp_count: Vec<u32>,
    width: usize,
}

impl SigmaState {
    /// Builds an all-empty state: every hyperplane meets the (empty) cap in
    /// zero points, so every point's histogram is concentrated at `m = 0`.
    pub fn new(graph: &IncidenceGraph, width: usize) -> Self {
        let mut alpha = vec![vec![0u32; width]; graph.num_points()];
        for row in &mut alpha {
            row[0] = graph.dimension().normals() as u32;
        }
        Self {
            alpha,
            hyp_count: vec![0u32; graph.num_hyperplanes()],
            width,
        }
    }

    /// The histogram for point `p`.
    pub fn alpha_of(&self, p: PointId) -> &[u32] {
        &self.alpha[p.0 as usize]
    }

    /// Hashes a point's histogram into a single affine-invariant scalar:
    /// `Σ_{k≥1} alpha[p][k] * k^2`, negated when `alpha[p][0] != 0`. The
    /// exact form only needs to be affine-invariant; this is the original
    /// source's convention, carried over unchanged.
    pub fn alpha_hash(&self, p: PointId) -> i64 {
        let row = &self.alpha[p.0 as usize];
        let mut acc: i64 = 0;
        for (k, count) in row.iter().enumerate().skip(1) {
            acc += *count as i64 * (k * k) as i64;
        }
        if row[0] != 0 {
            acc = -acc;
        }
        acc
    }

    /// Lexicographic comparison of two points' full histograms.
    pub fn vec_eq(&self, a: PointId, b: PointId) -> bool {
        self.alpha_of(a) == self.alpha_of(b)
    }

    /// `true` if `a`'s histogram is lexicographically `>=` `b`'s.
    pub fn vec_geq(&self, a: PointId, b: PointId) -> bool {
        self.alpha_of(a) >= self.alpha_of(b)
    }

    /// Registers `point` as having just been added to the cap: every
    /// hyperplane through it gains one more intersection, which shifts a
    /// histogram bucket for every point on that hyperplane.
    pub fn add_point(&mut self, graph: &IncidenceGraph, point: PointId) {
        for &h in graph.hyperplanes_of(point) {
            self.shift_hyperplane(graph, h, 1);
        }
    }

    /// Undoes [`Self::add_point`].
    pub fn remove_point(&mut self, graph: &IncidenceGraph, point: PointId) {
        for &h in graph.hyperplanes_of(point) {
            self.shift_hyperplane(graph, h, -1);
        }
    }

    fn shift_hyperplane(&mut self, graph: &IncidenceGraph, h: HyperplaneId, delta: i32) {
        let before = self.hyp_count[h.0 as usize] as usize;
        let after = (before as i32 + delta) as usize;
        debug_assert!(after < self.width, "alpha histogram overflowed its allocated width");
        for &p in graph.points_of(h) {
            let row = &mut self.alpha[p.0 as usize];
            row[before] -= 1;
            row[after] += 1;
        }
        self.hyp_count[h.0 as usize] = after as u32;
    }

    /// Debug invariant: every point's histogram sums to `NORMALS`, since
    /// every point lies on exactly that many hyperplanes.
    pub fn debug_check_invariant(&self, graph: &IncidenceGraph) {
        if cfg!(debug_assertions) {
            let expected = graph.dimension().normals() as u32;
            for row in &self.alpha {
                let sum: u32 = row.iter().sum();
                debug_assert_eq!(sum, expected, "alpha histogram must sum to NORMALS");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capset_core::dimension::Dimension;

    #[test]
    fn add_then_remove_restores_initial_state() {
        let dim = Dimension::new(2).unwrap();
        let graph = IncidenceGraph::build(dim).unwrap();
        let width = dim.alpha() + 1;
        let mut sigma = SigmaState::new(&graph, width);
        let before: Vec<Vec<u32>> = (0..graph.num_points())
            .map(|p| sigma.alpha_of(PointId(p as u32)).to_vec())
            .collect();

        sigma.add_point(&graph, PointId(0));
        sigma.debug_check_invariant(&graph);
        sigma.remove_point(&graph, PointId(0));
        sigma.debug_check_invariant(&graph);

        for p in 0..graph.num_points() {
            assert_eq!(sigma.alpha_of(PointId(p as u32)), before[p].as_slice());
        }
    }

    proptest::proptest! {
        #[test]
        fn add_remove_round_trips_for_any_point(raw_pid in 0u32..9) {
            let dim = Dimension::new(2).unwrap();
            let graph = IncidenceGraph::build(dim).unwrap();
            let width = dim.alpha() + 1;
            let mut sigma = SigmaState::new(&graph, width);
            let point = PointId(raw_pid % graph.num_points() as u32);
            let before = sigma.alpha_of(point).to_vec();

            sigma.add_point(&graph, point);
            sigma.remove_point(&graph, point);

            proptest::prop_assert_eq!(sigma.alpha_of(point), before.as_slice());
        }
    }
}
