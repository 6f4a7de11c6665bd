//! Greedy random cap growth: repeatedly add a uniformly random surviving
//! candidate point until none remain. Unlike the orderly engine this never
//! backtracks and never consults the symmetry oracle — it is a fast,
//! biased estimator of the maximal-cap-size distribution, not an exhaustive
//! enumerator. Grounded on the original source's greedy sampler, which uses
//! the same "pick any candidate, eliminate its collinear completions, repeat"
//! kernel without canonicity bookkeeping.

use capset_core::rng::RngHandle;
use capset_graph::{IncidenceGraph, PointId};
use rand::Rng;

/// Grows one random maximal cap and returns it.
pub fn greedy_grow(graph: &IncidenceGraph, rng: &mut RngHandle) -> Vec<PointId> {
    let n = graph.num_points();
    let mut in_cap = vec![false; n];
    let mut elim = vec![false; n];
    let mut cap = Vec::new();

    loop {
        let pool: Vec<usize> = (0..n).filter(|&i| !in_cap[i] && !elim[i]).collect();
        if pool.is_empty() {
            break;
        }
        let choice = pool[rng.gen_range(0..pool.len())];
        let cand = PointId(choice as u32);

        for &p in &cap {
            let third = graph.third(&graph.point(p), &graph.point(cand));
            let tid = graph.point_id(&third);
            if !in_cap[tid.0 as usize] {
                elim[tid.0 as usize] = true;
            }
        }
        in_cap[choice] = true;
        cap.push(cand);
    }

    cap
}

#[cfg(test)]
mod tests {
    use super::*;
    use capset_core::dimension::Dimension;

    #[test]
    fn greedy_grow_produces_a_cap_with_no_collinear_triple() {
        let dim = Dimension::new(2).unwrap();
        let graph = IncidenceGraph::build(dim).unwrap();
        let mut rng = RngHandle::from_seed(42);
        let cap = greedy_grow(&graph, &mut rng);
        assert!(!cap.is_empty());
        for &a in &cap {
            for &b in &cap {
                if a == b {
                    continue;
                }
                let third = graph.third(&graph.point(a), &graph.point(b));
                let tid = graph.point_id(&third);
                assert!(!cap.contains(&tid), "greedy cap must contain no collinear triple");
            }
        }
    }
}
