//! Arbitrary-precision counters for the orderly search (spec.md §4.7).
//!
//! The original source's 64-bit `tots`/`grp_size`/`glfqn_size` counters
//! overflow once `n >= 5`; here every counter is a [`BigUint`] instead.

use num_bigint::BigUint;
use num_traits::Zero;

/// Per-depth bookkeeping for one orderly-generation run.
#[derive(Debug, Clone)]
pub struct Counters {
    /// `tots[l]`: number of orderly search-tree nodes reached at cap size `l`.
    pub tots: Vec<BigUint>,
    /// `comps[l]`: number of canonical (symmetry-class representative)
    /// maximal caps of size `l`.
    pub comps: Vec<BigUint>,
    /// `cases[l]`: sum of the oracle's group-order contribution over every
    /// canonical maximal cap of size `l`, used to recover the total
    /// (non-canonical) maximal cap count via orbit counting.
    pub cases: Vec<BigUint>,
}

impl Counters {
    /// Allocates all three tables with one slot per depth, `0..=max_depth`.
    pub fn new(max_depth: usize) -> Self {
        let len = max_depth + 1;
        Self {
            tots: vec![BigUint::zero(); len],
            comps: vec![BigUint::zero(); len],
            cases: vec![BigUint::zero(); len],
        }
    }

    /// Records that the search tree reached a partial cap of size `depth`.
    pub fn record_visit(&mut self, depth: usize) {
        self.tots[depth] += 1u32;
    }

    /// Records a canonical maximal cap of size `depth` with the given
    /// stabilizer-order contribution from the symmetry oracle.
    pub fn record_maximal(&mut self, depth: usize, group_order: u64) {
        self.comps[depth] += 1u32;
        self.cases[depth] += group_order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_counters_are_all_zero() {
        let counters = Counters::new(5);
        assert_eq!(counters.tots.len(), 6);
        for v in &counters.tots {
            assert!(v.is_zero());
        }
    }

    #[test]
    fn record_maximal_increments_comps_and_cases() {
        let mut counters = Counters::new(4);
        counters.record_maximal(4, 3);
        assert_eq!(counters.comps[4], BigUint::from(1u32));
        assert_eq!(counters.cases[4], BigUint::from(3u32));
    }
}
