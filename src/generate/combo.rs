//! Combination-sum rounds: choose displayed numbers that add up to a target

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::settings::Difficulty;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboProblem {
    /// Numbers in display order
    pub numbers: Vec<u32>,
    pub target: u32,
}

impl ComboProblem {
    /// Sum of the numbers at `indices`. Out-of-range indices count as zero.
    pub fn sum_of(&self, indices: &[usize]) -> u32 {
        indices
            .iter()
            .filter_map(|&i| self.numbers.get(i))
            .sum()
    }

    /// Whether the selection adds up to the target.
    ///
    /// Any selection with the right sum is accepted, not just the subset the
    /// target was built from; several subsets can match by coincidence.
    pub fn is_solution(&self, indices: &[usize]) -> bool {
        !indices.is_empty() && self.sum_of(indices) == self.target
    }
}

/// Generate a combo round for `difficulty`.
///
/// The target is the sum of two or three numbers taken from a shuffled copy
/// of the displayed set, so at least one solution always exists.
pub fn generate_combo_problem<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty) -> ComboProblem {
    let (count, max) = difficulty.combo_shape();

    let mut numbers: Vec<u32> = (0..count).map(|_| rng.random_range(1..=max)).collect();

    let pick = rng.random_range(2..=3).min(count);
    let mut shuffled = numbers.clone();
    shuffled.shuffle(rng);
    let target = shuffled[..pick].iter().sum();

    numbers.shuffle(rng);
    ComboProblem { numbers, target }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Does any subset of two or three numbers hit the target?
    fn has_small_solution(p: &ComboProblem) -> bool {
        let n = p.numbers.len();
        for i in 0..n {
            for j in i + 1..n {
                if p.is_solution(&[i, j]) {
                    return true;
                }
                for k in j + 1..n {
                    if p.is_solution(&[i, j, k]) {
                        return true;
                    }
                }
            }
        }
        false
    }

    #[test]
    fn test_shape_by_difficulty() {
        let mut rng = Pcg32::seed_from_u64(5);
        for d in Difficulty::ALL {
            let (count, max) = d.combo_shape();
            let p = generate_combo_problem(&mut rng, d);
            assert_eq!(p.numbers.len(), count);
            assert!(p.numbers.iter().all(|&n| (1..=max).contains(&n)));
        }
    }

    #[test]
    fn test_any_matching_subset_is_accepted() {
        let p = ComboProblem {
            numbers: vec![2, 3, 5, 4],
            target: 9,
        };
        assert!(p.is_solution(&[0, 1, 3])); // 2 + 3 + 4
        assert!(p.is_solution(&[2, 3])); // 5 + 4
        assert!(!p.is_solution(&[0, 1]));
        assert!(!p.is_solution(&[]));
    }

    proptest! {
        #[test]
        fn target_is_reachable(seed in any::<u64>(), tier in 0usize..3) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let p = generate_combo_problem(&mut rng, Difficulty::ALL[tier]);
            prop_assert!(has_small_solution(&p));
        }
    }
}
