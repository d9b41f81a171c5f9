/// Closed-form near-balanced group-size allocation for large pools.
///
/// Uses the fewest groups such that no group needs to exceed `max_value`
/// (`ceil(w / max_value)` groups), then spreads members as evenly as
/// possible: every group gets `w / x` members and the first `w mod x`
/// groups get one extra. This trades shape entropy for O(number of groups)
/// work and handles prime pool sizes that naive equal splitting cannot
/// decompose within bounds.
///
/// Invariant: for any `min_value` with `max_value >= 2 * min_value - 1`
/// (enforced at configuration load), every returned size lies within
/// `[min_value, max_value]` for all `w >= min_value`.
///
/// Callers must pass `w >= 1`.
pub fn balanced_allocation(w: usize, max_value: usize) -> Vec<usize> {
    let groups = w.div_ceil(max_value);
    let base = w / groups;
    let extra = w % groups;

    (0..groups).map(|index| if index < extra { base + 1 } else { base }).collect()
}

#[cfg(test)]
mod tests {
    use super::balanced_allocation;

    #[test]
    fn respects_bounds_for_every_pool_size_up_to_a_thousand() {
        // min=3, max=5 satisfies max >= 2*min - 1, so every w >= 3 must
        // decompose within bounds, primes included.
        for w in 3..=1000 {
            let sizes = balanced_allocation(w, 5);

            assert_eq!(sizes.iter().sum::<usize>(), w, "allocation must cover the pool: w={w}");
            assert_eq!(sizes.len(), w.div_ceil(5), "fewest groups that fit under the maximum");
            assert!(
                sizes.iter().all(|&size| (3..=5).contains(&size)),
                "size out of bounds for w={w}: {sizes:?}"
            );
        }
    }

    #[test]
    fn seventeen_members_split_into_four_near_equal_groups() {
        let mut sizes = balanced_allocation(17, 5);
        sizes.sort_unstable();
        assert_eq!(sizes, vec![4, 4, 4, 5]);
    }

    #[test]
    fn sizes_differ_by_at_most_one() {
        for w in 1..=400 {
            let sizes = balanced_allocation(w, 5);
            let smallest = sizes.iter().min().copied().unwrap_or_default();
            let largest = sizes.iter().max().copied().unwrap_or_default();
            assert!(largest - smallest <= 1, "allocation must stay near-balanced: w={w}");
        }
    }

    #[test]
    fn small_pools_become_a_single_group() {
        assert_eq!(balanced_allocation(3, 5), vec![3]);
        assert_eq!(balanced_allocation(5, 5), vec![5]);
    }
}
