//! End-to-end group assignment driver.
//!
//! Two strategies, selected by pool size against the configured threshold:
//! exact enumeration (materialize every valid size composition and pick one
//! uniformly) below the threshold, closed-form balanced allocation above it.
//! Enumeration is maximally fair over valid shapes but exponential-ish in
//! pool size; balanced allocation is cheap but biased toward near-equal
//! groups, which is acceptable because large pools carry plenty of entropy
//! from member shuffling alone.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::allocation::balanced_allocation;
use crate::compositions::bounded_compositions;
use crate::config::GroupingConfig;
use crate::errors::GroupingError;

/// Pure, synchronous grouping engine.
///
/// Every call to [`GroupingEngine::assign`] draws from the operating
/// system's CSPRNG through its own handle, so concurrent invocations never
/// share shuffle state and group assignment is not predictable from prior
/// outputs.
#[derive(Clone, Copy, Debug)]
pub struct GroupingEngine {
    config: GroupingConfig,
}

impl GroupingEngine {
    /// `config` is expected to have passed [`crate::config::AppConfig`]
    /// validation: positive bounds, `min <= max`, `max >= 2 * min - 1`.
    pub fn new(config: GroupingConfig) -> Self {
        Self { config }
    }

    /// Partition `members` into randomly ordered, randomly filled groups
    /// whose sizes lie within the configured bounds.
    ///
    /// The result covers the input exactly once. A pool smaller than the
    /// minimum group size comes back as a single undersized group; an empty
    /// pool is an error.
    pub fn assign<T: Clone>(&self, members: &[T]) -> Result<Vec<Vec<T>>, GroupingError> {
        if members.is_empty() {
            return Err(GroupingError::EmptyPool);
        }

        let mut rng = OsRng;
        let mut pool = members.to_vec();
        pool.shuffle(&mut rng);

        let mut sizes = if pool.len() <= self.config.randomizer_threshold {
            debug!(pool_size = pool.len(), strategy = "enumeration", "choosing group sizes");
            select_composition(&mut rng, pool.len(), &self.config)?
        } else {
            debug!(pool_size = pool.len(), strategy = "balanced", "choosing group sizes");
            balanced_allocation(pool.len(), self.config.max_group_size)
        };

        // Independent shuffle of part order so slice position carries no
        // information about the chosen shape.
        sizes.shuffle(&mut rng);

        let mut groups = Vec::with_capacity(sizes.len());
        let mut rest = pool.as_slice();
        for size in sizes {
            let (group, tail) = rest.split_at(size);
            groups.push(group.to_vec());
            rest = tail;
        }

        Ok(groups)
    }
}

/// Materialize every valid composition of `pool_size` and pick one uniformly.
///
/// The candidate set is never astronomically large below the switchover
/// threshold, so full materialization keeps selection exactly uniform.
fn select_composition<R: Rng>(
    rng: &mut R,
    pool_size: usize,
    config: &GroupingConfig,
) -> Result<Vec<usize>, GroupingError> {
    let mut candidates: Vec<Vec<usize>> =
        bounded_compositions(pool_size, config.min_group_size, config.max_group_size).collect();

    if candidates.is_empty() {
        // Unreachable for validated configurations (max >= 2*min - 1
        // guarantees every pool size >= min decomposes, and smaller pools
        // fall back to a single undersized group).
        return Err(GroupingError::NoValidComposition { pool_size });
    }

    let index = rng.gen_range(0..candidates.len());
    Ok(candidates.swap_remove(index))
}
