use thiserror::Error;

/// Failures surfaced by the grouping driver.
///
/// There is no transient-failure class here: every variant is a caller
/// programming error or a configuration error, reported immediately and
/// never retried internally.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GroupingError {
    #[error("cannot group an empty member pool")]
    EmptyPool,
    #[error("no group-size composition of {pool_size} fits the configured bounds")]
    NoValidComposition { pool_size: usize },
}
