pub mod get;
pub mod sync;

/// Number of rooms returned by either kind of recommendation.
pub const RECOMMENDATION_COUNT: usize = 10;
