//! Manager statistics, returned by [`crate::manager::BddManager::statistics`].

/// A snapshot of manager-wide counters. Mirrors the kind of counters the
/// teacher crate exposes behind its `statistics` feature (per-operator
/// call counts and apply-cache hit/miss rates), gated the same way here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub live_nodes: usize,
    pub peak_nodes: usize,
    pub unique_table_entries: usize,
    pub cache_entries: usize,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub num_variables: usize,
    pub reorder_count: u64,
    /// Total number of sweep passes over the lifetime of the manager.
    pub gc_count: u64,
    /// Recursive operator-kernel calls that reached the apply cache
    /// (i.e. past terminal/short-circuit fast paths). Always `0` unless
    /// built with the `statistics` feature.
    pub op_calls: u64,
}
