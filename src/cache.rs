//! Bounded memoization for the operator kernel.
//!
//! The apply cache is an optimization, not a source of truth: any entry
//! may be evicted or the whole table cleared at any time without changing
//! the result of an operation, only its cost. Collisions simply replace
//! the existing entry (no chaining), mirroring the direct-mapped apply
//! cache the teacher crate ships as its default (`apply-cache-direct-mapped`).

use rustc_hash::FxHashMap;

use crate::edge::Edge;

/// One entry's key. Each recursive operator in `ops.rs` has its own
/// variant so that, e.g., a `Quantify` result can never collide with an
/// `And` result even if the edges happen to match.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum CacheKey {
    Binary(BinOp, Edge, Edge),
    Ite(Edge, Edge, Edge),
    /// Single-variable compose/cofactor, keyed directly by the level and
    /// replacement edge — unlike `Substitute`, this is reusable across
    /// distinct top-level calls since the replacement itself is hashable.
    Compose(u32, Edge, Edge),
    /// Simultaneous substitution, keyed by a fresh id per top-level call
    /// (so that two different substitution vectors applied to the same
    /// edge never collide) plus the edge being substituted into.
    Substitute(u64, Edge),
    Quantify(QuantOp, Edge, VarSetId),
    RelProd(QuantOp, Edge, Edge, VarSetId),
}

/// The closed set of binary operators `apply` supports.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinOp {
    And,
    Or,
    Xor,
    Implies,
    Equiv,
    Diff,
    Nand,
    Nor,
    Xnor,
}

/// Existential vs. universal quantification / relational product.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum QuantOp {
    Exist,
    Forall,
}

/// A hashable identifier for a set of quantified variables (the sorted
/// list of their levels). Quantifying over the same set twice with
/// different `VarSetId`s simply costs a cache miss, never a wrong answer.
pub type VarSetId = std::rc::Rc<[u32]>;

/// Bounded, direct-mapped memoization table.
pub struct ApplyCache {
    map: FxHashMap<CacheKey, Edge>,
    max_entries: usize,
    hits: u64,
    misses: u64,
    /// Per-operator call counter, gated behind the `statistics` feature
    /// (mirrors the teacher's `stat!(call ...)` instrumentation, which
    /// also costs nothing when the feature is off).
    #[cfg(feature = "statistics")]
    calls: u64,
}

impl ApplyCache {
    pub fn new(max_entries: usize) -> Self {
        ApplyCache {
            map: FxHashMap::default(),
            max_entries,
            hits: 0,
            misses: 0,
            #[cfg(feature = "statistics")]
            calls: 0,
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Edge> {
        #[cfg(feature = "statistics")]
        {
            self.calls += 1;
        }
        match self.map.get(key) {
            Some(&e) => {
                self.hits += 1;
                Some(e)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    #[cfg(feature = "statistics")]
    pub fn calls(&self) -> u64 {
        self.calls
    }

    #[cfg(not(feature = "statistics"))]
    pub fn calls(&self) -> u64 {
        0
    }

    pub fn insert(&mut self, key: CacheKey, value: Edge) {
        if self.map.len() >= self.max_entries && !self.map.contains_key(&key) {
            // Direct-mapped eviction: drop an arbitrary existing entry
            // rather than growing past the configured bound.
            if let Some(k) = self.map.keys().next().cloned() {
                self.map.remove(&k);
            }
        }
        self.map.insert(key, value);
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries;
    }
}
