//! The manager surface: variable declaration, the name/level mapping,
//! configuration, and statistics — the façade every other module is
//! wired up behind.
//!
//! `BddManager` owns the [`NodeStore`], the [`ApplyCache`], and the
//! variable bookkeeping, and re-exposes the free functions in `ops.rs` /
//! `reorder.rs` as methods that take names/[`VarId`]s instead of raw
//! levels. Keeping the recursive kernel as free functions (see the module
//! doc on `ops.rs`) and the manager as a thin dispatcher mirrors the
//! teacher's split between a generic `Manager` trait and the concrete
//! rule implementations in `oxidd-rules-bdd`.

use log::{debug, trace};

use crate::cache::{ApplyCache, BinOp, QuantOp};
use crate::edge::{Edge, Level};
use crate::error::{BddError, BddResult};
use crate::ops;
use crate::reorder;
use crate::stats::Statistics;
use crate::store::NodeStore;

/// A stable handle to a declared variable. Unlike [`Level`], a `VarId`
/// never changes once `declare` returns it — reordering permutes levels,
/// not variable identities.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct VarId(u32);

impl VarId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Recognized `configure(...)` options, per the closed set named in the
/// distilled spec §4.7. A typed struct (rather than a stringly-typed
/// option bag) turns a typo into a compile error instead of an
/// `invalid-option` runtime failure the spec's error taxonomy never
/// actually lists — see DESIGN.md's Open Question resolution.
#[derive(Clone, Debug)]
pub struct ManagerConfig {
    /// Enable automatic sifting once live-node growth crosses a
    /// heuristic threshold (checked after `collect_garbage` and after
    /// `apply` calls that grow the store). Implementation-defined
    /// trigger, not a behavioral contract — see distilled spec §9 Open
    /// Questions.
    pub reordering: bool,
    /// Upper bound on apply-cache entries.
    pub max_cache_size: usize,
    /// Advisory initial allocation size in bytes. Not enforced; recorded
    /// for callers that want to read it back via `statistics`-adjacent
    /// tuning, mirroring the teacher's `memory_estimate` manager builder
    /// option.
    pub memory_estimate: usize,
    /// Sifting cutoff: abandon a sift direction once live-node count
    /// exceeds `best_so_far * max_growth`.
    pub max_growth: f64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            reordering: false,
            max_cache_size: 1 << 20,
            memory_estimate: 1 << 24,
            max_growth: 1.2,
        }
    }
}

/// The shared multi-rooted BDD manager: node store, apply cache,
/// variable/level bookkeeping, configuration and statistics in one place.
/// Single-threaded (see SPEC_FULL §5); sharing across an `Rc<RefCell<_>>`
/// boundary is handled one layer up, in [`crate::function::BddManagerRef`].
pub struct BddManager {
    store: NodeStore,
    cache: ApplyCache,
    names: Vec<String>,
    /// `var_level[VarId.0]` is that variable's current level.
    var_level: Vec<Level>,
    /// `level_var[level]` is the inverse mapping.
    level_var: Vec<VarId>,
    config: ManagerConfig,
    next_subst_id: u64,
    stats: Statistics,
    /// Live-node count at the end of the last sift, used as the baseline
    /// for the automatic-reordering growth trigger.
    last_sift_size: usize,
}

impl BddManager {
    pub fn new() -> Self {
        Self::with_config(ManagerConfig::default())
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        let store = NodeStore::new();
        let cache = ApplyCache::new(config.max_cache_size);
        BddManager {
            store,
            cache,
            names: Vec::new(),
            var_level: Vec::new(),
            level_var: Vec::new(),
            config,
            next_subst_id: 0,
            stats: Statistics::default(),
            last_sift_size: 1,
        }
    }

    // --- variable declaration -------------------------------------------

    /// Register a variable at the next free level. Fails with
    /// [`BddError::AlreadyDeclared`] if `name` is already registered.
    pub fn declare(&mut self, name: &str) -> BddResult<VarId> {
        if self.names.iter().any(|n| n == name) {
            return Err(BddError::AlreadyDeclared(name.to_string()));
        }
        let level = self.names.len() as Level;
        let id = VarId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.var_level.push(level);
        self.level_var.push(id);
        self.store.ensure_level(level);
        trace!("declared variable `{name}` at level {level}");
        Ok(id)
    }

    /// Look up a previously declared variable by name.
    pub fn lookup(&self, name: &str) -> BddResult<VarId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| VarId(i as u32))
            .ok_or_else(|| BddError::UnknownVariable(name.to_string()))
    }

    pub fn name_of(&self, id: VarId) -> &str {
        &self.names[id.index()]
    }

    pub fn level_of(&self, id: VarId) -> Level {
        self.var_level[id.index()]
    }

    pub fn var_at(&self, level: Level) -> BddResult<VarId> {
        self.level_var
            .get(level as usize)
            .copied()
            .ok_or(BddError::InvalidEdge)
    }

    pub fn num_variables(&self) -> usize {
        self.names.len()
    }

    /// The BDD testing `id` directly (`ITE(id, true, false)`).
    pub fn var(&mut self, id: VarId) -> BddResult<Edge> {
        ops::var_edge(&mut self.store, self.level_of(id))
    }

    pub fn one(&self) -> Edge {
        Edge::one()
    }

    pub fn zero(&self) -> Edge {
        Edge::zero()
    }

    /// `cube(assignment)`: the conjunction of the named literals.
    pub fn cube(&mut self, assignment: &[(VarId, bool)]) -> BddResult<Edge> {
        let levels: Vec<(Level, bool)> = assignment
            .iter()
            .map(|&(v, b)| (self.level_of(v), b))
            .collect();
        ops::cube(&mut self.store, &mut self.cache, &levels)
    }

    // --- node access ------------------------------------------------------

    pub fn is_terminal(&self, e: Edge) -> bool {
        e.is_terminal()
    }

    pub fn is_complemented(&self, e: Edge) -> bool {
        e.complemented
    }

    pub fn level(&self, e: Edge) -> BddResult<Level> {
        self.store.level(e)
    }

    pub fn low(&self, e: Edge) -> BddResult<Edge> {
        Ok(self.store.children(e)?.0)
    }

    pub fn high(&self, e: Edge) -> BddResult<Edge> {
        Ok(self.store.children(e)?.1)
    }

    // --- operator kernel ---------------------------------------------------

    pub fn not(&self, e: Edge) -> Edge {
        ops::not(e)
    }

    pub fn apply(&mut self, op: BinOp, f: Edge, g: Edge) -> BddResult<Edge> {
        let res = ops::apply_bin(&mut self.store, &mut self.cache, op, f, g)?;
        self.maybe_auto_reorder()?;
        Ok(res)
    }

    pub fn ite(&mut self, f: Edge, g: Edge, h: Edge) -> BddResult<Edge> {
        let res = ops::ite(&mut self.store, &mut self.cache, f, g, h)?;
        self.maybe_auto_reorder()?;
        Ok(res)
    }

    pub fn compose(&mut self, e: Edge, v: VarId, r: Edge) -> BddResult<Edge> {
        ops::compose(&mut self.store, &mut self.cache, e, self.level_of(v), r)
    }

    pub fn cofactor(&mut self, e: Edge, v: VarId, value: bool) -> BddResult<Edge> {
        ops::cofactor(&mut self.store, &mut self.cache, e, self.level_of(v), value)
    }

    /// General variable rename `e[v1/w1, v2/w2, ...]`, via simultaneous
    /// substitution. No level-adjacency requirement.
    pub fn rename(&mut self, e: Edge, pairs: &[(VarId, VarId)]) -> BddResult<Edge> {
        let levels: Vec<(Level, Level)> = pairs
            .iter()
            .map(|&(v, w)| (self.level_of(v), self.level_of(w)))
            .collect();
        let id = self.next_subst_id;
        self.next_subst_id += 1;
        ops::rename(&mut self.store, &mut self.cache, e, &levels, id)
    }

    /// Fast-path rename for a single pair of variables whose levels are
    /// adjacent: `e[v/w, w/v]`. Fails with [`BddError::InvalidOrder`] if
    /// the two variables are not at adjacent levels.
    pub fn rename_adjacent_pair(&mut self, e: Edge, v: VarId, w: VarId) -> BddResult<Edge> {
        let (lv, lw) = (self.level_of(v), self.level_of(w));
        let lo = lv.min(lw);
        let hi = lv.max(lw);
        if hi != lo + 1 {
            return Err(BddError::InvalidOrder(format!(
                "rename_adjacent_pair requires adjacent levels, got {lv} and {lw}"
            )));
        }
        ops::rename_adjacent_pair(&mut self.store, e, lo)
    }

    fn var_set(&self, vars: &[VarId]) -> crate::cache::VarSetId {
        ops::make_var_set(vars.iter().map(|&v| self.level_of(v)))
    }

    pub fn quantify(&mut self, e: Edge, vars: &[VarId], universal: bool) -> BddResult<Edge> {
        let op = if universal { QuantOp::Forall } else { QuantOp::Exist };
        let set = self.var_set(vars);
        ops::quantify(&mut self.store, &mut self.cache, op, e, &set)
    }

    pub fn relational_product(&mut self, a: Edge, b: Edge, vars: &[VarId], universal: bool) -> BddResult<Edge> {
        let op = if universal { QuantOp::Forall } else { QuantOp::Exist };
        let set = self.var_set(vars);
        ops::relational_product(&mut self.store, &mut self.cache, op, a, b, &set)
    }

    pub fn support(&self, e: Edge) -> BddResult<std::collections::BTreeSet<VarId>> {
        let levels = ops::support(&self.store, e)?;
        Ok(levels.into_iter().map(|l| self.level_var[l as usize]).collect())
    }

    pub fn sat_count(&self, e: Edge, nvars: u32) -> BddResult<u128> {
        ops::count(&self.store, e, nvars)
    }

    pub fn pick(&self, e: Edge) -> BddResult<Option<std::collections::BTreeMap<VarId, bool>>> {
        let r = ops::pick(&self.store, e)?;
        Ok(r.map(|m| m.into_iter().map(|(l, b)| (self.level_var[l as usize], b)).collect()))
    }

    pub fn pick_iter(&self, e: Edge, care: Option<&[VarId]>) -> BddResult<Vec<std::collections::BTreeMap<VarId, bool>>> {
        let care_levels = care.map(|vars| vars.iter().map(|&v| self.level_of(v)).collect::<std::collections::BTreeSet<_>>());
        let assignments = ops::pick_iter(&self.store, e, care_levels.as_ref())?;
        Ok(assignments
            .into_iter()
            .map(|m| m.into_iter().map(|(l, b)| (self.level_var[l as usize], b)).collect())
            .collect())
    }

    // --- reference counting & collection -----------------------------------

    pub fn incref(&mut self, e: Edge) -> BddResult<()> {
        self.store.incref(e)
    }

    pub fn decref(&mut self, e: Edge) -> BddResult<()> {
        self.store.decref(e)
    }

    pub fn collect_garbage(&mut self) -> usize {
        let before = self.store.num_live();
        let swept = self.store.collect_garbage();
        self.cache.clear();
        self.stats.gc_count += 1;
        debug!(
            "collect_garbage: swept {swept} nodes ({before} -> {} live)",
            self.store.num_live()
        );
        swept
    }

    // --- reordering ----------------------------------------------------------

    pub fn swap_adjacent(&mut self, level: Level) -> BddResult<()> {
        reorder::swap(&mut self.store, level)?;
        self.cache.clear();
        self.level_var.swap(level as usize, level as usize + 1);
        let (v0, v1) = (self.level_var[level as usize], self.level_var[level as usize + 1]);
        self.var_level[v0.index()] = level;
        self.var_level[v1.index()] = level + 1;
        Ok(())
    }

    /// Rudell-style sifting over every declared variable. Returns the
    /// total number of adjacent swaps performed.
    pub fn sift(&mut self) -> BddResult<usize> {
        let num_levels = self.names.len() as Level;
        if num_levels < 2 {
            return Ok(0);
        }
        let before = self.store.num_live();
        let mut total_swaps = 0;
        // Sift each currently-declared variable, identified by the level
        // it sits at *right now*: after each variable's sift the mapping
        // below keeps `var_level`/`level_var` in sync so the next
        // iteration sees a consistent picture.
        for start in 0..num_levels {
            let mut journal = reorder::Journal::new();
            reorder::sift_variable(&mut self.store, start, num_levels, &mut journal)?;
            total_swaps += self.replay_journal_bookkeeping(start, &journal)?;
        }
        self.cache.clear();
        self.stats.reorder_count += 1;
        self.last_sift_size = self.store.num_live();
        debug!(
            "sift: {before} -> {} live nodes ({total_swaps} swaps)",
            self.store.num_live()
        );
        Ok(total_swaps)
    }

    /// `sift_variable` in `reorder.rs` only touches the `NodeStore`'s
    /// level assignment; replay its journal here to keep the manager's
    /// `var_level`/`level_var` maps consistent with the levels it left
    /// behind. Does not redo the swaps (already performed); just updates
    /// bookkeeping in the same order.
    fn replay_journal_bookkeeping(&mut self, _start: Level, journal: &reorder::Journal) -> BddResult<usize> {
        for &level in journal.swaps_ref() {
            self.level_var.swap(level as usize, level as usize + 1);
            let (v0, v1) = (self.level_var[level as usize], self.level_var[level as usize + 1]);
            self.var_level[v0.index()] = level;
            self.var_level[v1.index()] = level + 1;
        }
        Ok(journal.swaps_ref().len())
    }

    /// Reorder so that every variable ends up at the level given by
    /// `target`. Fails with [`BddError::InvalidOrder`] if `target` omits a
    /// variable or assigns duplicate levels; on failure the manager state
    /// is rolled back to what it was before the call, per the Error
    /// Handling Design recoverability requirement.
    pub fn reorder_to(&mut self, target: &[(VarId, Level)]) -> BddResult<()> {
        let n = self.names.len();
        if target.len() != n {
            return Err(BddError::InvalidOrder(format!(
                "target order names {} variables, manager has {n}",
                target.len()
            )));
        }
        let mut seen_levels = vec![false; n];
        let mut wanted = vec![None; n];
        for &(v, level) in target {
            if v.index() >= n || level as usize >= n {
                return Err(BddError::InvalidOrder("variable or level out of range".to_string()));
            }
            if seen_levels[level as usize] {
                return Err(BddError::InvalidOrder(format!("duplicate target level {level}")));
            }
            seen_levels[level as usize] = true;
            wanted[v.index()] = Some(level);
        }
        if wanted.iter().any(|w| w.is_none()) {
            return Err(BddError::InvalidOrder("target order omits a declared variable".to_string()));
        }

        let saved_var_level = self.var_level.clone();
        let saved_level_var = self.level_var.clone();
        let mut journal = reorder::Journal::new();
        match self.reorder_to_unchecked(&wanted, &mut journal) {
            Ok(()) => {
                self.cache.clear();
                self.stats.reorder_count += 1;
                Ok(())
            }
            Err(e) => {
                // Reverse every swap already applied to the store before
                // restoring the manager's own level bookkeeping, so the
                // two stay consistent even if `reorder_to_unchecked` failed
                // partway through.
                journal
                    .rollback(&mut self.store)
                    .expect("undoing a journaled swap cannot itself produce a new error");
                self.var_level = saved_var_level;
                self.level_var = saved_level_var;
                Err(e)
            }
        }
    }

    fn reorder_to_unchecked(&mut self, wanted: &[Option<Level>], journal: &mut reorder::Journal) -> BddResult<()> {
        let n = wanted.len() as Level;
        // Insertion-style realization: repeatedly pick the variable whose
        // current level is farthest from home among those not yet fixed,
        // and walk it there by adjacent swaps, per the distilled spec's
        // "any deterministic scheme (e.g. insertion-style) suffices".
        for target_level in 0..n {
            let want_var = self
                .level_var
                .iter()
                .position(|&v| wanted[v.index()] == Some(target_level))
                .expect("validated above: every level is claimed exactly once") as Level;
            let mut current = want_var;
            while current > target_level {
                reorder::swap(&mut self.store, current - 1)?;
                journal.record(current - 1);
                self.level_var.swap(current as usize - 1, current as usize);
                current -= 1;
            }
        }
        for (level, &id) in self.level_var.clone().iter().enumerate() {
            self.var_level[id.index()] = level as Level;
        }
        Ok(())
    }

    /// Permute the variable order so every given pair occupies adjacent
    /// levels, with no constraint on which pair sits where. Pairs are
    /// packed left to right in the order given.
    pub fn reorder_pairs(&mut self, pairs: &[(VarId, VarId)]) -> BddResult<()> {
        let mut target_level = 0u32;
        let mut wanted: Vec<Option<Level>> = vec![None; self.names.len()];
        for &(a, b) in pairs {
            if a.index() >= wanted.len() || b.index() >= wanted.len() {
                return Err(BddError::InvalidOrder("pair references an unknown variable".to_string()));
            }
            wanted[a.index()] = Some(target_level);
            wanted[b.index()] = Some(target_level + 1);
            target_level += 2;
        }
        for w in wanted.iter_mut() {
            if w.is_none() {
                w.replace(target_level);
                target_level += 1;
            }
        }
        let target: Vec<(VarId, Level)> = wanted
            .into_iter()
            .enumerate()
            .map(|(i, l)| (VarId(i as u32), l.unwrap()))
            .collect();
        self.reorder_to(&target)
    }

    fn maybe_auto_reorder(&mut self) -> BddResult<()> {
        if !self.config.reordering {
            return Ok(());
        }
        let live = self.store.num_live();
        if (live as f64) > (self.last_sift_size.max(64) as f64) * self.config.max_growth {
            trace!("auto-reorder trigger: {live} live nodes exceeds growth threshold");
            self.sift()?;
        }
        Ok(())
    }

    // --- misc ----------------------------------------------------------------

    pub fn configure(&mut self, config: ManagerConfig) {
        self.cache.set_max_entries(config.max_cache_size);
        self.config = config;
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn reachable(&self, roots: &[Edge]) -> Vec<(crate::edge::NodeId, crate::node::Node)> {
        self.store.reachable(roots)
    }

    pub fn statistics(&self) -> Statistics {
        let mut s = self.stats.clone();
        s.live_nodes = self.store.num_live();
        s.peak_nodes = self.store.peak();
        s.unique_table_entries = self.store.unique_table_len();
        s.cache_entries = self.cache.len();
        s.cache_hits = self.cache.hits();
        s.cache_misses = self.cache.misses();
        s.op_calls = self.cache.calls();
        s.num_variables = self.names.len();
        s
    }
}

impl Default for BddManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_rejects_duplicate_names() {
        let mut m = BddManager::new();
        m.declare("x").unwrap();
        let err = m.declare("x").unwrap_err();
        assert_eq!(err, BddError::AlreadyDeclared("x".to_string()));
    }

    #[test]
    fn lookup_rejects_unknown_names() {
        let m = BddManager::new();
        let err = m.lookup("nope").unwrap_err();
        assert_eq!(err, BddError::UnknownVariable("nope".to_string()));
    }

    #[test]
    fn scenario_a_basic_apply() {
        let mut m = BddManager::new();
        let x = m.declare("x").unwrap();
        let y = m.declare("y").unwrap();
        let z = m.declare("z").unwrap();
        let (vx, vy, vz) = (m.var(x).unwrap(), m.var(y).unwrap(), m.var(z).unwrap());

        let u = m.apply(BinOp::And, vx, vy).unwrap();
        let not_y = m.not(vy);
        let v = m.apply(BinOp::Or, vz, not_y).unwrap();
        let not_v = m.not(v);
        let w = m.apply(BinOp::And, u, not_v).unwrap();

        let support: std::collections::BTreeSet<VarId> = m.support(w).unwrap();
        assert_eq!(support, [x, y, z].into_iter().collect());
        assert_eq!(m.sat_count(w, 3).unwrap(), 1);
    }

    #[test]
    fn scenario_b_quantification() {
        let mut m = BddManager::new();
        let x = m.declare("x").unwrap();
        let y = m.declare("y").unwrap();
        let vx = m.var(x).unwrap();
        let vy = m.var(y).unwrap();
        let u = m.apply(BinOp::And, vx, vy).unwrap();

        let exist_x = m.quantify(u, &[x], false).unwrap();
        assert_eq!(exist_x, vy);

        let forall_x = m.quantify(u, &[x], true).unwrap();
        assert_eq!(forall_x, m.zero());
    }

    #[test]
    fn scenario_c_rename() {
        let mut m = BddManager::new();
        let x = m.declare("x").unwrap();
        let y = m.declare("y").unwrap();
        let p = m.declare("p").unwrap();
        let q = m.declare("q").unwrap();
        let vx = m.var(x).unwrap();
        let vy = m.var(y).unwrap();

        let u = m.apply(BinOp::Xor, vx, vy).unwrap();
        let renamed = m.rename(u, &[(x, p), (y, q)]).unwrap();

        let support = m.support(renamed).unwrap();
        assert_eq!(support, [p, q].into_iter().collect());
    }

    #[test]
    fn reorder_to_rejects_duplicate_levels() {
        let mut m = BddManager::new();
        let x = m.declare("x").unwrap();
        let y = m.declare("y").unwrap();
        let err = m.reorder_to(&[(x, 0), (y, 0)]).unwrap_err();
        assert!(matches!(err, BddError::InvalidOrder(_)));
        // Rolled back: order is unaffected by the failed call.
        assert_eq!(m.level_of(x), 0);
        assert_eq!(m.level_of(y), 1);
    }
}
