//! The recursive symbolic operator kernel: negation, binary apply, ITE,
//! compose/substitute, quantify, relational product, cofactor, support,
//! sat-count and sat-enumeration.
//!
//! Every entry point here is a free function taking the node store and
//! apply cache explicitly (rather than a method on a God-object manager),
//! mirroring the teacher crate's `apply_rec_st.rs`, whose recursive
//! operators take a generic `manager: &M` and thread it through every
//! call. Our manager is concrete, so the "generic `M`" collapses to two
//! concrete borrows.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::cache::{ApplyCache, BinOp, CacheKey, QuantOp, VarSetId};
use crate::edge::{Edge, Level};
use crate::error::{BddError, BddResult};
use crate::store::NodeStore;

/// `level(edge)`, with the terminal mapped to [`crate::edge::TERMINAL_LEVEL`].
#[inline]
fn eff_level(store: &NodeStore, e: Edge) -> BddResult<Level> {
    store.level(e)
}

/// Cofactor `edge` with respect to the variable at `level`. A level above
/// the edge's own level leaves it untouched (the edge does not depend on
/// that variable), per the distilled spec's cofactor contract.
fn cof_at(store: &NodeStore, edge: Edge, level: Level) -> BddResult<(Edge, Edge)> {
    if eff_level(store, edge)? == level {
        store.children(edge)
    } else {
        Ok((edge, edge))
    }
}

/// The BDD representing a bare test of the variable at `level`.
pub fn var_edge(store: &mut NodeStore, level: Level) -> BddResult<Edge> {
    store.find_or_add(level, Edge::zero(), Edge::one())
}

/// Negation. O(1): flips the complement bit, never touches the store.
#[inline]
pub fn not(e: Edge) -> Edge {
    e.negate()
}

fn truth_table(op: BinOp) -> [bool; 4] {
    // indexed by (f as usize) << 1 | (g as usize)
    match op {
        BinOp::And => [false, false, false, true],
        BinOp::Or => [false, true, true, true],
        BinOp::Xor => [false, true, true, false],
        BinOp::Implies => [true, true, false, true], // f -> g
        BinOp::Equiv => [true, false, false, true],
        BinOp::Diff => [false, false, true, false], // f and not g
        BinOp::Nand => [true, true, true, false],
        BinOp::Nor => [true, false, false, false],
        BinOp::Xnor => [true, false, false, true],
    }
}

fn eval_table(table: [bool; 4], f: bool, g: bool) -> bool {
    table[((f as usize) << 1) | g as usize]
}

fn is_commutative(op: BinOp) -> bool {
    !matches!(op, BinOp::Implies | BinOp::Diff)
}

/// Canonical ordering used to normalize operand order for commutative
/// operators, so that `apply(op, f, g)` and `apply(op, g, f)` hit the
/// same cache entry.
fn edge_order(a: Edge, b: Edge) -> std::cmp::Ordering {
    (a.node.0, a.complemented).cmp(&(b.node.0, b.complemented))
}

/// Binary apply over the closed operator set, mediated by the apply
/// cache. See the distilled spec §4.2 for the step-by-step contract this
/// implements (terminal cases, short-circuit identities, commutative
/// normalization, cache lookup, Shannon recursion).
pub fn apply_bin(store: &mut NodeStore, cache: &mut ApplyCache, op: BinOp, f: Edge, g: Edge) -> BddResult<Edge> {
    let table = truth_table(op);

    if f.is_terminal() && g.is_terminal() {
        let r = eval_table(table, f.is_true(), g.is_true());
        return Ok(if r { Edge::one() } else { Edge::zero() });
    }

    let (mut f, mut g) = (f, g);
    if is_commutative(op) && edge_order(f, g) == std::cmp::Ordering::Greater {
        std::mem::swap(&mut f, &mut g);
    }

    // Short-circuit identities, derived generically from the truth table
    // rather than spelled out per operator: fixing one operand to a
    // constant restricts the table to one row, which is either constant,
    // the identity, or the negation of the other operand.
    if f.is_terminal() {
        return Ok(shortcut(table, f.is_true(), g));
    }
    if g.is_terminal() {
        // table is indexed (f,g); swap args to reuse the same row lookup.
        let swapped = [table[0], table[2], table[1], table[3]];
        return Ok(shortcut(swapped, g.is_true(), f));
    }

    let key = CacheKey::Binary(op, f, g);
    if let Some(h) = cache.get(&key) {
        return Ok(h);
    }

    let flevel = eff_level(store, f)?;
    let glevel = eff_level(store, g)?;
    let level = flevel.min(glevel);
    let (f_lo, f_hi) = cof_at(store, f, level)?;
    let (g_lo, g_hi) = cof_at(store, g, level)?;

    let lo = apply_bin(store, cache, op, f_lo, g_lo)?;
    let hi = apply_bin(store, cache, op, f_hi, g_hi)?;
    let res = store.find_or_add(level, lo, hi)?;
    cache.insert(key, res);
    Ok(res)
}

/// Resolve the shortcut for a binary op with one constant operand,
/// reading straight off the operator's truth table.
fn shortcut(table: [bool; 4], fixed: bool, other: Edge) -> Edge {
    let row0 = table[((fixed as usize) << 1) | 0];
    let row1 = table[((fixed as usize) << 1) | 1];
    match (row0, row1) {
        (false, false) => Edge::zero(),
        (true, true) => Edge::one(),
        (false, true) => other,
        (true, false) => other.negate(),
    }
}

/// If-then-else: `f ? g : h`.
pub fn ite(store: &mut NodeStore, cache: &mut ApplyCache, f: Edge, g: Edge, h: Edge) -> BddResult<Edge> {
    if g == h {
        return Ok(g);
    }
    if f == g {
        return apply_bin(store, cache, BinOp::Or, f, h);
    }
    if f == h {
        return apply_bin(store, cache, BinOp::And, f, g);
    }
    if f.is_terminal() {
        return Ok(if f.is_true() { g } else { h });
    }
    if g.is_terminal() && h.is_terminal() {
        debug_assert_ne!(g.is_true(), h.is_true());
        return Ok(if g.is_true() { f } else { f.negate() });
    }
    if g.is_terminal() {
        return if g.is_true() {
            apply_bin(store, cache, BinOp::Or, f, h)
        } else {
            apply_bin(store, cache, BinOp::Diff, h, f)
        };
    }
    if h.is_terminal() {
        return if h.is_true() {
            apply_bin(store, cache, BinOp::Implies, f, g)
        } else {
            apply_bin(store, cache, BinOp::And, f, g)
        };
    }

    let key = CacheKey::Ite(f, g, h);
    if let Some(res) = cache.get(&key) {
        return Ok(res);
    }

    let level = eff_level(store, f)?.min(eff_level(store, g)?).min(eff_level(store, h)?);
    let (f_lo, f_hi) = cof_at(store, f, level)?;
    let (g_lo, g_hi) = cof_at(store, g, level)?;
    let (h_lo, h_hi) = cof_at(store, h, level)?;

    let lo = ite(store, cache, f_lo, g_lo, h_lo)?;
    let hi = ite(store, cache, f_hi, g_hi, h_hi)?;
    let res = store.find_or_add(level, lo, hi)?;
    cache.insert(key, res);
    Ok(res)
}

/// `e[v := r]`, substituting `r` for the variable at `v_level`. Recurses
/// by Shannon decomposition; at `v_level` itself it resolves to
/// `ite(r, e_high, e_low)`, per the distilled spec.
pub fn compose(store: &mut NodeStore, cache: &mut ApplyCache, e: Edge, v_level: Level, r: Edge) -> BddResult<Edge> {
    let lvl = eff_level(store, e)?;
    if lvl > v_level {
        return Ok(e);
    }
    if lvl == v_level {
        let (lo, hi) = store.children(e)?;
        return ite(store, cache, r, hi, lo);
    }

    let key = CacheKey::Compose(v_level, e, r);
    if let Some(h) = cache.get(&key) {
        return Ok(h);
    }
    let (lo, hi) = store.children(e)?;
    let new_lo = compose(store, cache, lo, v_level, r)?;
    let new_hi = compose(store, cache, hi, v_level, r)?;
    let res = store.find_or_add(lvl, new_lo, new_hi)?;
    cache.insert(key, res);
    Ok(res)
}

/// `e|_{v = value}`, a restriction — implemented via `compose` with a
/// terminal edge, per the distilled spec ("cofactor / let-with-constants
/// ... implemented via compose with the terminal edge").
pub fn cofactor(store: &mut NodeStore, cache: &mut ApplyCache, e: Edge, v_level: Level, value: bool) -> BddResult<Edge> {
    compose(store, cache, e, v_level, if value { Edge::one() } else { Edge::zero() })
}

/// Build a simultaneous-substitution vector: `subst[level]` is the
/// replacement function for the variable at `level` (or, for a level not
/// named by `pairs`, that variable's own edge — substituting a variable
/// for itself is a no-op, which is what makes one traversal able to
/// perform many substitutions safely). Mirrors the teacher's
/// `substitute_prepare`.
fn prepare_substitution(store: &mut NodeStore, pairs: &[(Level, Edge)]) -> BddResult<Vec<Edge>> {
    let max_level = pairs.iter().map(|(v, _)| *v).max().unwrap_or(0);
    let mut subst: Vec<Option<Edge>> = vec![None; max_level as usize + 1];
    for &(v, r) in pairs {
        subst[v as usize] = Some(r);
    }
    let mut out = Vec::with_capacity(subst.len());
    for (level, slot) in subst.into_iter().enumerate() {
        out.push(match slot {
            Some(r) => r,
            None => var_edge(store, level as Level)?,
        });
    }
    Ok(out)
}

/// Apply a simultaneous substitution vector built by
/// [`prepare_substitution`] to `e` in one traversal. `cache_id` is a
/// fresh identifier per top-level call: the vector itself is not
/// hashable/comparable cheaply, so (unlike `compose`, which is keyed
/// directly by the replacement edge) we key by this call's identity
/// instead, mirroring the teacher's `substitute(..., cache_id: u32)`.
fn substitute_vec(
    store: &mut NodeStore,
    cache: &mut ApplyCache,
    e: Edge,
    subst: &[Edge],
    cache_id: u64,
) -> BddResult<Edge> {
    let lvl = eff_level(store, e)?;
    if lvl as usize >= subst.len() {
        return Ok(e);
    }

    let key = CacheKey::Substitute(cache_id, e);
    if let Some(h) = cache.get(&key) {
        return Ok(h);
    }

    let (lo, hi) = store.children(e)?;
    let new_lo = substitute_vec(store, cache, lo, subst, cache_id)?;
    let new_hi = substitute_vec(store, cache, hi, subst, cache_id)?;
    let r = subst[lvl as usize];
    let res = ite(store, cache, r, new_hi, new_lo)?;
    cache.insert(key, res);
    Ok(res)
}

/// General variable rename `e[v1/w1, v2/w2, ...]`, implemented as one
/// simultaneous substitution (each `w_i` replaced by its own variable
/// edge). No adjacency requirement; `pairs` need not be injective if the
/// caller is willing to accept the resulting merge of variables.
pub fn rename(
    store: &mut NodeStore,
    cache: &mut ApplyCache,
    e: Edge,
    pairs: &[(Level, Level)],
    cache_id: u64,
) -> BddResult<Edge> {
    let mut resolved = Vec::with_capacity(pairs.len());
    for &(v, w) in pairs {
        resolved.push((v, var_edge(store, w)?));
    }
    let subst = prepare_substitution(store, &resolved)?;
    substitute_vec(store, cache, e, &subst, cache_id)
}

/// Fast rename path for a single pair of **adjacent** variables (`lo`,
/// `lo + 1`), used when the caller knows the pair is adjacent and the
/// substitution injective. Performs the same cofactor-recombination
/// arithmetic as [`crate::reorder::swap`] but confined to `e`'s reachable
/// subgraph and without touching the manager's variable/level map — so,
/// unlike `swap`, it genuinely changes the function `e` represents rather
/// than preserving it.
pub fn rename_adjacent_pair(store: &mut NodeStore, e: Edge, lo_level: Level) -> BddResult<Edge> {
    let hi_level = lo_level + 1;
    let mut memo = std::collections::HashMap::new();
    rename_adjacent_rec(store, e, lo_level, hi_level, &mut memo)
}

fn rename_adjacent_rec(
    store: &mut NodeStore,
    edge: Edge,
    l: Level,
    l_plus_1: Level,
    memo: &mut std::collections::HashMap<Edge, Edge>,
) -> BddResult<Edge> {
    if let Some(&r) = memo.get(&edge) {
        return Ok(r);
    }
    let lvl = eff_level(store, edge)?;
    let result = if lvl < l {
        let (lo, hi) = store.children(edge)?;
        let new_lo = rename_adjacent_rec(store, lo, l, l_plus_1, memo)?;
        let new_hi = rename_adjacent_rec(store, hi, l, l_plus_1, memo)?;
        store.find_or_add(lvl, new_lo, new_hi)?
    } else {
        let (a, b) = if lvl == l {
            store.children(edge)?
        } else {
            (edge, edge)
        };
        let (a_lo, a_hi) = cof_at(store, a, l_plus_1)?;
        let (b_lo, b_hi) = cof_at(store, b, l_plus_1)?;
        let new_lo = store.find_or_add(l_plus_1, a_lo, b_lo)?;
        let new_hi = store.find_or_add(l_plus_1, a_hi, b_hi)?;
        store.find_or_add(l, new_lo, new_hi)?
    };
    memo.insert(edge, result);
    Ok(result)
}

/// `∃S. e` or `∀S. e`. `vars` must be sorted ascending levels.
pub fn quantify(store: &mut NodeStore, cache: &mut ApplyCache, op: QuantOp, e: Edge, vars: &VarSetId) -> BddResult<Edge> {
    if e.is_terminal() {
        return Ok(e);
    }
    let key = CacheKey::Quantify(op, e, vars.clone());
    if let Some(h) = cache.get(&key) {
        return Ok(h);
    }
    let lvl = eff_level(store, e)?;
    let (lo, hi) = store.children(e)?;
    let lo_r = quantify(store, cache, op, lo, vars)?;
    let hi_r = quantify(store, cache, op, hi, vars)?;
    let res = if vars.binary_search(&lvl).is_ok() {
        match op {
            QuantOp::Exist => apply_bin(store, cache, BinOp::Or, lo_r, hi_r)?,
            QuantOp::Forall => apply_bin(store, cache, BinOp::And, lo_r, hi_r)?,
        }
    } else {
        store.find_or_add(lvl, lo_r, hi_r)?
    };
    cache.insert(key, res);
    Ok(res)
}

/// Fused `∃S. (a ∧ b)` (when `op == Exist`) or its dual `∀S. (a ∨ b)`
/// (when `op == Forall`) — a single traversal that beats composing
/// `apply` with `quantify`, per the distilled spec. `vars` must be sorted.
pub fn relational_product(
    store: &mut NodeStore,
    cache: &mut ApplyCache,
    op: QuantOp,
    a: Edge,
    b: Edge,
    vars: &VarSetId,
) -> BddResult<Edge> {
    match op {
        QuantOp::Exist => {
            if a.is_false() || b.is_false() {
                return Ok(Edge::zero());
            }
            if a.is_true() {
                return quantify(store, cache, op, b, vars);
            }
            if b.is_true() {
                return quantify(store, cache, op, a, vars);
            }
        }
        QuantOp::Forall => {
            if a.is_true() || b.is_true() {
                return Ok(Edge::one());
            }
            if a.is_false() {
                return quantify(store, cache, op, b, vars);
            }
            if b.is_false() {
                return quantify(store, cache, op, a, vars);
            }
        }
    }

    let key = CacheKey::RelProd(op, a, b, vars.clone());
    if let Some(h) = cache.get(&key) {
        return Ok(h);
    }

    let level = eff_level(store, a)?.min(eff_level(store, b)?);
    let (a_lo, a_hi) = cof_at(store, a, level)?;
    let (b_lo, b_hi) = cof_at(store, b, level)?;
    let lo = relational_product(store, cache, op, a_lo, b_lo, vars)?;
    let hi = relational_product(store, cache, op, a_hi, b_hi, vars)?;
    let res = if vars.binary_search(&level).is_ok() {
        match op {
            QuantOp::Exist => apply_bin(store, cache, BinOp::Or, lo, hi)?,
            QuantOp::Forall => apply_bin(store, cache, BinOp::And, lo, hi)?,
        }
    } else {
        store.find_or_add(level, lo, hi)?
    };
    cache.insert(key, res);
    Ok(res)
}

/// The set of variable levels `e` actually depends on.
pub fn support(store: &NodeStore, e: Edge) -> BddResult<BTreeSet<Level>> {
    let mut memo: std::collections::HashMap<crate::edge::NodeId, Rc<BTreeSet<Level>>> = std::collections::HashMap::new();
    support_rec(store, e, &mut memo).map(|rc| (*rc).clone())
}

fn support_rec(
    store: &NodeStore,
    e: Edge,
    memo: &mut std::collections::HashMap<crate::edge::NodeId, Rc<BTreeSet<Level>>>,
) -> BddResult<Rc<BTreeSet<Level>>> {
    if let Some(s) = memo.get(&e.node) {
        return Ok(s.clone());
    }
    let node = store.node(e)?;
    let s = if node.is_terminal() {
        Rc::new(BTreeSet::new())
    } else {
        let lo = support_rec(store, node.low, memo)?;
        let hi = support_rec(store, node.high, memo)?;
        let mut s = (*lo).clone();
        s.extend(hi.iter().copied());
        s.insert(node.level);
        Rc::new(s)
    };
    memo.insert(e.node, s.clone());
    Ok(s)
}

/// Number of satisfying assignments among `nvars` Boolean variables
/// (levels `0..nvars`). Bottom-up with a memo; each non-terminal
/// contributes `2^(child_level - level - 1)` for the gap of variables it
/// skips, per the distilled spec.
pub fn count(store: &NodeStore, e: Edge, nvars: u32) -> BddResult<u128> {
    let mut memo: std::collections::HashMap<Edge, u128> = std::collections::HashMap::new();
    let intrinsic = count_rec(store, e, nvars, &mut memo)?;
    let top_level = if e.is_terminal() { nvars } else { store.level(e)? };
    Ok(intrinsic * pow2(top_level))
}

fn count_rec(store: &NodeStore, e: Edge, nvars: u32, memo: &mut std::collections::HashMap<Edge, u128>) -> BddResult<u128> {
    if let Some(&c) = memo.get(&e) {
        return Ok(c);
    }
    let result = if e.is_terminal() {
        if e.is_true() { 1 } else { 0 }
    } else {
        let lvl = store.level(e)?;
        let (lo, hi) = store.children(e)?;
        let lo_level = if lo.is_terminal() { nvars } else { store.level(lo)? };
        let hi_level = if hi.is_terminal() { nvars } else { store.level(hi)? };
        let lo_c = count_rec(store, lo, nvars, memo)? * pow2(lo_level - lvl - 1);
        let hi_c = count_rec(store, hi, nvars, memo)? * pow2(hi_level - lvl - 1);
        lo_c + hi_c
    };
    memo.insert(e, result);
    Ok(result)
}

fn pow2(exp: u32) -> u128 {
    if exp >= 128 {
        u128::MAX
    } else {
        1u128 << exp
    }
}

/// One arbitrary satisfying assignment, covering just the variables on
/// the chosen path (i.e. a partial assignment over `support(e)`, not
/// necessarily all of it). `None` if `e` is unsatisfiable.
pub fn pick(store: &NodeStore, e: Edge) -> BddResult<Option<BTreeMap<Level, bool>>> {
    if e.is_false() {
        return Ok(None);
    }
    let mut assignment = BTreeMap::new();
    let mut cur = e;
    loop {
        if cur.is_true() {
            break;
        }
        let lvl = store.level(cur)?;
        let (lo, hi) = store.children(cur)?;
        if !hi.is_false() {
            assignment.insert(lvl, true);
            cur = hi;
        } else {
            assignment.insert(lvl, false);
            cur = lo;
        }
    }
    Ok(Some(assignment))
}

/// Enumerate every satisfying assignment over `care` (a superset of
/// `support(e)`; pass `None` to default to exactly `support(e)`).
/// Skipped ("don't care") variables are enumerated exhaustively, per the
/// distilled spec's `pick_iter` contract.
pub fn pick_iter(store: &NodeStore, e: Edge, care: Option<&BTreeSet<Level>>) -> BddResult<Vec<BTreeMap<Level, bool>>> {
    let owned_support;
    let care_set = match care {
        Some(c) => c,
        None => {
            owned_support = support(store, e)?;
            &owned_support
        }
    };
    let order: Vec<Level> = care_set.iter().copied().collect();
    let mut out = Vec::new();
    let mut current = BTreeMap::new();
    enumerate_rec(store, e, &order, 0, &mut current, &mut out)?;
    Ok(out)
}

fn enumerate_rec(
    store: &NodeStore,
    e: Edge,
    order: &[Level],
    idx: usize,
    current: &mut BTreeMap<Level, bool>,
    out: &mut Vec<BTreeMap<Level, bool>>,
) -> BddResult<()> {
    if e.is_false() {
        return Ok(());
    }
    if idx == order.len() {
        out.push(current.clone());
        return Ok(());
    }
    let v = order[idx];
    let e_level = store.level(e)?;
    if e.is_true() || e_level > v {
        for bit in [false, true] {
            current.insert(v, bit);
            enumerate_rec(store, e, order, idx + 1, current, out)?;
        }
        current.remove(&v);
        return Ok(());
    }
    if e_level == v {
        let (lo, hi) = store.children(e)?;
        current.insert(v, false);
        enumerate_rec(store, lo, order, idx + 1, current, out)?;
        current.insert(v, true);
        enumerate_rec(store, hi, order, idx + 1, current, out)?;
        current.remove(&v);
        return Ok(());
    }
    // e_level < v: e depends on a variable outside `care` — treat it as
    // free at this position rather than silently dropping assignments.
    for bit in [false, true] {
        current.insert(v, bit);
        enumerate_rec(store, e, order, idx + 1, current, out)?;
    }
    current.remove(&v);
    Ok(())
}

/// Build a sorted, deduplicated [`VarSetId`] from an iterator of levels.
pub fn make_var_set(levels: impl IntoIterator<Item = Level>) -> VarSetId {
    let mut v: Vec<Level> = levels.into_iter().collect();
    v.sort_unstable();
    v.dedup();
    VarSetId::from(v)
}

/// `cube(assignment)`: the conjunction of literals `v_i = b_i`.
pub fn cube(store: &mut NodeStore, cache: &mut ApplyCache, assignment: &[(Level, bool)]) -> BddResult<Edge> {
    let mut result = Edge::one();
    // Build top-down so the result's levels come out ordered regardless
    // of the caller's iteration order.
    let mut sorted: Vec<(Level, bool)> = assignment.to_vec();
    sorted.sort_by(|a, b| b.0.cmp(&a.0));
    for (level, value) in sorted {
        let lit = var_edge(store, level)?;
        let lit = if value { lit } else { lit.negate() };
        result = apply_bin(store, cache, BinOp::And, lit, result)?;
    }
    Ok(result)
}

pub use crate::cache::BinOp as Op;

impl BinOp {
    pub fn name(self) -> &'static str {
        match self {
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::Implies => "implies",
            BinOp::Equiv => "equiv",
            BinOp::Diff => "diff",
            BinOp::Nand => "nand",
            BinOp::Nor => "nor",
            BinOp::Xnor => "xnor",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::BddManager;

    #[test]
    fn and_or_identities() {
        let mut m = BddManager::new();
        let x = m.declare("x").unwrap();
        let y = m.declare("y").unwrap();
        let vx = m.var(x).unwrap();
        let vy = m.var(y).unwrap();

        let and_xy = m.apply(BinOp::And, vx, vy).unwrap();
        let and_yx = m.apply(BinOp::And, vy, vx).unwrap();
        assert_eq!(and_xy, and_yx, "and should be commutative at the cache level too");

        let and_self = m.apply(BinOp::And, vx, vx).unwrap();
        assert_eq!(and_self, vx);

        let or_true = m.apply(BinOp::Or, vx, m.one()).unwrap();
        assert_eq!(or_true, m.one());
    }

    #[test]
    fn de_morgan() {
        let mut m = BddManager::new();
        let x = m.declare("x").unwrap();
        let y = m.declare("y").unwrap();
        let vx = m.var(x).unwrap();
        let vy = m.var(y).unwrap();

        let and = m.apply(BinOp::And, vx, vy).unwrap();
        let not_and = not(and);
        let or_not = m.apply(BinOp::Or, not(vx), not(vy)).unwrap();
        assert_eq!(not_and, or_not);
    }
}
