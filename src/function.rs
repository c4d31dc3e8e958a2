//! The handle layer: a value-type wrapper around an [`Edge`] that
//! automates reference counting and exposes operator overloading.
//!
//! `BddManagerRef` wraps the manager in `Rc<RefCell<_>>` and offers the
//! `with_manager_shared`/`with_manager_exclusive` closure-passing style
//! the teacher's `ManagerRef` trait uses (see `oxidd-core`'s
//! `ManagerRef` and the dummy manager reference among the retrieved
//! reference material) rather than exposing `borrow`/`borrow_mut`
//! directly, so callers cannot hold a `RefCell` borrow across a
//! reentrant call by accident.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cache::BinOp;
use crate::edge::{Edge, Level};
use crate::error::BddResult;
use crate::manager::{BddManager, ManagerConfig, VarId};
use crate::stats::Statistics;

/// A reference-counted, shared handle to a [`BddManager`]. Cloning is
/// cheap (bumps the `Rc`); the manager itself is not `Clone`.
#[derive(Clone)]
pub struct BddManagerRef(Rc<RefCell<BddManager>>);

impl BddManagerRef {
    pub fn new() -> Self {
        BddManagerRef(Rc::new(RefCell::new(BddManager::new())))
    }

    pub fn with_config(config: ManagerConfig) -> Self {
        BddManagerRef(Rc::new(RefCell::new(BddManager::with_config(config))))
    }

    pub fn with_manager_shared<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&BddManager) -> T,
    {
        f(&self.0.borrow())
    }

    pub fn with_manager_exclusive<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut BddManager) -> T,
    {
        f(&mut self.0.borrow_mut())
    }

    /// Declare a variable and immediately wrap it as a handle to its
    /// literal BDD — the common case callers want.
    pub fn declare(&self, name: &str) -> BddResult<Bdd> {
        let edge = self.with_manager_exclusive(|m| -> BddResult<Edge> {
            let id = m.declare(name)?;
            m.var(id)
        })?;
        Ok(Bdd::new(self.clone(), edge))
    }

    pub fn var(&self, name: &str) -> BddResult<Bdd> {
        let edge = self.with_manager_exclusive(|m| -> BddResult<Edge> {
            let id = m.lookup(name)?;
            m.var(id)
        })?;
        Ok(Bdd::new(self.clone(), edge))
    }

    pub fn one(&self) -> Bdd {
        let e = self.with_manager_shared(|m| m.one());
        Bdd::new(self.clone(), e)
    }

    pub fn zero(&self) -> Bdd {
        let e = self.with_manager_shared(|m| m.zero());
        Bdd::new(self.clone(), e)
    }

    pub fn cube(&self, assignment: &[(&str, bool)]) -> BddResult<Bdd> {
        let edge = self.with_manager_exclusive(|m| -> BddResult<Edge> {
            let mut resolved = Vec::with_capacity(assignment.len());
            for &(name, b) in assignment {
                resolved.push((m.lookup(name)?, b));
            }
            m.cube(&resolved)
        })?;
        Ok(Bdd::new(self.clone(), edge))
    }

    pub fn collect_garbage(&self) -> usize {
        self.with_manager_exclusive(|m| m.collect_garbage())
    }

    pub fn sift(&self) -> BddResult<usize> {
        self.with_manager_exclusive(|m| m.sift())
    }

    pub fn statistics(&self) -> Statistics {
        self.with_manager_shared(|m| m.statistics())
    }

    pub fn configure(&self, config: ManagerConfig) {
        self.with_manager_exclusive(|m| m.configure(config));
    }
}

impl Default for BddManagerRef {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for BddManagerRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for BddManagerRef {}

/// A value-type handle to a single BDD: an [`Edge`] plus the manager it
/// lives in. `Clone` increments the referenced node's count; `Drop`
/// decrements it, so a live `Bdd` always holds exactly one reference —
/// the distilled spec's handle-layer contract (§4.6).
pub struct Bdd {
    manager: BddManagerRef,
    edge: Edge,
}

impl Bdd {
    fn new(manager: BddManagerRef, edge: Edge) -> Self {
        manager
            .with_manager_exclusive(|m| m.incref(edge))
            .expect("freshly constructed edge must refer to a live node");
        Bdd { manager, edge }
    }

    pub fn manager(&self) -> &BddManagerRef {
        &self.manager
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    fn sibling(&self, edge: Edge) -> Bdd {
        Bdd::new(self.manager.clone(), edge)
    }

    pub fn is_terminal(&self) -> bool {
        self.edge.is_terminal()
    }

    pub fn is_true(&self) -> bool {
        self.edge.is_true()
    }

    pub fn is_false(&self) -> bool {
        self.edge.is_false()
    }

    pub fn level(&self) -> BddResult<Level> {
        self.manager.with_manager_shared(|m| m.level(self.edge))
    }

    pub fn ite(&self, then_: &Bdd, else_: &Bdd) -> BddResult<Bdd> {
        assert!(self.manager == then_.manager && self.manager == else_.manager, "cross-manager BDD operation");
        let edge = self
            .manager
            .with_manager_exclusive(|m| m.ite(self.edge, then_.edge, else_.edge))?;
        Ok(self.sibling(edge))
    }

    pub fn and(&self, other: &Bdd) -> BddResult<Bdd> {
        self.binop(BinOp::And, other)
    }
    pub fn or(&self, other: &Bdd) -> BddResult<Bdd> {
        self.binop(BinOp::Or, other)
    }
    pub fn xor(&self, other: &Bdd) -> BddResult<Bdd> {
        self.binop(BinOp::Xor, other)
    }
    pub fn imp(&self, other: &Bdd) -> BddResult<Bdd> {
        self.binop(BinOp::Implies, other)
    }
    pub fn iff(&self, other: &Bdd) -> BddResult<Bdd> {
        self.binop(BinOp::Equiv, other)
    }
    pub fn diff(&self, other: &Bdd) -> BddResult<Bdd> {
        self.binop(BinOp::Diff, other)
    }

    fn binop(&self, op: BinOp, other: &Bdd) -> BddResult<Bdd> {
        assert!(self.manager == other.manager, "cross-manager BDD operation");
        let edge = self.manager.with_manager_exclusive(|m| m.apply(op, self.edge, other.edge))?;
        Ok(self.sibling(edge))
    }

    pub fn exist(&self, vars: &[VarId]) -> BddResult<Bdd> {
        let edge = self.manager.with_manager_exclusive(|m| m.quantify(self.edge, vars, false))?;
        Ok(self.sibling(edge))
    }

    pub fn forall(&self, vars: &[VarId]) -> BddResult<Bdd> {
        let edge = self.manager.with_manager_exclusive(|m| m.quantify(self.edge, vars, true))?;
        Ok(self.sibling(edge))
    }

    /// `∃vars. (self ∧ other)` (or, with `universal` set, its dual
    /// `∀vars. (self ∨ other)`) — a fused traversal, the image/pre-image
    /// primitive for relational product.
    pub fn relational_product(&self, other: &Bdd, vars: &[VarId], universal: bool) -> BddResult<Bdd> {
        assert!(self.manager == other.manager, "cross-manager BDD operation");
        let edge = self
            .manager
            .with_manager_exclusive(|m| m.relational_product(self.edge, other.edge, vars, universal))?;
        Ok(self.sibling(edge))
    }

    pub fn cofactor(&self, v: VarId, value: bool) -> BddResult<Bdd> {
        let edge = self.manager.with_manager_exclusive(|m| m.cofactor(self.edge, v, value))?;
        Ok(self.sibling(edge))
    }

    pub fn compose(&self, v: VarId, r: &Bdd) -> BddResult<Bdd> {
        assert!(self.manager == r.manager, "cross-manager BDD operation");
        let edge = self.manager.with_manager_exclusive(|m| m.compose(self.edge, v, r.edge))?;
        Ok(self.sibling(edge))
    }

    pub fn rename(&self, pairs: &[(VarId, VarId)]) -> BddResult<Bdd> {
        let edge = self.manager.with_manager_exclusive(|m| m.rename(self.edge, pairs))?;
        Ok(self.sibling(edge))
    }

    pub fn support(&self) -> BddResult<std::collections::BTreeSet<VarId>> {
        self.manager.with_manager_shared(|m| m.support(self.edge))
    }

    pub fn sat_count(&self, nvars: u32) -> BddResult<u128> {
        self.manager.with_manager_shared(|m| m.sat_count(self.edge, nvars))
    }

    pub fn pick(&self) -> BddResult<Option<std::collections::BTreeMap<VarId, bool>>> {
        self.manager.with_manager_shared(|m| m.pick(self.edge))
    }
}

impl Clone for Bdd {
    fn clone(&self) -> Self {
        self.sibling(self.edge)
    }
}

impl Drop for Bdd {
    fn drop(&mut self) {
        // A manager error here would mean the refcount bookkeeping is
        // already broken (double-drop of the same handle bypassing
        // `Clone`) — there is nothing sound left to do but surface it
        // loudly rather than pretend the drop succeeded.
        let _ = self.manager.with_manager_exclusive(|m| m.decref(self.edge));
    }
}

impl PartialEq for Bdd {
    fn eq(&self, other: &Self) -> bool {
        self.manager == other.manager && self.edge == other.edge
    }
}
impl Eq for Bdd {}

impl std::hash::Hash for Bdd {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.edge.hash(state);
    }
}

impl Clone for BddManagerRef {
    fn clone(&self) -> Self {
        BddManagerRef(Rc::clone(&self.0))
    }
}

impl std::ops::Not for &Bdd {
    type Output = Bdd;
    fn not(self) -> Bdd {
        self.sibling(crate::ops::not(self.edge))
    }
}

impl std::ops::BitAnd for &Bdd {
    type Output = Bdd;
    fn bitand(self, rhs: Self) -> Bdd {
        self.and(rhs).expect("and on handles from the same manager cannot fail")
    }
}

impl std::ops::BitOr for &Bdd {
    type Output = Bdd;
    fn bitor(self, rhs: Self) -> Bdd {
        self.or(rhs).expect("or on handles from the same manager cannot fail")
    }
}

impl std::ops::BitXor for &Bdd {
    type Output = Bdd;
    fn bitxor(self, rhs: Self) -> Bdd {
        self.xor(rhs).expect("xor on handles from the same manager cannot fail")
    }
}

impl std::fmt::Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Bdd({:?})", self.edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_refcounting_round_trips() {
        let mgr = BddManagerRef::new();
        let x = mgr.declare("x").unwrap();
        let y = mgr.var("x").unwrap();
        assert_eq!(x, y);

        let rc_before = mgr.with_manager_shared(|m| m.statistics().live_nodes);
        {
            let _and = x.and(&y).unwrap();
        }
        mgr.collect_garbage();
        let rc_after = mgr.with_manager_shared(|m| m.statistics().live_nodes);
        assert_eq!(rc_before, rc_after, "dropped intermediate should be collected");
    }

    #[test]
    fn operator_overloads_match_method_calls() {
        let mgr = BddManagerRef::new();
        let x = mgr.declare("x").unwrap();
        let y = mgr.declare("y").unwrap();

        assert_eq!(&x & &y, x.and(&y).unwrap());
        assert_eq!(&x | &y, x.or(&y).unwrap());
        assert_eq!(&x ^ &y, x.xor(&y).unwrap());
        assert_eq!(!&x, x.imp(&mgr.zero()).unwrap());
    }

    #[test]
    fn negation_identity() {
        let mgr = BddManagerRef::new();
        let x = mgr.declare("x").unwrap();
        let not_x = !&x;
        let not_not_x = !&not_x;
        assert_eq!(x, not_not_x);
        assert!((&x & &not_x).is_false());
        assert!((&x | &not_x).is_true());
    }
}
