//! Property-based tests for the invariants listed in the engine's
//! testable-properties section, expressed as `quickcheck` properties
//! rather than hand-rolled random loops (grounded in the `quickcheck`
//! usage pattern common to sibling BDD crates in the retrieval pack).

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;

use robdd::cache::BinOp;
use robdd::edge::Edge;
use robdd::manager::{BddManager, VarId};

const NUM_VARS: usize = 4;
const OPS: [BinOp; 4] = [BinOp::And, BinOp::Or, BinOp::Xor, BinOp::Implies];

/// A short, bounded sequence of `(variable index, operator index)` pairs
/// used to fold up an arbitrary formula over a fixed variable set.
#[derive(Clone, Debug)]
struct Steps(Vec<(u8, u8)>);

impl Arbitrary for Steps {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = 1 + (usize::arbitrary(g) % 8);
        let steps = (0..len).map(|_| (u8::arbitrary(g), u8::arbitrary(g))).collect();
        Steps(steps)
    }
}

fn fresh_manager() -> (BddManager, Vec<VarId>) {
    let mut m = BddManager::new();
    let vars = (0..NUM_VARS).map(|i| m.declare(&format!("v{i}")).unwrap()).collect();
    (m, vars)
}

fn build(m: &mut BddManager, vars: &[VarId], steps: &Steps) -> Edge {
    let mut cur = m.var(vars[0]).unwrap();
    for &(vi, oi) in &steps.0 {
        let operand = m.var(vars[vi as usize % NUM_VARS]).unwrap();
        let op = OPS[oi as usize % OPS.len()];
        cur = m.apply(op, cur, operand).unwrap();
    }
    cur
}

#[quickcheck]
fn idempotence(steps: Steps) -> bool {
    let (mut m, vars) = fresh_manager();
    let e = build(&mut m, &vars, &steps);
    m.apply(BinOp::And, e, e).unwrap() == e && m.apply(BinOp::Or, e, e).unwrap() == e
}

#[quickcheck]
fn negation_identities(steps: Steps) -> bool {
    let (mut m, vars) = fresh_manager();
    let e = build(&mut m, &vars, &steps);
    let not_not = m.not(m.not(e));
    let and_self_negated = m.apply(BinOp::And, e, m.not(e)).unwrap();
    let or_self_negated = m.apply(BinOp::Or, e, m.not(e)).unwrap();
    not_not == e && and_self_negated == m.zero() && or_self_negated == m.one()
}

#[quickcheck]
fn de_morgan(steps_a: Steps, steps_b: Steps) -> bool {
    let (mut m, vars) = fresh_manager();
    let a = build(&mut m, &vars, &steps_a);
    let b = build(&mut m, &vars, &steps_b);
    let not_and = m.not(m.apply(BinOp::And, a, b).unwrap());
    let or_not = m.apply(BinOp::Or, m.not(a), m.not(b)).unwrap();
    not_and == or_not
}

#[quickcheck]
fn swap_preserves_semantics(steps: Steps) -> bool {
    let (mut m, vars) = fresh_manager();
    let e = build(&mut m, &vars, &steps);
    m.incref(e).unwrap();

    let before: Vec<bool> = (0..16u32).map(|bits| evaluate(&m, e, bits)).collect();
    m.swap_adjacent(0).unwrap();
    let after: Vec<bool> = (0..16u32).map(|bits| evaluate(&m, e, bits)).collect();
    before == after
}

fn evaluate(m: &BddManager, e: Edge, bits: u32) -> bool {
    let mut cur = e;
    for v in 0..NUM_VARS as u32 {
        if cur.is_terminal() {
            break;
        }
        if m.level(cur).unwrap() == v {
            let bit = (bits >> v) & 1 == 1;
            cur = if bit { m.high(cur).unwrap() } else { m.low(cur).unwrap() };
        }
    }
    cur.is_true()
}

#[test]
fn canonicity_independent_of_construction_order() {
    let (mut m, vars) = fresh_manager();
    let (a, b, c) = (m.var(vars[0]).unwrap(), m.var(vars[1]).unwrap(), m.var(vars[2]).unwrap());

    let ab = m.apply(BinOp::And, a, b).unwrap();
    let left_assoc = m.apply(BinOp::And, ab, c).unwrap();

    let bc = m.apply(BinOp::And, b, c).unwrap();
    let right_assoc = m.apply(BinOp::And, a, bc).unwrap();

    assert_eq!(left_assoc, right_assoc, "(a∧b)∧c and a∧(b∧c) must be the identical edge");
}

#[test]
fn quantifier_commute_on_disjoint_vars() {
    let (mut m, vars) = fresh_manager();
    let (x, y, z, w) = (vars[0], vars[1], vars[2], vars[3]);
    let (vx, vy, vz, vw) = (m.var(x).unwrap(), m.var(y).unwrap(), m.var(z).unwrap(), m.var(w).unwrap());

    let xy = m.apply(BinOp::And, vx, vy).unwrap();
    let xz = m.apply(BinOp::Or, xy, vz).unwrap();
    let e = m.apply(BinOp::Xor, xz, vw).unwrap();

    let exist_x_then_y = {
        let q1 = m.quantify(e, &[x], false).unwrap();
        m.quantify(q1, &[y], false).unwrap()
    };
    let exist_y_then_x = {
        let q1 = m.quantify(e, &[y], false).unwrap();
        m.quantify(q1, &[x], false).unwrap()
    };
    assert_eq!(exist_x_then_y, exist_y_then_x);

    let forall_x_then_y = {
        let q1 = m.quantify(e, &[x], true).unwrap();
        m.quantify(q1, &[y], true).unwrap()
    };
    let forall_y_then_x = {
        let q1 = m.quantify(e, &[y], true).unwrap();
        m.quantify(q1, &[x], true).unwrap()
    };
    assert_eq!(forall_x_then_y, forall_y_then_x);
}

#[test]
fn compose_composition_law() {
    // (e[v := r1])[v := r2] == e[v := r1[v := r2]], when v not in support(r1).
    let (mut m, vars) = fresh_manager();
    let (x, y, z) = (vars[0], vars[1], vars[2]);
    let (vx, vy, vz) = (m.var(x).unwrap(), m.var(y).unwrap(), m.var(z).unwrap());

    let e = m.apply(BinOp::And, vx, vy).unwrap();
    let r1 = vz; // v (= x) not in support(r1) = {z}
    let r2 = m.apply(BinOp::Or, vy, vz).unwrap();

    let lhs = {
        let step1 = m.compose(e, x, r1).unwrap();
        m.compose(step1, x, r2).unwrap()
    };
    let rhs = {
        let r1_sub = m.compose(r1, x, r2).unwrap();
        m.compose(e, x, r1_sub).unwrap()
    };
    assert_eq!(lhs, rhs);
}

#[test]
fn reference_count_soundness_after_mixed_operations() {
    let (mut m, vars) = fresh_manager();
    let (x, y) = (vars[0], vars[1]);
    let (vx, vy) = (m.var(x).unwrap(), m.var(y).unwrap());

    let u = m.apply(BinOp::And, vx, vy).unwrap();
    m.incref(u).unwrap();
    let v = m.apply(BinOp::Or, vx, vy).unwrap();
    m.incref(v).unwrap();

    // u and v each structurally reference the vx/vy nodes; their counts
    // must be at least that in-degree plus our two external increfs.
    assert!(m.statistics().live_nodes >= 3);

    m.decref(u).unwrap();
    let err = m.decref(u).unwrap_err();
    assert_eq!(err, robdd::BddError::DecrefUnderflow);

    m.decref(v).unwrap();
}

#[test]
fn post_gc_soundness() {
    let (mut m, vars) = fresh_manager();
    let (x, y, z) = (vars[0], vars[1], vars[2]);
    let (vx, vy, vz) = (m.var(x).unwrap(), m.var(y).unwrap(), m.var(z).unwrap());

    let u = m.apply(BinOp::And, vx, vy).unwrap();
    m.incref(u).unwrap();
    let _garbage = m.apply(BinOp::Xor, vy, vz).unwrap();

    m.collect_garbage();
    let reachable = m.reachable(&[u]);
    assert_eq!(reachable.len(), m.statistics().live_nodes);
}

#[test]
fn sifting_never_increases_live_nodes() {
    let mut m = BddManager::new();
    let xs: Vec<_> = (0..3).map(|i| m.declare(&format!("x{i}")).unwrap()).collect();
    let ys: Vec<_> = (0..3).map(|i| m.declare(&format!("y{i}")).unwrap()).collect();
    let mut f = m.zero();
    for i in 0..3 {
        let vx = m.var(xs[i]).unwrap();
        let vy = m.var(ys[i]).unwrap();
        let conj = m.apply(BinOp::And, vx, vy).unwrap();
        f = m.apply(BinOp::Or, f, conj).unwrap();
    }
    m.incref(f).unwrap();
    let before = m.statistics().live_nodes;
    m.sift().unwrap();
    let after = m.statistics().live_nodes;
    assert!(after <= before);
}
