//! End-to-end scenario tests, mirroring the worked examples in the
//! engine's documentation.

use robdd::cache::BinOp;
use robdd::manager::BddManager;

#[test]
fn scenario_d_reachability_fixpoint() {
    let mut m = BddManager::new();
    let x0 = m.declare("x0").unwrap();
    let x1 = m.declare("x1").unwrap();
    let x0p = m.declare("x0p").unwrap();
    let x1p = m.declare("x1p").unwrap();

    let (vx0, vx1, vx0p, vx1p) = (m.var(x0).unwrap(), m.var(x1).unwrap(), m.var(x0p).unwrap(), m.var(x1p).unwrap());
    let not = |m: &BddManager, e| m.not(e);

    // floor 0 = (x1=0,x0=0) -> floor 1 = (x1=0,x0=1)
    let s01 = {
        let cur = m.apply(BinOp::And, not(&m, vx1), not(&m, vx0)).unwrap();
        let next = m.apply(BinOp::And, not(&m, vx1p), vx0p).unwrap();
        m.apply(BinOp::And, cur, next).unwrap()
    };
    // floor 1 -> floor 2 = (x1=1,x0=0)
    let s12 = {
        let cur = m.apply(BinOp::And, not(&m, vx1), vx0).unwrap();
        let next = m.apply(BinOp::And, vx1p, not(&m, vx0p)).unwrap();
        m.apply(BinOp::And, cur, next).unwrap()
    };
    // floor 2 -> floor 0
    let s20 = {
        let cur = m.apply(BinOp::And, vx1, not(&m, vx0)).unwrap();
        let next = m.apply(BinOp::And, not(&m, vx1p), not(&m, vx0p)).unwrap();
        m.apply(BinOp::And, cur, next).unwrap()
    };
    let t01 = m.apply(BinOp::Or, s01, s12).unwrap();
    let transition = m.apply(BinOp::Or, t01, s20).unwrap();

    let target = m.apply(BinOp::And, not(&m, vx0), vx1).unwrap();

    let mut q = m.zero();
    loop {
        let q_primed = m.rename(q, &[(x0, x0p), (x1, x1p)]).unwrap();
        let pred = m.relational_product(transition, q_primed, &[x0p, x1p], false).unwrap();
        let with_target = m.apply(BinOp::Or, q, target).unwrap();
        let q_next = m.apply(BinOp::Or, with_target, pred).unwrap();
        if q_next == q {
            break;
        }
        q = q_next;
    }

    let x0_and_x1 = m.apply(BinOp::And, vx0, vx1).unwrap();
    let expected = m.not(x0_and_x1);
    assert_eq!(q, expected, "fixpoint must equal the three reachable floors");
}

#[test]
fn scenario_e_sifting_reduces_nodes_and_preserves_function() {
    let mut m = BddManager::new();
    // Interleaving x0,x1,x2,y0,y1,y2 forces every conjunct to span the
    // whole diagram; grouping each x_i beside its y_i collapses it.
    let xs: Vec<_> = (0..3).map(|i| m.declare(&format!("x{i}")).unwrap()).collect();
    let ys: Vec<_> = (0..3).map(|i| m.declare(&format!("y{i}")).unwrap()).collect();

    let mut f = m.zero();
    for i in 0..3 {
        let vx = m.var(xs[i]).unwrap();
        let vy = m.var(ys[i]).unwrap();
        let conj = m.apply(BinOp::And, vx, vy).unwrap();
        f = m.apply(BinOp::Or, f, conj).unwrap();
    }

    let before_nodes = m.statistics().live_nodes;

    // Verify the function on all 64 assignments before reordering.
    let eval = |m: &BddManager, e: robdd::Edge, bits: u32| -> bool {
        let mut cur = e;
        for v in 0u32..6u32 {
            let bit = (bits >> v) & 1 == 1;
            if cur.is_terminal() {
                break;
            }
            if m.level(cur).unwrap() == v {
                cur = if bit { m.high(cur).unwrap() } else { m.low(cur).unwrap() };
            }
        }
        cur.is_true()
    };
    let before_values: Vec<bool> = (0..64u32).map(|bits| eval(&m, f, bits)).collect();

    m.sift().unwrap();
    let after_nodes = m.statistics().live_nodes;
    assert!(after_nodes < before_nodes, "sifting should strictly reduce node count for this interleaving");

    let after_values: Vec<bool> = (0..64u32).map(|bits| eval(&m, f, bits)).collect();
    assert_eq!(before_values, after_values, "sifting must not change the represented function");
}

#[test]
fn scenario_f_gc_correctness() {
    let mut m = BddManager::new();
    let x = m.declare("x").unwrap();
    let y = m.declare("y").unwrap();
    let z = m.declare("z").unwrap();
    let (vx, vy, vz) = (m.var(x).unwrap(), m.var(y).unwrap(), m.var(z).unwrap());

    let u = m.apply(BinOp::And, vx, vy).unwrap();
    m.incref(u).unwrap();

    // Build and abandon several intermediates without referencing them.
    for _ in 0..20 {
        let _throwaway = m.apply(BinOp::Xor, vy, vz).unwrap();
        let _throwaway2 = m.apply(BinOp::Or, vx, vz).unwrap();
    }

    m.collect_garbage();

    let reachable = m.reachable(&[u]);
    assert_eq!(reachable.len(), m.statistics().live_nodes, "every live node must be reachable from the referenced root");
}
