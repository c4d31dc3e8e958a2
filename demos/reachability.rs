//! Symbolic reachability fixpoint over a tiny 3-state transition system,
//! the worked example from the engine's documentation (scenario D): a
//! 2-bit counter cycling through floors `0 -> 1 -> 2 -> 0`, leaving the
//! fourth encoding (`11`) permanently unreachable.
//!
//! Run with `RUST_LOG=debug` to see the manager's GC/reorder logging.

use robdd::function::BddManagerRef;
use robdd::VarId;

fn main() {
    env_logger::init();

    let mgr = BddManagerRef::new();
    let x0 = mgr.declare("x0").unwrap();
    let x1 = mgr.declare("x1").unwrap();
    let x0p = mgr.declare("x0p").unwrap();
    let x1p = mgr.declare("x1p").unwrap();

    let v = |name: &str| mgr.var(name).unwrap();
    let (vx0, vx1, vx0p, vx1p) = (v("x0"), v("x1"), v("x0p"), v("x1p"));

    // floor i -> floor (i+1) mod 3, with floor encoded (x1, x0):
    // 0 = (0,0), 1 = (0,1), 2 = (1,0); (1,1) is never used.
    let not = |b: &robdd::Bdd| !b;
    let step_0_to_1 = &(&not(&vx1) & &not(&vx0)) & &(&not(&vx1p) & &vx0p);
    let step_1_to_2 = &(&not(&vx1) & &vx0) & &(&vx1p & &not(&vx0p));
    let step_2_to_0 = &(&vx1 & &not(&vx0)) & &(&not(&vx1p) & &not(&vx0p));
    let transition = &(&step_0_to_1 | &step_1_to_2) | &step_2_to_0;

    // target = floor 2 = ¬x0 ∧ x1
    let target = &not(&vx0) & &vx1;

    let x0_var: VarId = mgr.with_manager_shared(|m| m.lookup("x0").unwrap());
    let x1_var: VarId = mgr.with_manager_shared(|m| m.lookup("x1").unwrap());
    let x0p_var: VarId = mgr.with_manager_shared(|m| m.lookup("x0p").unwrap());
    let x1p_var: VarId = mgr.with_manager_shared(|m| m.lookup("x1p").unwrap());

    let mut q = mgr.zero();
    loop {
        let q_primed = q.rename(&[(x0_var, x0p_var), (x1_var, x1p_var)]).unwrap();
        let pred = transition.relational_product(&q_primed, &[x0p_var, x1p_var], false).unwrap();
        let q_next = &(&q | &target) | &pred;
        if q_next == q {
            break;
        }
        q = q_next;
    }

    let expected = !&(&vx0 & &vx1);
    assert_eq!(q, expected, "fixpoint should equal the 3 reachable floors");

    println!(
        "reachable set fixpoint reached: {} satisfying assignments over 2 state bits",
        q.sat_count(2).unwrap()
    );
    println!("manager statistics: {:?}", mgr.statistics());
}
