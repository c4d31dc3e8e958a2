//! Dynamic variable reordering: the adjacent-level swap primitive and
//! Rudell-style sifting built on top of it.
//!
//! `swap` is the one primitive allowed to touch the unique table's level
//! assignment directly; everything else (`sift`, `reorder_to`) is
//! expressed purely as a sequence of `swap` calls, journaled so a caller
//! can roll back to the starting order if a target order turns out to be
//! invalid.

use crate::edge::{Edge, Level, NodeId};
use crate::error::{BddError, BddResult};
use crate::node::Node;
use crate::store::NodeStore;

/// Swap the variables at adjacent positions `l` and `l + 1`. Preserves
/// the function represented by every live edge in the store — the
/// variable that used to sit at `l` now sits at `l + 1` and vice versa,
/// but no root's semantics change. Applying `swap` twice at the same
/// level is the identity transformation (it is its own inverse), which
/// is what makes journaled rollback in `reorder_to` cheap.
pub fn swap(store: &mut NodeStore, l: Level) -> BddResult<()> {
    let l2 = l + 1;
    if l2 as usize >= store_unique_len(store) {
        // Nothing below `l` currently uses level `l + 1`; a swap against
        // an empty subtable is a no-op.
        return Ok(());
    }

    let old_l_ids = store.level_node_ids(l);
    let old_l2_ids = store.level_node_ids(l2);

    store.clear_level(l);
    store.clear_level(l2);

    // Rebuild every node that used to branch on the variable at `l`:
    // cofactor each child against `l + 1` and recombine, per the
    // standard adjacent-swap algorithm (Brace/Rudell/Bryant). The node's
    // own identity (`NodeId`) is kept so edges elsewhere in the DAG that
    // still point at it remain valid.
    for f_id in old_l_ids {
        if !store.is_live(f_id) {
            continue;
        }
        let node = store.raw_node(f_id);
        let (f0, f1) = (node.low, node.high);

        let (f00, f01) = store.cofactor_children(f0, l2)?;
        let (f10, f11) = store.cofactor_children(f1, l2)?;

        let new_low = store.find_or_add(l2, f00, f10)?;
        let new_high = store.find_or_add(l2, f01, f11)?;

        store.incref(new_low)?;
        store.incref(new_high)?;
        store.decref(f0)?;
        store.decref(f1)?;

        store.place_at_level(f_id, l, new_low, new_high)?;
    }

    // Any node that used to sit at `l + 1` and survived the rebuild above
    // (i.e. is still referenced by something, typically an ancestor two
    // or more levels up that skips straight past `l`) now represents the
    // variable that has moved to position `l`; relabel it in place.
    for g_id in old_l2_ids {
        if !store.is_live(g_id) {
            continue;
        }
        let node = store.raw_node(g_id);
        store.place_at_level(g_id, l, node.low, node.high)?;
    }

    Ok(())
}

fn store_unique_len(store: &NodeStore) -> usize {
    store.unique_table_level_count()
}

/// A record of swaps performed, in order, so a caller can restore the
/// original variable order by replaying them in reverse.
#[derive(Default)]
pub struct Journal {
    swaps: Vec<Level>,
}

impl Journal {
    pub fn new() -> Self {
        Journal { swaps: Vec::new() }
    }

    pub fn record(&mut self, level: Level) {
        self.swaps.push(level);
    }

    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }

    /// The levels swapped, in the order they were performed.
    pub fn swaps_ref(&self) -> &[Level] {
        &self.swaps
    }

    /// Undo every journaled swap, in reverse order. `swap` is its own
    /// inverse, so replaying the same sequence backwards restores the
    /// original order exactly.
    pub fn rollback(&mut self, store: &mut NodeStore) -> BddResult<()> {
        while let Some(level) = self.swaps.pop() {
            swap(store, level)?;
        }
        Ok(())
    }
}

/// Move the variable currently at `start_level` to whichever adjacent
/// position (searched by sifting up then down through the full range
/// `0..num_levels`) minimizes the store's live node count, per Rudell's
/// algorithm. Returns the level the variable ended up at.
pub fn sift_variable(store: &mut NodeStore, start_level: Level, num_levels: Level, journal: &mut Journal) -> BddResult<Level> {
    let mut best_level = start_level;
    let mut best_size = store.num_live();
    let mut current = start_level;

    // Sift upward (toward level 0).
    while current > 0 {
        swap(store, current - 1)?;
        journal.record(current - 1);
        current -= 1;
        let size = store.num_live();
        if size < best_size {
            best_size = size;
            best_level = current;
        }
    }

    // From the top, sift all the way back down through the bottom, so
    // every position in between is tried exactly once each.
    while current + 1 < num_levels {
        swap(store, current)?;
        journal.record(current);
        current += 1;
        let size = store.num_live();
        if size < best_size {
            best_size = size;
            best_level = current;
        }
    }

    // Settle at whichever level gave the smallest diagram by undoing the
    // excess swaps from the bottom back up to `best_level`.
    while current > best_level {
        swap(store, current - 1)?;
        journal.record(current - 1);
        current -= 1;
    }

    Ok(best_level)
}

/// One sifting sweep over every variable position. Each position is
/// visited left to right; whichever variable currently occupies it is
/// sifted to its locally-best position before moving on, per Rudell's
/// algorithm. Returns the total number of swaps performed.
pub fn sift_all(store: &mut NodeStore, num_levels: Level) -> BddResult<usize> {
    let mut journal = Journal::new();
    for level in 0..num_levels {
        sift_variable(store, level, num_levels, &mut journal)?;
    }
    Ok(journal.swaps.len())
}

/// Reorder so the variable currently at level `from` ends up at level
/// `to`, via a sequence of adjacent swaps. Rolls back and returns
/// [`BddError::InvalidOrder`] if `to` is out of range.
pub fn reorder_variable(store: &mut NodeStore, from: Level, to: Level, num_levels: Level) -> BddResult<()> {
    if to >= num_levels {
        return Err(BddError::InvalidOrder(format!(
            "target level {to} is out of range for {num_levels} variables"
        )));
    }
    let mut journal = Journal::new();
    let mut current = from;
    while current < to {
        swap(store, current)?;
        journal.record(current);
        current += 1;
    }
    while current > to {
        swap(store, current - 1)?;
        journal.record(current - 1);
        current -= 1;
    }
    let _ = journal;
    Ok(())
}

// --- NodeStore extensions used only by the reorder algorithm ---------

impl NodeStore {
    pub(crate) fn unique_table_level_count(&self) -> usize {
        self.unique_len()
    }

    fn cofactor_children(&self, edge: Edge, level: Level) -> BddResult<(Edge, Edge)> {
        if self.level(edge)? == level {
            self.children(edge)
        } else {
            Ok((edge, edge))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::BddManager;

    #[test]
    fn swap_preserves_function() {
        let mut m = BddManager::new();
        let x = m.declare("x").unwrap();
        let y = m.declare("y").unwrap();
        let vx = m.var(x).unwrap();
        let vy = m.var(y).unwrap();
        let f = m.apply(crate::cache::BinOp::And, vx, vy).unwrap();

        let before = m.sat_count(f, 2).unwrap();
        m.swap_adjacent(0).unwrap();
        let after = m.sat_count(f, 2).unwrap();
        assert_eq!(before, after);
    }
}
