//! The `(level, low, high)` triple that makes up a BDD node.

use crate::edge::{Edge, Level, TERMINAL_LEVEL};

/// A decision node. The single terminal node is represented internally as
/// a `Node` with `level == TERMINAL_LEVEL` and both children pointing at
/// itself — callers never observe its children, since [`Node::is_terminal`]
/// gates every traversal.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub level: Level,
    pub low: Edge,
    pub high: Edge,
}

impl Node {
    pub(crate) fn terminal() -> Self {
        Node {
            level: TERMINAL_LEVEL,
            low: Edge::one(),
            high: Edge::one(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.level == TERMINAL_LEVEL
    }
}

/// Bookkeeping the node store keeps alongside each [`Node`].
#[derive(Debug)]
pub(crate) struct NodeSlot {
    pub node: Node,
    /// External handles plus in-degree from other live nodes. The terminal
    /// is exempt from ever reaching a sweep-triggering zero (it is marked
    /// unconditionally during `collect_garbage`).
    pub refcount: u32,
    /// `true` once the slot is a sweep target / has been freed and may be
    /// reused by a later `find_or_add`.
    pub free: bool,
}
