//! The canonical multi-rooted DAG: node allocation, the unique table, and
//! reference-counted mark-and-sweep collection.

use rustc_hash::FxHashMap;

use crate::edge::{Edge, Level, NodeId, TERMINAL_LEVEL};
use crate::error::{BddError, BddResult};
use crate::node::{Node, NodeSlot};

/// Key into a level's unique table. Levels are partitioned (one hash map
/// per variable, grounded in the teacher's per-level `LevelView` /
/// `rsdd`'s per-variable subtables) so that a sift swap of two adjacent
/// levels only has to rebuild two hash maps, not the whole table.
type UniqueKey = (Edge, Edge);

/// The canonical DAG. Owns every node, guarantees structural uniqueness
/// via [`NodeStore::find_or_add`], and performs reference-counted
/// mark-and-sweep collection.
pub struct NodeStore {
    slots: Vec<NodeSlot>,
    /// `unique[level]` indexes nodes whose `level` field equals `level`.
    unique: Vec<FxHashMap<UniqueKey, NodeId>>,
    free_list: Vec<NodeId>,
    live_count: usize,
    peak_count: usize,
}

impl NodeStore {
    pub fn new() -> Self {
        let mut slots = Vec::new();
        slots.push(NodeSlot {
            node: Node::terminal(),
            refcount: 1,
            free: false,
        });
        NodeStore {
            slots,
            unique: Vec::new(),
            free_list: Vec::new(),
            live_count: 1,
            peak_count: 1,
        }
    }

    /// Grow the unique table to have a subtable for `level` (and every
    /// level below it). Called whenever a new variable is declared.
    pub fn ensure_level(&mut self, level: Level) {
        let needed = level as usize + 1;
        if self.unique.len() < needed {
            self.unique.resize_with(needed, FxHashMap::default);
        }
    }

    pub fn terminal_edge() -> Edge {
        Edge::one()
    }

    pub fn is_live(&self, id: NodeId) -> bool {
        id.index() < self.slots.len() && !self.slots[id.index()].free
    }

    pub fn node(&self, edge: Edge) -> BddResult<Node> {
        if !self.is_live(edge.node) {
            return Err(BddError::InvalidEdge);
        }
        Ok(self.slots[edge.node.index()].node)
    }

    pub fn level(&self, edge: Edge) -> BddResult<Level> {
        Ok(self.node(edge)?.level)
    }

    /// `low`/`high` of `edge`, with the edge's own complement bit and
    /// the normalization bit of the underlying node both taken into
    /// account. Terminal edges have no children and return `InvalidEdge`.
    pub fn children(&self, edge: Edge) -> BddResult<(Edge, Edge)> {
        let node = self.node(edge)?;
        if node.is_terminal() {
            return Err(BddError::InvalidEdge);
        }
        if edge.complemented {
            Ok((node.low.negate(), node.high.negate()))
        } else {
            Ok((node.low, node.high))
        }
    }

    pub fn num_live(&self) -> usize {
        self.live_count
    }

    /// Total number of entries across every level's unique table.
    pub fn unique_table_len(&self) -> usize {
        self.unique.iter().map(|t| t.len()).sum()
    }

    pub fn peak(&self) -> usize {
        self.peak_count
    }

    /// Find the canonical node for `(level, low, high)`, allocating one if
    /// necessary. See the module-level contract in the spec: reduction,
    /// complement normalization (only the low edge of the canonical node
    /// may be complemented), then a unique-table lookup.
    pub fn find_or_add(&mut self, level: Level, low: Edge, high: Edge) -> BddResult<Edge> {
        debug_assert!(level < TERMINAL_LEVEL, "only the terminal may sit at the sentinel level");

        // 1. Reduction: a node whose two children agree computes exactly
        // that child's function.
        if low == high {
            return Ok(low);
        }

        // 2. Complement normalization.
        let (lo, hi, out_complement) = if high.complemented {
            (low.negate(), high.negate(), true)
        } else {
            (low, high, false)
        };

        self.ensure_level(level);
        let key = (lo, hi);
        if let Some(&id) = self.unique[level as usize].get(&key) {
            let edge = Edge::new(id, out_complement);
            return Ok(edge);
        }

        // 3. Miss: allocate, incref the new structural children, insert.
        let id = self.alloc(Node { level, low: lo, high: hi });
        self.incref_id(lo.node);
        self.incref_id(hi.node);
        self.unique[level as usize].insert(key, id);
        Ok(Edge::new(id, out_complement))
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = if let Some(id) = self.free_list.pop() {
            self.slots[id.index()] = NodeSlot { node, refcount: 0, free: false };
            id
        } else {
            let id = NodeId(self.slots.len() as u32);
            self.slots.push(NodeSlot { node, refcount: 0, free: false });
            id
        };
        self.live_count += 1;
        self.peak_count = self.peak_count.max(self.live_count);
        id
    }

    fn incref_id(&mut self, id: NodeId) {
        self.slots[id.index()].refcount += 1;
    }

    /// Decrement the node's own counter without the public underflow
    /// check, used internally while cascading a sweep. Never called on a
    /// count that is provably zero already.
    fn decref_id_unchecked(&mut self, id: NodeId) {
        let slot = &mut self.slots[id.index()];
        debug_assert!(slot.refcount > 0, "internal refcount accounting is inconsistent");
        slot.refcount = slot.refcount.saturating_sub(1);
    }

    /// Increment the node's reference count. Ignores the edge's
    /// complement bit, per the spec: counting happens on the node, not
    /// the edge.
    pub fn incref(&mut self, edge: Edge) -> BddResult<()> {
        if !self.is_live(edge.node) {
            return Err(BddError::InvalidEdge);
        }
        self.incref_id(edge.node);
        Ok(())
    }

    /// Decrement the node's reference count. Errors (rather than
    /// silently clamping) if the count is already zero, to catch caller
    /// bugs such as double-drops.
    pub fn decref(&mut self, edge: Edge) -> BddResult<()> {
        if !self.is_live(edge.node) {
            return Err(BddError::InvalidEdge);
        }
        let slot = &mut self.slots[edge.node.index()];
        if slot.refcount == 0 {
            return Err(BddError::DecrefUnderflow);
        }
        slot.refcount -= 1;
        Ok(())
    }

    pub fn ref_count(&self, edge: Edge) -> BddResult<u32> {
        if !self.is_live(edge.node) {
            return Err(BddError::InvalidEdge);
        }
        Ok(self.slots[edge.node.index()].refcount)
    }

    /// Mark-and-sweep collection, as specified:
    /// 1. Mark the terminal (unconditionally — it is permanently live).
    /// 2. Mark every node with positive reference count, recursively
    ///    marking its successors.
    /// 3. Delete every unmarked node from the store and unique table.
    ///
    /// Returns the number of nodes swept.
    pub fn collect_garbage(&mut self) -> usize {
        let mut marked = vec![false; self.slots.len()];
        marked[NodeId::TERMINAL.index()] = true;

        let mut stack = Vec::new();
        for (idx, slot) in self.slots.iter().enumerate() {
            if !slot.free && slot.refcount > 0 && !marked[idx] {
                stack.push(NodeId(idx as u32));
                marked[idx] = true;
            }
        }
        while let Some(id) = stack.pop() {
            let node = self.slots[id.index()].node;
            if node.is_terminal() {
                continue;
            }
            for child in [node.low.node, node.high.node] {
                if !marked[child.index()] {
                    marked[child.index()] = true;
                    stack.push(child);
                }
            }
        }

        let mut swept = 0;
        for idx in 0..self.slots.len() {
            if self.slots[idx].free || marked[idx] {
                continue;
            }
            let node = self.slots[idx].node;
            let level = node.level;
            self.unique[level as usize].remove(&(node.low, node.high));
            self.decref_id_unchecked(node.low.node);
            self.decref_id_unchecked(node.high.node);
            self.slots[idx].free = true;
            self.free_list.push(NodeId(idx as u32));
            swept += 1;
            self.live_count -= 1;
        }
        swept
    }

    // --- helpers used only by `reorder::swap` ---------------------------

    pub(crate) fn unique_len(&self) -> usize {
        self.unique.len()
    }

    pub(crate) fn level_size(&self, level: Level) -> usize {
        self.unique.get(level as usize).map_or(0, |t| t.len())
    }

    pub(crate) fn level_node_ids(&self, level: Level) -> Vec<NodeId> {
        self.unique
            .get(level as usize)
            .map(|t| t.values().copied().collect())
            .unwrap_or_default()
    }

    pub(crate) fn clear_level(&mut self, level: Level) {
        if let Some(t) = self.unique.get_mut(level as usize) {
            t.clear();
        }
    }

    pub(crate) fn raw_node(&self, id: NodeId) -> Node {
        self.slots[id.index()].node
    }

    /// Overwrite `id`'s content with `(level, low, high)`, applying the
    /// same reduction and complement-normalization rules `find_or_add`
    /// would, but keeping `id`'s identity when possible (so edges held
    /// elsewhere in the DAG that still reference it remain valid).
    ///
    /// If the new content reduces away (`low == high`) or collides with
    /// some other already-live node at this level, `id` is retired and
    /// every current reference to it is rewritten to the surviving edge.
    /// That rewrite preserves each referrer's own complement bit, which
    /// is sound as long as the merge/reduction target itself is not
    /// complemented in a way that would put a complement on some
    /// referrer's `high` field; see the note on `redirect_and_retire`.
    pub(crate) fn place_at_level(&mut self, id: NodeId, level: Level, low: Edge, high: Edge) -> BddResult<()> {
        if low == high {
            self.redirect_and_retire(id, low);
            return Ok(());
        }
        let (lo, hi) = if high.complemented {
            (low.negate(), high.negate())
        } else {
            (low, high)
        };
        self.ensure_level(level);
        if let Some(&existing) = self.unique[level as usize].get(&(lo, hi)) {
            if existing != id {
                let existing_edge = Edge::new(existing, false);
                self.redirect_and_retire(id, existing_edge);
                return Ok(());
            }
        }
        self.slots[id.index()].node = Node { level, low: lo, high: hi };
        self.unique[level as usize].insert((lo, hi), id);
        Ok(())
    }

    /// Rewrite every live referrer of `old` to point at `new_edge`
    /// instead, then free `old`. A full scan over the store — acceptable
    /// because this path is only reached on the rare occasion a sift
    /// swap produces a node that already exists elsewhere; see
    /// DESIGN.md for the scaling trade-off this accepts.
    fn redirect_and_retire(&mut self, old: NodeId, new_edge: Edge) {
        if old == new_edge.node {
            return;
        }
        let old_refcount = self.slots[old.index()].refcount;
        for _ in 0..old_refcount {
            self.incref_id(new_edge.node);
        }
        for slot in self.slots.iter_mut() {
            if slot.free || slot.node.is_terminal() {
                continue;
            }
            if slot.node.low.node == old {
                let c = slot.node.low.complemented ^ new_edge.complemented;
                slot.node.low = Edge::new(new_edge.node, c);
            }
            if slot.node.high.node == old {
                let c = slot.node.high.complemented ^ new_edge.complemented;
                debug_assert!(!c, "reorder merge would have produced a complemented `high` edge");
                slot.node.high = Edge::new(new_edge.node, c);
            }
        }
        let freed = self.slots[old.index()].node;
        if !freed.is_terminal() {
            self.decref_id_unchecked(freed.low.node);
            self.decref_id_unchecked(freed.high.node);
        }
        self.slots[old.index()].free = true;
        self.slots[old.index()].refcount = 0;
        self.free_list.push(old);
        self.live_count -= 1;
    }

    /// Iterate `(NodeId, level, low, high)` for every node reachable from
    /// `roots`, in an order an external exporter could rely on (here: a
    /// postorder DFS, low before high, terminal first). This is the
    /// contract surface the (out-of-scope) exporter/importer consumes.
    pub fn reachable(&self, roots: &[Edge]) -> Vec<(NodeId, Node)> {
        let mut visited = vec![false; self.slots.len()];
        let mut order = Vec::new();
        let mut stack: Vec<(NodeId, bool)> = Vec::new();
        for r in roots {
            if !visited[r.node.index()] {
                stack.push((r.node, false));
            }
        }
        while let Some((id, expanded)) = stack.pop() {
            if visited[id.index()] {
                continue;
            }
            let node = self.slots[id.index()].node;
            if node.is_terminal() {
                visited[id.index()] = true;
                order.push((id, node));
                continue;
            }
            if expanded {
                visited[id.index()] = true;
                order.push((id, node));
            } else {
                stack.push((id, true));
                if !visited[node.high.node.index()] {
                    stack.push((node.high.node, false));
                }
                if !visited[node.low.node.index()] {
                    stack.push((node.low.node, false));
                }
            }
        }
        order
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new()
    }
}
