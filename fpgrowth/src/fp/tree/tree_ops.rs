use std::ops::{Deref, DerefMut};

use super::tree::{ALWAYS_ACTIVE, FPTree, ROOT};
use crate::fp::config::MinSupport;

/// Original counts of the nodes rewritten by one percolation pass.
#[derive(Debug, Default, Clone)]
pub struct UndoLog {
    entries: Vec<(usize, usize)>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn record(&mut self, node: usize, original_count: usize) {
        self.entries.push((node, original_count));
    }
}

impl FPTree {
    /// Hides every subtree of `node` that has no `target` node strictly below it.
    ///
    /// This includes the `target` nodes themselves whenever no deeper `target`
    /// follows them, so `target` carries no count in the projected tree and
    /// is transparent to the recursive call. Hidden nodes get
    /// `activation = depth` and their counts leave the global totals. Returns
    /// whether `node` is, or leads to, a `target` node.
    pub fn deactivate(&mut self, node: usize, depth: usize, target: usize) -> bool {
        if !self.nodes[node].is_active_at(depth) {
            return false;
        }

        let mut reaches_target = false;
        for slot in 0..self.max_label {
            if let Some(child) = self.nodes[node].children[slot] {
                reaches_target |= self.deactivate(child, depth, target);
            }
        }

        let current = &mut self.nodes[node];
        if !reaches_target {
            current.activation = depth;
            if let Some(item) = current.item {
                self.counts[item] -= current.count;
            }
        }
        reaches_target || current.item == Some(target)
    }

    /// Undoes the `deactivate` issued at `depth`.
    pub fn reactivate(&mut self, node: usize, depth: usize) {
        if !self.nodes[node].is_active_at(depth) {
            return;
        }

        let current = &mut self.nodes[node];
        if !current.is_active_below(depth) {
            current.activation = ALWAYS_ACTIVE;
            if let Some(item) = current.item {
                self.counts[item] += current.count;
            }
        }

        for slot in 0..self.max_label {
            if let Some(child) = self.nodes[node].children[slot] {
                self.reactivate(child, depth);
            }
        }
    }

    /// Folds `target` out of the projected paths.
    ///
    /// Every surviving ancestor of a `target` node takes the summed count of
    /// the `target` nodes beneath it. Overwritten counts go to `undo` and the
    /// global totals follow the change. Returns the count passed upward.
    pub fn percolate_up(
        &mut self,
        node: usize,
        depth: usize,
        undo: &mut UndoLog,
        target: usize,
    ) -> usize {
        let current = &self.nodes[node];
        if !current.is_active_at(depth) {
            return 0;
        }
        if current.item == Some(target) {
            return current.count;
        }
        if !current.is_active_below(depth) {
            return 0;
        }

        let mut percolated = 0;
        for slot in 0..self.max_label {
            if let Some(child) = self.nodes[node].children[slot] {
                percolated += self.percolate_up(child, depth, undo, target);
            }
        }

        let current = &mut self.nodes[node];
        if let Some(item) = current.item {
            if percolated != current.count {
                undo.record(node, current.count);
                self.counts[item] = self.counts[item] - current.count + percolated;
                current.count = percolated;
            }
        }
        percolated
    }

    /// Restores every count recorded by `percolate_up` and empties the log.
    pub fn reestablish(&mut self, undo: &mut UndoLog) {
        for (node, original_count) in undo.entries.drain(..) {
            let current = &mut self.nodes[node];
            if let Some(item) = current.item {
                self.counts[item] = self.counts[item] - current.count + original_count;
            }
            current.count = original_count;
        }
    }

    pub fn recompute_transparency(&mut self, min_support: &MinSupport) {
        for (flag, &count) in self.transparent.iter_mut().zip(self.counts.iter()) {
            *flag = !min_support.is_frequent(count);
        }
    }

    /// Projects the tree onto the paths through `item` for the call at `depth`.
    ///
    /// The returned guard dereferences to the projected tree and puts the
    /// tree back exactly as it was when dropped.
    pub fn project(
        &mut self,
        item: usize,
        depth: usize,
        min_support: MinSupport,
    ) -> Projection<'_> {
        self.deactivate(ROOT, depth, item);
        let mut undo = UndoLog::new();
        self.percolate_up(ROOT, depth, &mut undo, item);
        self.recompute_transparency(&min_support);

        Projection {
            tree: self,
            depth,
            min_support,
            undo,
        }
    }

    /// Checks that `counts` equals the per-item sum over nodes active at `depth`.
    pub fn counts_match_active_nodes(&self, depth: usize) -> bool {
        let mut sums = vec![0usize; self.max_label];
        for node in &self.nodes {
            if let Some(item) = node.item {
                if node.is_active_at(depth) {
                    sums[item] += node.count;
                }
            }
        }
        sums == self.counts
    }

    pub fn transparency_is_current(&self, min_support: &MinSupport) -> bool {
        self.transparent
            .iter()
            .zip(self.counts.iter())
            .all(|(&flag, &count)| flag == !min_support.is_frequent(count))
    }
}

/// A tree projected by [`FPTree::project`]; restores the tree on drop.
pub struct Projection<'a> {
    tree: &'a mut FPTree,
    depth: usize,
    min_support: MinSupport,
    undo: UndoLog,
}

impl Projection<'_> {
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }
}

impl Deref for Projection<'_> {
    type Target = FPTree;

    fn deref(&self) -> &FPTree {
        &*self.tree
    }
}

impl DerefMut for Projection<'_> {
    fn deref_mut(&mut self) -> &mut FPTree {
        &mut *self.tree
    }
}

impl Drop for Projection<'_> {
    fn drop(&mut self) {
        self.tree.reestablish(&mut self.undo);
        self.tree.reactivate(ROOT, self.depth);
        self.tree.recompute_transparency(&self.min_support);
    }
}
