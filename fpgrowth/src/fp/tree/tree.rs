/// Activation watermark of a node that has never been projected away.
pub const ALWAYS_ACTIVE: usize = usize::MAX;

/// Index of the root in the node arena.
pub const ROOT: usize = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FPNode {
    /// `None` only for the root.
    pub item: Option<usize>,
    pub count: usize,
    /// Depth watermark: active at depth `d` iff `activation >= d`.
    pub activation: usize,
    /// Dense child table indexed by item id.
    pub children: Vec<Option<usize>>,
    /// Next node carrying the same item, in insertion order.
    pub next_same: Option<usize>,
}

/// A prefix tree over the dense item domain `[0, max_label)`.
///
/// Nodes live in a single arena and are addressed by their insertion index,
/// which doubles as the key of the percolation undo log. `counts[item]` always
/// holds the support of `item` summed over the nodes active at the depth
/// currently being mined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FPTree {
    pub(crate) max_label: usize,
    pub(crate) nodes: Vec<FPNode>,
    pub(crate) counts: Vec<usize>,
    pub(crate) transparent: Vec<bool>,
    pub(crate) head: Vec<Option<usize>>,
    pub(crate) tail: Vec<Option<usize>>,
}

impl FPNode {
    pub fn new_root(max_label: usize) -> Self {
        Self {
            item: None,
            count: 0,
            activation: ALWAYS_ACTIVE,
            children: vec![None; max_label],
            next_same: None,
        }
    }

    pub fn new_item(item: usize, max_label: usize) -> Self {
        Self {
            item: Some(item),
            count: 1,
            activation: ALWAYS_ACTIVE,
            children: vec![None; max_label],
            next_same: None,
        }
    }

    /// Visible to the call mining at `depth`.
    #[inline]
    pub fn is_active_at(&self, depth: usize) -> bool {
        self.activation >= depth
    }

    /// Visible to calls deeper than `depth`.
    #[inline]
    pub fn is_active_below(&self, depth: usize) -> bool {
        self.activation > depth
    }
}

impl FPTree {
    pub fn new(max_label: usize) -> Self {
        Self {
            max_label,
            nodes: vec![FPNode::new_root(max_label)],
            counts: vec![0; max_label],
            transparent: vec![false; max_label],
            head: vec![None; max_label],
            tail: vec![None; max_label],
        }
    }

    /// Builds a tree from transactions already in canonical traversal order.
    pub fn from_transactions<I, T>(max_label: usize, transactions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[usize]>,
    {
        let mut tree = Self::new(max_label);
        for transaction in transactions {
            tree.insert_transaction(transaction.as_ref());
        }
        tree
    }

    /// Inserts one transaction, sharing the longest existing prefix.
    ///
    /// Items must be distinct, inside `[0, max_label)`, and ordered the same
    /// way for every transaction of the tree.
    pub fn insert_transaction(&mut self, transaction: &[usize]) {
        let mut current_index = ROOT;

        for &item in transaction {
            assert!(
                item < self.max_label,
                "item {item} outside of the tree domain [0, {})",
                self.max_label
            );

            if let Some(child_index) = self.nodes[current_index].children[item] {
                self.nodes[child_index].count += 1;
                current_index = child_index;
            } else {
                let new_index = self.nodes.len();
                self.nodes.push(FPNode::new_item(item, self.max_label));
                self.nodes[current_index].children[item] = Some(new_index);

                match self.tail[item] {
                    Some(last) => self.nodes[last].next_same = Some(new_index),
                    None => self.head[item] = Some(new_index),
                }
                self.tail[item] = Some(new_index);
                current_index = new_index;
            }

            self.counts[item] += 1;
        }
    }

    pub fn max_label(&self) -> usize {
        self.max_label
    }

    /// Number of item nodes, the root excluded.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn root(&self) -> &FPNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: usize) -> &FPNode {
        &self.nodes[id]
    }

    pub fn item_count(&self, item: usize) -> usize {
        self.counts[item]
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    pub fn is_transparent(&self, item: usize) -> bool {
        self.transparent[item]
    }

    /// Walks the chain of nodes labelled `item` in insertion order.
    pub fn same_item_nodes(&self, item: usize) -> SameItemNodes<'_> {
        SameItemNodes {
            tree: self,
            next: self.head[item],
        }
    }

    /// The child of `parent` carrying `item`, if any.
    pub fn child(&self, parent: usize, item: usize) -> Option<usize> {
        self.nodes[parent].children[item]
    }
}

pub struct SameItemNodes<'a> {
    tree: &'a FPTree,
    next: Option<usize>,
}

impl Iterator for SameItemNodes<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = self.tree.nodes[current].next_same;
        Some(current)
    }
}
