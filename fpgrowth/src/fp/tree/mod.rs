// Tree module - FP-Tree arena, construction and the in-place projection protocol

mod tree;
mod tree_ops;

pub use tree::{ALWAYS_ACTIVE, FPNode, FPTree, ROOT, SameItemNodes};
pub use tree_ops::{Projection, UndoLog};
