//! Statement hierarchy trees.
//!
//! Ledger rows carry up to four hierarchy codes (`code0`..`code3`). The
//! builder groups rows by successive code prefixes, sums their movements per
//! comparison side and emits a flat depth-first list of nodes that a UI can
//! show as a collapsible tree.

pub mod builder;
pub mod types;

#[cfg(test)]
mod props;

pub use builder::build_tree;
pub use types::{ACCOUNT_LEVEL, CalculatedRowConfig, NodeType, PathSegment, TreeNode, TreeOptions};
