//! Lead-source root resolution
//!
//! Walks the parent chain of a lead-source node to its root ancestor,
//! whose name is the category used for grouping and analytics. The walk
//! keeps a visited set: master data with a corrupted parent link (a
//! self-reference or a longer cycle) must terminate, not hang.

use crate::model::{LeadSourceNode, SourceId};
use rustc_hash::FxHashSet;
use std::collections::HashMap;
use tracing::warn;

/// Category label when a source cannot be resolved
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Index over lead-source nodes for repeated resolution
pub struct SourceIndex<'a> {
    by_id: HashMap<&'a SourceId, &'a LeadSourceNode>,
}

impl<'a> SourceIndex<'a> {
    pub fn new(nodes: impl IntoIterator<Item = &'a LeadSourceNode>) -> Self {
        SourceIndex {
            by_id: nodes.into_iter().map(|n| (&n.id, n)).collect(),
        }
    }

    /// Name of the root ancestor for `source_id`.
    ///
    /// Returns [`UNKNOWN_SOURCE`] when the id is absent or does not
    /// resolve. When a cycle is hit mid-walk the last node reached before
    /// re-entering the cycle is treated as the root.
    pub fn resolve_root(&self, source_id: Option<&SourceId>) -> String {
        let Some(start_id) = source_id else {
            return UNKNOWN_SOURCE.to_string();
        };
        let Some(mut node) = self.by_id.get(start_id).copied() else {
            return UNKNOWN_SOURCE.to_string();
        };

        let mut visited: FxHashSet<&SourceId> = FxHashSet::default();
        visited.insert(&node.id);

        while let Some(parent_id) = &node.parent_id {
            let Some(parent) = self.by_id.get(parent_id).copied() else {
                // Dangling parent link: the current node is the best root
                break;
            };
            if !visited.insert(&parent.id) {
                warn!(source = %start_id, "cycle in lead-source hierarchy, stopping walk");
                break;
            }
            node = parent;
        }

        node.name.clone()
    }
}

/// One-shot resolution over a node slice
pub fn resolve_root_source(source_id: Option<&SourceId>, nodes: &[LeadSourceNode]) -> String {
    SourceIndex::new(nodes).resolve_root(source_id)
}
