/*!
Parent/child links for the in-memory document.

## Invariants

1. **Single parent**: a child is listed under at most one parent.
2. **Bidirectional consistency**: if `parent_of[child] = parent`, then
   `children_of[parent]` contains `child`, and vice versa.
3. **Moves detach first**: inserting an already-parented node unlinks it from
   its old parent before linking it under the new one.
*/

use crate::types::NodeId;
use std::collections::HashMap;

#[derive(Debug)]
pub(super) struct NodeTree {
  parent_of: HashMap<NodeId, NodeId>,
  children_of: HashMap<NodeId, Vec<NodeId>>,
}

impl NodeTree {
  pub(super) fn new() -> Self {
    Self {
      parent_of: HashMap::new(),
      children_of: HashMap::new(),
    }
  }

  pub(super) fn parent(&self, id: NodeId) -> Option<NodeId> {
    self.parent_of.get(&id).copied()
  }

  /// Children of a node (empty slice if none).
  pub(super) fn children(&self, id: NodeId) -> &[NodeId] {
    self.children_of.get(&id).map_or(&[], Vec::as_slice)
  }

  /// Link `child` under `parent` before `reference`, or last if `reference`
  /// is None or not a child of `parent`.
  pub(super) fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
    if child == parent || self.is_ancestor(child, parent) {
      log::error!("insert_before: {child} cannot be inserted under its own descendant {parent}");
      return;
    }
    self.detach(child);

    let siblings = self.children_of.entry(parent).or_default();
    let pos = reference.and_then(|r| siblings.iter().position(|&s| s == r));
    match pos {
      Some(pos) => siblings.insert(pos, child),
      None => {
        if reference.is_some() {
          log::debug!("insert_before: reference is not a child of {parent}, appending");
        }
        siblings.push(child);
      }
    }
    self.parent_of.insert(child, parent);
  }

  /// Unlink a node from its parent. Its own subtree stays intact.
  pub(super) fn detach(&mut self, child: NodeId) {
    if let Some(parent) = self.parent_of.remove(&child) {
      if let Some(siblings) = self.children_of.get_mut(&parent) {
        siblings.retain(|&s| s != child);
      }
    }
  }

  /// Detach and drop every child of `parent`, returning them.
  pub(super) fn clear_children(&mut self, parent: NodeId) -> Vec<NodeId> {
    let removed = self.children_of.remove(&parent).unwrap_or_default();
    for child in &removed {
      self.parent_of.remove(child);
    }
    removed
  }

  /// Strict ancestor check.
  pub(super) fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = self.parent(node);
    while let Some(n) = current {
      if n == ancestor {
        return true;
      }
      current = self.parent(n);
    }
    false
  }
}
