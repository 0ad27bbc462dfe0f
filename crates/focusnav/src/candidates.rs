/*!
Candidate sets.

A candidate set is the ordered, deduplicated list of focusable elements of one
scope (a menu level or a page section). It is a snapshot: callers refresh it
whenever the subtree may have changed, and always before making a navigation
decision for the current keystroke.
*/

use crate::platform::Document;
use crate::types::{find_nearest, Direction, NodeId};

/// Ordered candidates of one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CandidateSet {
  items: Vec<NodeId>,
}

impl CandidateSet {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Recompute from the document.
  ///
  /// Keeps descendants of `root` that match `is_candidate`, whose nearest
  /// enclosing scope marker is `root` itself, that are not disabled, and
  /// that are visible.
  pub(crate) fn refresh<D, C, M>(&mut self, doc: &D, root: NodeId, is_candidate: C, is_marker: M)
  where
    D: Document,
    C: Fn(&D, NodeId) -> bool,
    M: Fn(&D, NodeId) -> bool,
  {
    self.items.clear();
    for node in doc.descendants(root) {
      if !is_candidate(doc, node) || doc.is_disabled(node) || !doc.is_visible(node) {
        continue;
      }
      let owner = doc
        .parent(node)
        .and_then(|p| doc.closest(p, |d, n| n == root || is_marker(d, n)));
      if owner == Some(root) {
        self.push(node);
      }
    }
  }

  /// Replace the contents with an explicit list (search result views).
  pub(crate) fn replace(&mut self, items: impl IntoIterator<Item = NodeId>) {
    self.items.clear();
    for item in items {
      self.push(item);
    }
  }

  fn push(&mut self, node: NodeId) {
    if !self.items.contains(&node) {
      self.items.push(node);
    }
  }

  pub(crate) fn items(&self) -> &[NodeId] {
    &self.items
  }

  pub(crate) fn len(&self) -> usize {
    self.items.len()
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub(crate) fn get(&self, index: usize) -> Option<NodeId> {
    self.items.get(index).copied()
  }

  pub(crate) fn first(&self) -> Option<NodeId> {
    self.items.first().copied()
  }

  pub(crate) fn contains(&self, node: NodeId) -> bool {
    self.items.contains(&node)
  }

  pub(crate) fn index_of(&self, node: NodeId) -> Option<usize> {
    self.items.iter().position(|&n| n == node)
  }

  /// Index after `index`, wrapping. None when empty.
  pub(crate) fn next_index(&self, index: usize) -> Option<usize> {
    (!self.is_empty()).then(|| (index + 1) % self.len())
  }

  /// Index before `index`, wrapping. None when empty.
  pub(crate) fn prev_index(&self, index: usize) -> Option<usize> {
    (!self.is_empty()).then(|| (index % self.len() + self.len() - 1) % self.len())
  }

  /// The candidate one step away from `index`.
  ///
  /// With `spatial` set, the nearest candidate in that direction wins;
  /// otherwise (or when nothing lies that way) the linear neighbour, wrapping.
  pub(crate) fn step<D: Document>(
    &self,
    doc: &D,
    index: usize,
    spatial: Option<Direction>,
    forward: bool,
  ) -> Option<NodeId> {
    let current = self.get(index)?;
    if let Some(dir) = spatial {
      let from = doc.bounds(current);
      let nearest = find_nearest(
        current,
        &from,
        self.items.iter().map(|&n| (n, doc.bounds(n))),
        dir,
      );
      if nearest.is_some() {
        return nearest;
      }
    }
    let next = if forward {
      self.next_index(index)
    } else {
      self.prev_index(index)
    };
    next.and_then(|i| self.get(i))
  }
}
