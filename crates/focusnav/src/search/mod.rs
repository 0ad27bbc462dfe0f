/*!
Type-ahead search over a menu's candidates.

- `mod.rs` - label matching and the direct-typing buffer
- `numpad.rs` - digit entry through on-screen numpad buttons
- `two_level.rs` - filtered result view driven by a search field

All modes share one matching rule: case-insensitive, trimmed, prefix matches
beat substring matches, ties go to candidate order.
*/

mod numpad;
mod two_level;

pub(crate) use numpad::{NumpadBuffer, NumpadStep};
pub(crate) use two_level::SearchView;

use crate::platform::Document;
use crate::types::{NodeId, TaskId};

/// Trimmed, lowercased form used for every comparison.
pub(crate) fn normalize(text: &str) -> String {
  text.trim().to_lowercase()
}

/// First label that starts with `query`, else the first that contains it.
///
/// An empty query never matches.
pub(crate) fn find_match<T: Copy>(query: &str, labels: &[(T, String)]) -> Option<T> {
  let query = normalize(query);
  if query.is_empty() {
    return None;
  }
  let labels: Vec<(T, String)> = labels.iter().map(|(t, l)| (*t, normalize(l))).collect();
  labels
    .iter()
    .find(|(_, l)| l.starts_with(&query))
    .or_else(|| labels.iter().find(|(_, l)| l.contains(&query)))
    .map(|(t, _)| *t)
}

/// [`find_match`] over the text content of `items`.
pub(crate) fn find_item<D: Document>(doc: &D, items: &[NodeId], query: &str) -> Option<NodeId> {
  let labels: Vec<(NodeId, String)> = items
    .iter()
    .map(|&n| (n, doc.text_content(n)))
    .collect();
  find_match(query, &labels)
}

/// Rolling buffer for direct type-ahead. Cleared after a quiet period.
#[derive(Debug, Default)]
pub(crate) struct DirectBuffer {
  text: String,
  /// Pending clear task.
  pub(crate) decay: Option<TaskId>,
}

impl DirectBuffer {
  /// Append a typed character. Whitespace-only input is ignored.
  pub(crate) fn push(&mut self, key: &str) -> &str {
    self.text.push_str(key.trim());
    &self.text
  }

  pub(crate) fn clear(&mut self) {
    self.text.clear();
  }
}
