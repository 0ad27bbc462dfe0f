/*!
Always-open items.

An item tagged `data-always-open="true"` stays reachable while its menu is
closed. When the menu is closed the item is moved into a pinned container
placed right after the menu's content container. On open it goes back to its
recorded position. The flag reads `false` while the item is pinned and `true`
while it sits in the menu.
*/

use crate::a11y::{attr, Role};
use crate::platform::Document;
use crate::types::NodeId;

/// Original position of a pinned item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AlwaysOpenRecord {
  pub(crate) item: NodeId,
  pub(crate) parent: NodeId,
  pub(crate) next_sibling: Option<NodeId>,
}

#[derive(Debug, Default)]
pub(crate) struct AlwaysOpen {
  container: Option<NodeId>,
  records: Vec<AlwaysOpenRecord>,
}

impl AlwaysOpen {
  fn is_tracked(&self, item: NodeId) -> bool {
    self.records.iter().any(|r| r.item == item)
  }

  /// Move flagged items of `menu` into the pinned container, creating it on
  /// first use. Returns the items tracked for the first time.
  pub(crate) fn relocate<D: Document>(&mut self, doc: &mut D, menu: NodeId) -> Vec<NodeId> {
    let flagged: Vec<NodeId> = doc
      .descendants(menu)
      .into_iter()
      .filter(|&n| doc.attribute_is(n, attr::ALWAYS_OPEN, "true"))
      .filter(|&n| {
        doc
          .parent(n)
          .and_then(|p| doc.closest(p, |d, m| d.role(m) == Role::Menu))
          == Some(menu)
      })
      .collect();
    if flagged.is_empty() {
      return Vec::new();
    }

    let Some(container) = self.ensure_container(doc, menu) else {
      log::warn!("Menu container {menu} is detached; always-open items stay in place");
      return Vec::new();
    };

    let mut tracked = Vec::new();
    for item in flagged {
      if !self.is_tracked(item) {
        let Some(parent) = doc.parent(item) else {
          continue;
        };
        self.records.push(AlwaysOpenRecord {
          item,
          parent,
          next_sibling: doc.next_element_sibling(item),
        });
        tracked.push(item);
      }
      doc.set_attribute(item, attr::ALWAYS_OPEN, "false");
      doc.insert_before(container, item, None);
    }
    log::debug!("Pinned {} always-open item(s) of menu {menu}", self.records.len());
    tracked
  }

  fn ensure_container<D: Document>(&mut self, doc: &mut D, menu: NodeId) -> Option<NodeId> {
    if let Some(container) = self.container {
      return Some(container);
    }
    let parent = doc.parent(menu)?;
    let container = doc.create_element("div");
    let reference = doc.next_element_sibling(menu);
    doc.insert_before(parent, container, reference);
    self.container = Some(container);
    Some(container)
  }

  /// Put every tracked item back where it was recorded.
  ///
  /// Runs in reverse so an item whose recorded sibling was itself pinned
  /// finds that sibling already back in place.
  pub(crate) fn reinsert<D: Document>(&self, doc: &mut D) {
    for record in self.records.iter().rev() {
      doc.set_attribute(record.item, attr::ALWAYS_OPEN, "true");
      let reference = record
        .next_sibling
        .filter(|&s| doc.parent(s) == Some(record.parent));
      doc.insert_before(record.parent, record.item, reference);
    }
  }

  /// Move tracked items that are not pinned back into the pinned container.
  pub(crate) fn park<D: Document>(&self, doc: &mut D) {
    let Some(container) = self.container else {
      return;
    };
    for record in &self.records {
      if doc.parent(record.item) != Some(container) {
        doc.insert_before(container, record.item, None);
        doc.set_attribute(record.item, attr::ALWAYS_OPEN, "false");
      }
    }
  }
}
