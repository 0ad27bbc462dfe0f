/*!
Two-level search view.

While a menu's search field holds text, every item of the menu tree is hidden
except the field itself and the results. A result is either

- a matching item, preceded by the submenu triggers that lead to it, or
- a matching submenu trigger, followed by that submenu's own items and any
  of its pinned (always-open) items.

Results are flagged with `data-search-result` and unhidden. The view records
the inline `hidden` state of everything it touches so [`SearchView::restore`]
puts the tree back exactly as it was.
*/

use crate::a11y::{attr, Role};
use crate::platform::Document;
use crate::types::NodeId;

use super::normalize;

/// An applied search view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SearchView {
  query: String,
  results: Vec<NodeId>,
  saved: Vec<(NodeId, bool)>,
}

/// Trigger whose next sibling is its submenu container.
fn is_submenu_trigger<D: Document>(doc: &D, node: NodeId) -> bool {
  doc.attribute_is(node, attr::ARIA_HASPOPUP, "menu") && doc.next_element_sibling(node).is_some()
}

fn owning_menu<D: Document>(doc: &D, node: NodeId) -> Option<NodeId> {
  doc
    .parent(node)
    .and_then(|p| doc.closest(p, |d, n| d.role(n) == Role::Menu))
}

impl SearchView {
  /// Hide the menu tree under `container` down to the matches for `query`.
  ///
  /// `pinned` lists `(item, owning trigger)` pairs for always-open items.
  pub(crate) fn apply<D: Document>(
    doc: &mut D,
    container: NodeId,
    input: NodeId,
    query: &str,
    pinned: &[(NodeId, NodeId)],
  ) -> Self {
    let mut view = Self {
      query: normalize(query),
      ..Self::default()
    };

    let scanned: Vec<NodeId> = doc
      .descendants(container)
      .into_iter()
      .filter(|&n| n != input && doc.role(n).is_menu_item())
      .collect();
    let matched: Vec<NodeId> = scanned
      .iter()
      .copied()
      .filter(|&n| !doc.is_disabled(n) && normalize(&doc.text_content(n)).contains(&view.query))
      .collect();

    for &node in &scanned {
      view.set_hidden(doc, node, true);
    }

    for node in matched {
      let pinned_owner = pinned
        .iter()
        .find(|(item, _)| *item == node)
        .map(|&(_, owner)| owner);
      let path_from = pinned_owner.unwrap_or(node);
      for trigger in view.triggers_above(doc, container, path_from) {
        view.push(trigger);
      }
      if let Some(owner) = pinned_owner {
        view.push(owner);
      }
      view.push(node);

      if is_submenu_trigger(doc, node) {
        if let Some(submenu) = doc.next_element_sibling(node) {
          view.set_hidden(doc, submenu, false);
          for &item in &scanned {
            if owning_menu(doc, item) == Some(submenu) {
              view.push(item);
            }
          }
        }
        for &(item, owner) in pinned {
          if owner == node {
            view.push(item);
          }
        }
      }
    }

    for node in view.results.clone() {
      view.set_hidden(doc, node, false);
      doc.set_attribute(node, attr::SEARCH_RESULT, "true");
    }
    view
  }

  /// Submenu triggers between `container` and `node`, outermost first.
  /// Unhides each submenu container on the way.
  fn triggers_above<D: Document>(&mut self, doc: &mut D, container: NodeId, node: NodeId) -> Vec<NodeId> {
    let mut chain = Vec::new();
    let mut current = owning_menu(doc, node);
    while let Some(menu) = current {
      if menu == container || !doc.contains(container, menu) {
        break;
      }
      self.set_hidden(doc, menu, false);
      if let Some(trigger) = doc
        .previous_element_sibling(menu)
        .filter(|&t| is_submenu_trigger(doc, t))
      {
        chain.push(trigger);
      }
      current = owning_menu(doc, menu);
    }
    chain.reverse();
    chain
  }

  fn push(&mut self, node: NodeId) {
    if !self.results.contains(&node) {
      self.results.push(node);
    }
  }

  fn set_hidden<D: Document>(&mut self, doc: &mut D, node: NodeId, hidden: bool) {
    if !self.saved.iter().any(|(n, _)| *n == node) {
      self.saved.push((node, doc.is_hidden(node)));
    }
    doc.set_hidden(node, hidden);
  }

  pub(crate) fn query(&self) -> &str {
    &self.query
  }

  /// Results in display order. Never includes the search field.
  pub(crate) fn results(&self) -> &[NodeId] {
    &self.results
  }

  /// Undo every change made by [`apply`](Self::apply).
  pub(crate) fn restore<D: Document>(self, doc: &mut D) {
    for &node in &self.results {
      doc.remove_attribute(node, attr::SEARCH_RESULT);
    }
    for &(node, was_hidden) in self.saved.iter().rev() {
      doc.set_hidden(node, was_hidden);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::{MemoryDocument, NodeSpec};

  struct Tree {
    doc: MemoryDocument,
    menu: NodeId,
    input: NodeId,
    open: NodeId,
    advanced: NodeId,
    submenu: NodeId,
    absolute: NodeId,
    zoom: NodeId,
    help: NodeId,
  }

  fn item(label: &str) -> NodeSpec {
    NodeSpec::new("li").role("menuitem").text(label).bounds(0.0, 0.0, 100.0, 20.0)
  }

  fn tree() -> Tree {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let menu = doc.append(body, NodeSpec::new("ul").role("menu").bounds(0.0, 0.0, 200.0, 200.0));
    let input = doc.append(
      menu,
      NodeSpec::new("input")
        .attr(attr::TYPE, "search")
        .attr(attr::USE_SEARCH, "true")
        .role("menuitem")
        .bounds(0.0, 0.0, 100.0, 20.0),
    );
    let open = doc.append(menu, item("Open"));
    let advanced = doc.append(menu, item("Advanced").attr(attr::ARIA_HASPOPUP, "menu"));
    let submenu = doc.append(menu, NodeSpec::new("ul").role("menu").hidden());
    let absolute = doc.append(submenu, item("Absolute"));
    let zoom = doc.append(submenu, item("Zoom"));
    let help = doc.append(menu, item("Help"));
    Tree { doc, menu, input, open, advanced, submenu, absolute, zoom, help }
  }

  #[test]
  fn matched_item_brings_its_trigger() {
    let mut t = tree();
    let view = SearchView::apply(&mut t.doc, t.menu, t.input, "ab", &[]);

    assert_eq!(view.results(), &[t.advanced, t.absolute]);
    for node in [t.advanced, t.absolute] {
      assert!(t.doc.attribute_is(node, attr::SEARCH_RESULT, "true"));
      assert!(t.doc.is_visible(node));
    }
    for node in [t.open, t.zoom, t.help] {
      assert!(!t.doc.is_visible(node));
    }
    assert!(t.doc.is_visible(t.input));
    assert!(!t.doc.has_attribute(t.input, attr::SEARCH_RESULT));
  }

  #[test]
  fn matched_trigger_brings_its_items() {
    let mut t = tree();
    let view = SearchView::apply(&mut t.doc, t.menu, t.input, "adv", &[]);
    assert_eq!(view.results(), &[t.advanced, t.absolute, t.zoom]);
    assert!(t.doc.is_visible(t.zoom));
    assert!(!t.doc.is_visible(t.open));
  }

  #[test]
  fn pinned_match_brings_owning_trigger() {
    let mut t = tree();
    // Zoom pinned outside the submenu, as the always-open relocation does.
    let pins = t.doc.append(t.menu, NodeSpec::new("div"));
    t.doc.insert_before(pins, t.zoom, None);

    let pinned = [(t.zoom, t.advanced)];
    let view = SearchView::apply(&mut t.doc, t.menu, t.input, "zoo", &pinned);
    assert_eq!(view.results(), &[t.advanced, t.zoom]);
    view.restore(&mut t.doc);

    let view = SearchView::apply(&mut t.doc, t.menu, t.input, "advanced", &pinned);
    assert_eq!(view.results(), &[t.advanced, t.absolute, t.zoom], "trigger match pulls pinned items");
  }

  #[test]
  fn disabled_items_do_not_match() {
    let mut t = tree();
    t.doc.set_attribute(t.help, attr::DISABLED, "");
    let view = SearchView::apply(&mut t.doc, t.menu, t.input, "help", &[]);
    assert!(view.results().is_empty());
  }

  #[test]
  fn restore_puts_tree_back() {
    let mut t = tree();
    let view = SearchView::apply(&mut t.doc, t.menu, t.input, "ab", &[]);
    assert!(!t.doc.is_hidden(t.submenu));
    view.restore(&mut t.doc);

    assert!(t.doc.is_hidden(t.submenu), "closed submenu hidden again");
    for node in [t.open, t.advanced, t.help] {
      assert!(t.doc.is_visible(node));
      assert!(!t.doc.has_attribute(node, attr::SEARCH_RESULT));
    }
    assert!(!t.doc.is_hidden(t.absolute));
  }
}
