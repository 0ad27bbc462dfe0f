/*!
Menu state.

A menu is a trigger element plus the content container that immediately
follows it. The container's `menuitem*` descendants (excluding those of nested
`role="menu"` containers) are its candidates.

- `mod.rs` - [`Menu`] state, markup set-up and candidate queries
- `always_open.rs` - pinning always-open items while the menu is closed

The cross-menu operations (open, close, activation, search) live on
[`Navigator`](crate::Navigator) because they touch other menus and the
shared registry.
*/

mod always_open;

pub(crate) use always_open::AlwaysOpen;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::a11y::{attr, Role};
use crate::candidates::CandidateSet;
use crate::config::MenuConfig;
use crate::core::NavContext;
use crate::platform::Document;
use crate::search::{DirectBuffer, NumpadBuffer, SearchView};
use crate::types::{Event, MenuId, NavError, NavResult, NodeId, Shortcut, TaskId};

/// Whether a menu's content is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum MenuState {
  #[default]
  Closed,
  Open,
}

#[derive(Debug)]
pub(crate) struct Menu {
  pub(crate) id: MenuId,
  pub(crate) trigger: NodeId,
  pub(crate) container: NodeId,
  pub(crate) config: MenuConfig,
  pub(crate) shortcut: Option<Shortcut>,
  pub(crate) state: MenuState,
  pub(crate) candidates: CandidateSet,

  /// Restored on reopen with `remember_last_item`.
  pub(crate) last_index: usize,
  /// Last item focused through this menu.
  pub(crate) last_active: Option<NodeId>,

  // === Search ===
  pub(crate) search_input: Option<NodeId>,
  pub(crate) view: Option<SearchView>,
  /// Pending re-filter after typing into the search field.
  pub(crate) view_refresh: Option<TaskId>,
  pub(crate) buffer: DirectBuffer,
  pub(crate) numpad: Option<NumpadBuffer>,

  pub(crate) always_open: AlwaysOpen,

  ctx: NavContext,
}

fn is_menu_item<D: Document>(doc: &D, node: NodeId) -> bool {
  doc.role(node).is_menu_item()
}

fn is_menu_marker<D: Document>(doc: &D, node: NodeId) -> bool {
  doc.role(node) == Role::Menu
}

impl Menu {
  /// Resolve the container, validate the config and write the initial
  /// markup: the trigger gets `aria-haspopup`/`aria-expanded`, the container
  /// gets `role="menu"` and is hidden.
  pub(crate) fn new<D: Document>(
    doc: &mut D,
    ctx: NavContext,
    id: MenuId,
    trigger: NodeId,
    config: MenuConfig,
  ) -> NavResult<Self> {
    if !doc.is_connected(trigger) {
      return Err(NavError::ElementNotFound(trigger));
    }
    let container = doc
      .next_element_sibling(trigger)
      .ok_or(NavError::MissingContainer(trigger))?;
    let shortcut = config
      .shortcut_key
      .as_deref()
      .map(str::parse::<Shortcut>)
      .transpose()?;

    doc.set_attribute(trigger, attr::ARIA_HASPOPUP, "menu");
    doc.set_attribute(trigger, attr::ARIA_EXPANDED, "false");
    if !doc.has_attribute(trigger, attr::TABINDEX) {
      doc.set_attribute(trigger, attr::TABINDEX, "0");
    }
    if doc.role(container) != Role::Menu {
      doc.set_attribute(container, attr::ROLE, Role::Menu.as_str());
    }
    doc.set_hidden(container, true);

    let mut menu = Self {
      id,
      trigger,
      container,
      config,
      shortcut,
      state: MenuState::Closed,
      candidates: CandidateSet::new(),
      last_index: 0,
      last_active: None,
      search_input: None,
      view: None,
      view_refresh: None,
      buffer: DirectBuffer::default(),
      numpad: None,
      always_open: AlwaysOpen::default(),
      ctx,
    };
    menu.search_input = menu.find_search_input(doc);
    menu.numpad = menu.setup_numpad(doc);
    Ok(menu)
  }

  pub(crate) fn is_open(&self) -> bool {
    self.state == MenuState::Open
  }

  fn owns<D: Document>(&self, doc: &D, node: NodeId) -> bool {
    doc
      .parent(node)
      .and_then(|p| doc.closest(p, is_menu_marker))
      == Some(self.container)
  }

  fn find_search_input<D: Document>(&self, doc: &D) -> Option<NodeId> {
    doc.descendants(self.container).into_iter().find(|&n| {
      doc.attribute_is(n, attr::USE_SEARCH, "true") && self.is_ignored_input(doc, n) && self.owns(doc, n)
    })
  }

  /// Numpad-only: the container is the pad and its buttons are the
  /// candidates. Otherwise a `data-use-numpad` element inside the menu hosts
  /// plain buttons that feed the digit buffer.
  fn setup_numpad<D: Document>(&self, doc: &mut D) -> Option<NumpadBuffer> {
    if self.config.numpad_only {
      if !doc.attribute_is(self.container, attr::USE_NUMPAD, "true") {
        log::warn!(
          "Menu {} is numpad-only but its container lacks {}",
          self.id,
          attr::USE_NUMPAD
        );
        return None;
      }
      let pad = NumpadBuffer::new(doc, self.container);
      for (button, _) in pad.buttons(doc) {
        doc.set_attribute(button, attr::ROLE, Role::MenuItem.as_str());
        doc.set_attribute(button, attr::TABINDEX, "0");
      }
      return Some(pad);
    }

    let element = doc
      .descendants(self.container)
      .into_iter()
      .find(|&n| doc.attribute_is(n, attr::USE_NUMPAD, "true") && self.owns(doc, n))?;
    doc.remove_attribute(element, attr::ROLE);
    let pad = NumpadBuffer::new(doc, element);
    for (button, kind) in pad.buttons(doc) {
      let label = NumpadBuffer::label(doc, button, kind);
      doc.set_attribute(button, attr::ROLE, Role::Button.as_str());
      doc.set_attribute(button, attr::ARIA_LABEL, &label);
    }
    Some(pad)
  }

  /// Recompute candidates from the document.
  pub(crate) fn refresh_items<D: Document>(&mut self, doc: &D) {
    self
      .candidates
      .refresh(doc, self.container, is_menu_item, is_menu_marker);
  }

  /// `<input>` whose keystrokes belong to the field.
  pub(crate) fn is_ignored_input<D: Document>(&self, doc: &D, node: NodeId) -> bool {
    doc
      .input_type(node)
      .is_some_and(|t| self.config.ignored_input_types.contains(&t))
  }

  /// Candidate index of `active`. Focus inside a numpad (not numpad-only)
  /// falls back to the last focused item, then to the remembered index.
  pub(crate) fn active_index<D: Document>(&self, doc: &D, active: NodeId) -> Option<usize> {
    if let Some(index) = self.candidates.index_of(active) {
      return Some(index);
    }
    let in_numpad = !self.config.numpad_only
      && self
        .numpad
        .as_ref()
        .is_some_and(|pad| doc.contains(pad.element, active));
    if !in_numpad || self.candidates.is_empty() {
      return None;
    }
    self
      .last_active
      .and_then(|n| self.candidates.index_of(n))
      .or_else(|| Some(self.last_index.min(self.candidates.len() - 1)))
  }

  /// Index to focus when the menu opens: the default item, overridden by a
  /// remembered index.
  pub(crate) fn initial_index<D: Document>(&self, doc: &D) -> Option<usize> {
    if self.candidates.is_empty() {
      return None;
    }
    let mut index = self
      .config
      .default_item_id
      .as_deref()
      .and_then(|id| doc.element_by_id(id))
      .and_then(|n| self.candidates.index_of(n))
      .unwrap_or(0);
    if self.config.remember_last_item && self.last_index != 0 && self.last_index < self.candidates.len() {
      index = self.last_index;
    }
    Some(index)
  }

  /// Write the open/closed markup and publish the change to the shared
  /// open-menu set.
  pub(crate) fn set_state<D: Document>(&mut self, doc: &mut D, state: MenuState) {
    self.state = state;
    let open = state == MenuState::Open;
    doc.set_attribute(self.trigger, attr::ARIA_EXPANDED, if open { "true" } else { "false" });
    doc.set_hidden(self.container, !open);

    let (menu, trigger) = (self.id, self.trigger);
    self.ctx.write(|r| r.set_menu_open(menu, open));
    self.ctx.emit(if open {
      Event::MenuOpened { menu, trigger }
    } else {
      Event::MenuClosed { menu, trigger }
    });
  }

  /// Move always-open items out of the menu and record them in the shared
  /// pinned list so searches in other menus can reveal this trigger.
  pub(crate) fn pin_always_open<D: Document>(&mut self, doc: &mut D) {
    let pinned = self.always_open.relocate(doc, self.container);
    if pinned.is_empty() {
      return;
    }
    let trigger = self.trigger;
    self.ctx.write(|r| {
      for item in pinned {
        r.pin(item, trigger);
      }
    });
  }

  /// Empty the search field and undo an applied search view. Returns
  /// whether a view was showing.
  pub(crate) fn end_search<D: Document>(&mut self, doc: &mut D) -> bool {
    if let Some(input) = self.search_input {
      doc.set_value(input, "");
    }
    let Some(view) = self.view.take() else {
      return false;
    };
    view.restore(doc);
    self.ctx.emit(Event::SearchCleared { menu: self.id });
    true
  }

  /// Undo the menu's document edits and drop its pinned items from the
  /// shared registry.
  pub(crate) fn release<D: Document>(&mut self, doc: &mut D) {
    self.end_search(doc);
    self.always_open.reinsert(doc);
    let trigger = self.trigger;
    self.ctx.write(|r| r.unpin_trigger(trigger));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::Registry;
  use crate::platform::{MemoryDocument, NodeSpec};

  fn ctx() -> NavContext {
    NavContext::new(async_broadcast::broadcast(4).0)
  }

  fn item(label: &str) -> NodeSpec {
    NodeSpec::new("li").role("menuitem").text(label).bounds(0.0, 0.0, 100.0, 20.0)
  }

  fn menu_doc() -> (MemoryDocument, NodeId, NodeId, Vec<NodeId>) {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let trigger = doc.append(body, NodeSpec::new("button").text("File"));
    let container = doc.append(body, NodeSpec::new("ul"));
    let items = ["New", "Open", "Save"]
      .iter()
      .map(|l| doc.append(container, item(l).id(&l.to_lowercase())))
      .collect();
    (doc, trigger, container, items)
  }

  #[test]
  fn registration_writes_markup() {
    let (mut doc, trigger, container, _) = menu_doc();
    let menu = Menu::new(&mut doc, ctx(), MenuId(0), trigger, MenuConfig::default()).expect("menu");
    assert_eq!(menu.container, container);
    assert!(doc.attribute_is(trigger, attr::ARIA_HASPOPUP, "menu"));
    assert!(doc.attribute_is(trigger, attr::ARIA_EXPANDED, "false"));
    assert!(doc.attribute_is(trigger, attr::TABINDEX, "0"));
    assert_eq!(doc.role(container), Role::Menu);
    assert!(doc.is_hidden(container));
  }

  #[test]
  fn missing_container_is_an_error() {
    let mut doc = MemoryDocument::new();
    let body = doc.body();
    let trigger = doc.append(body, NodeSpec::new("button"));
    let err = Menu::new(&mut doc, ctx(), MenuId(0), trigger, MenuConfig::default()).expect_err("no sibling");
    assert!(matches!(err, NavError::MissingContainer(t) if t == trigger));
  }

  #[test]
  fn invalid_shortcut_is_an_error() {
    let (mut doc, trigger, _, _) = menu_doc();
    let config = MenuConfig {
      shortcut_key: Some("ctrl+".into()),
      ..MenuConfig::default()
    };
    assert!(matches!(
      Menu::new(&mut doc, ctx(), MenuId(0), trigger, config),
      Err(NavError::InvalidShortcut(_))
    ));
  }

  #[test]
  fn candidates_need_an_open_container() {
    let (mut doc, trigger, _, items) = menu_doc();
    let mut menu = Menu::new(&mut doc, ctx(), MenuId(0), trigger, MenuConfig::default()).expect("menu");
    menu.refresh_items(&doc);
    assert!(menu.candidates.is_empty());

    menu.set_state(&mut doc, MenuState::Open);
    menu.refresh_items(&doc);
    assert_eq!(menu.candidates.items(), items.as_slice());
    assert!(doc.attribute_is(trigger, attr::ARIA_EXPANDED, "true"));
  }

  #[test]
  fn state_changes_reach_the_shared_context() {
    let (mut doc, trigger, _, _) = menu_doc();
    let shared = ctx();
    let mut menu = Menu::new(&mut doc, shared.clone(), MenuId(0), trigger, MenuConfig::default()).expect("menu");
    assert!(!shared.read(Registry::any_menu_open));

    menu.set_state(&mut doc, MenuState::Open);
    assert!(shared.read(Registry::any_menu_open));
    menu.set_state(&mut doc, MenuState::Closed);
    assert!(!shared.read(Registry::any_menu_open));
  }

  #[test]
  fn initial_index_prefers_remembered_over_default() {
    let (mut doc, trigger, _, _) = menu_doc();
    let config = MenuConfig {
      default_item_id: Some("open".into()),
      remember_last_item: true,
      ..MenuConfig::default()
    };
    let mut menu = Menu::new(&mut doc, ctx(), MenuId(0), trigger, config).expect("menu");
    menu.set_state(&mut doc, MenuState::Open);
    menu.refresh_items(&doc);
    assert_eq!(menu.initial_index(&doc), Some(1));

    menu.last_index = 2;
    assert_eq!(menu.initial_index(&doc), Some(2));
  }

  #[test]
  fn detects_search_input_and_numpad() {
    let (mut doc, trigger, container, _) = menu_doc();
    let input = doc.append(
      container,
      NodeSpec::new("input")
        .attr(attr::TYPE, "search")
        .attr(attr::USE_SEARCH, "true")
        .role("menuitem")
        .bounds(0.0, 0.0, 100.0, 20.0),
    );
    let pad = doc.append(container, NodeSpec::new("div").role("menuitem").attr(attr::USE_NUMPAD, "true"));
    let one = doc.append(pad, NodeSpec::new("button").attr(attr::BUTTON_TYPE, "number").text("1"));

    let menu = Menu::new(&mut doc, ctx(), MenuId(0), trigger, MenuConfig::default()).expect("menu");
    assert_eq!(menu.search_input, Some(input));
    assert_eq!(menu.numpad.as_ref().map(|p| p.element), Some(pad));
    assert!(!doc.has_attribute(pad, attr::ROLE), "numpad host is not a candidate");
    assert_eq!(doc.role(one), Role::Button);
    assert!(doc.attribute_is(one, attr::ARIA_LABEL, "1"));
  }

  #[test]
  fn numpad_fallback_index() {
    let (mut doc, trigger, container, items) = menu_doc();
    let pad = doc.append(container, NodeSpec::new("div").attr(attr::USE_NUMPAD, "true"));
    let one = doc.append(
      pad,
      NodeSpec::new("button").attr(attr::BUTTON_TYPE, "number").text("1").bounds(0.0, 0.0, 10.0, 10.0),
    );
    let mut menu = Menu::new(&mut doc, ctx(), MenuId(0), trigger, MenuConfig::default()).expect("menu");
    menu.set_state(&mut doc, MenuState::Open);
    menu.refresh_items(&doc);

    assert_eq!(menu.active_index(&doc, one), Some(0));
    menu.last_active = Some(items[2]);
    assert_eq!(menu.active_index(&doc, one), Some(2));
    assert_eq!(menu.active_index(&doc, trigger), None);
  }
}
