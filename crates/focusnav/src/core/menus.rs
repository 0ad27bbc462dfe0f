/*!
Menu operations: registration, open/close, activation and search.
*/

use std::time::Duration;

use super::tasks::{REFOCUS_DELAY, TRIGGER_FOCUS_DELAY};
use super::Registry;
use super::{Navigator, Task};
use crate::a11y::{attr, ButtonKind, Role};
use crate::config::MenuConfig;
use crate::menu::{Menu, MenuState};
use crate::platform::Document;
use crate::search::{find_item, normalize, NumpadStep, SearchView};
use crate::types::{Event, KeyEvent, MenuId, NavError, NavResult, NodeId, SearchMode};

impl<D: Document> Navigator<D> {
  // === Public API ===

  /// Register `trigger` as a menu trigger. Its next element sibling is the
  /// content container.
  pub fn register_menu(&mut self, trigger: NodeId, config: MenuConfig) -> NavResult<MenuId> {
    if self.menus.iter().any(|m| m.trigger == trigger) {
      log::warn!("register_menu: {trigger} is already a menu trigger");
      return Err(NavError::AlreadyRegistered(trigger));
    }
    let id = MenuId(self.next_menu_id());
    let menu = Menu::new(&mut self.doc, self.ctx.clone(), id, trigger, config).map_err(|e| {
      log::warn!("register_menu: {e}");
      e
    })?;
    log::debug!("Registered menu {id} (trigger {trigger}, container {})", menu.container);
    self.menus.push(menu);
    self.refresh_menu(self.menus.len() - 1);
    Ok(id)
  }

  pub fn open_menu(&mut self, id: MenuId) -> NavResult<()> {
    let idx = self.menu_index(id)?;
    self.open_at(idx, false);
    self.settle_focus();
    Ok(())
  }

  /// Close a menu and return focus to its trigger.
  pub fn close_menu(&mut self, id: MenuId) -> NavResult<()> {
    let idx = self.menu_index(id)?;
    self.close_at(idx, true);
    self.settle_focus();
    Ok(())
  }

  pub fn toggle_menu(&mut self, id: MenuId) -> NavResult<()> {
    let idx = self.menu_index(id)?;
    self.toggle_at(idx);
    self.settle_focus();
    Ok(())
  }

  pub fn menu_state(&self, id: MenuId) -> Option<MenuState> {
    self.menus.iter().find(|m| m.id == id).map(|m| m.state)
  }

  pub fn any_menu_open(&self) -> bool {
    self.ctx.read(Registry::any_menu_open)
  }

  /// Current candidates of a menu, as of its last refresh.
  pub fn menu_items(&self, id: MenuId) -> Vec<NodeId> {
    self
      .menus
      .iter()
      .find(|m| m.id == id)
      .map(|m| m.candidates.items().to_vec())
      .unwrap_or_default()
  }

  // === Lookup ===

  pub(crate) fn menu_index(&self, id: MenuId) -> NavResult<usize> {
    self
      .menus
      .iter()
      .position(|m| m.id == id)
      .ok_or(NavError::MenuNotFound(id))
  }

  pub(crate) fn menu_by_trigger(&self, node: NodeId) -> Option<usize> {
    self.menus.iter().position(|m| m.trigger == node)
  }

  /// Open menus whose container holds `node`, innermost first.
  pub(crate) fn open_menus_containing(&self, node: NodeId) -> Vec<usize> {
    let mut found: Vec<(usize, usize)> = self
      .menus
      .iter()
      .enumerate()
      .filter(|(_, m)| m.is_open() && self.doc.contains(m.container, node))
      .map(|(i, m)| (i, self.depth(m.container)))
      .collect();
    found.sort_by(|a, b| b.1.cmp(&a.1));
    found.into_iter().map(|(i, _)| i).collect()
  }

  fn depth(&self, node: NodeId) -> usize {
    std::iter::successors(self.doc.parent(node), |&n| self.doc.parent(n)).count()
  }

  // === Candidates ===

  /// Recompute a menu's candidates.
  ///
  /// With text in the search field of an open menu the candidates are the
  /// field plus the search view's results. Otherwise they come from the
  /// document, and a closed menu pins its always-open items.
  pub(crate) fn refresh_menu(&mut self, idx: usize) {
    let Some(menu) = self.menus.get_mut(idx) else {
      return;
    };
    let doc = &mut self.doc;

    if let Some(input) = menu.search_input.filter(|_| menu.is_open()) {
      let query = normalize(&doc.value(input));
      if !query.is_empty() {
        let changed = menu.view.as_ref().map(SearchView::query) != Some(query.as_str());
        if let Some(old) = menu.view.take() {
          old.restore(doc);
        }
        let pinned = self.ctx.read(|r| r.pinned().to_vec());
        let view = SearchView::apply(doc, menu.container, input, &query, &pinned);
        let results: Vec<NodeId> = view
          .results()
          .iter()
          .copied()
          .filter(|&n| !doc.is_disabled(n) && doc.is_visible(n))
          .collect();
        menu
          .candidates
          .replace(std::iter::once(input).chain(results.iter().copied()));
        if changed {
          log::debug!("Menu {} search '{query}': {} result(s)", menu.id, results.len());
          self.ctx.emit(Event::SearchResults {
            menu: menu.id,
            query,
            results,
          });
        }
        menu.view = Some(view);
        return;
      }
      if let Some(old) = menu.view.take() {
        old.restore(doc);
        self.ctx.emit(Event::SearchCleared { menu: menu.id });
        self.sync_containers();
        self.refresh_menu(idx);
        return;
      }
    }

    menu.refresh_items(doc);
    if !menu.is_open() && doc.active_element() != Some(menu.trigger) {
      menu.pin_always_open(doc);
    }
  }

  /// Re-assert every container's hidden state from its menu's state.
  fn sync_containers(&mut self) {
    for menu in &self.menus {
      self.doc.set_hidden(menu.container, !menu.is_open());
    }
  }

  // === Open / close ===

  /// Open a menu. `quiet` leaves focus where it is (submenus opened
  /// alongside their parent).
  pub(crate) fn open_at(&mut self, idx: usize, quiet: bool) {
    let Some(menu) = self.menus.get_mut(idx) else {
      return;
    };
    if menu.is_open() {
      return;
    }
    let doc = &mut self.doc;

    if let Some(input) = menu.search_input {
      doc.set_value(input, "");
    }
    if let Some(pad) = menu.numpad.as_mut() {
      pad.reset(doc);
    }
    menu.buffer.clear();
    if let Some(task) = menu.buffer.decay.take() {
      self.scheduler.cancel(task);
    }
    menu.always_open.reinsert(doc);
    menu.set_state(doc, MenuState::Open);
    log::debug!("Opened menu {}", menu.id);

    self.refresh_menu(idx);
    let Some(menu) = self.menus.get(idx) else {
      return;
    };
    if menu.candidates.is_empty() {
      return;
    }

    if !quiet {
      if let Some(mut index) = menu.initial_index(&self.doc) {
        if menu
          .candidates
          .get(index)
          .is_some_and(|n| menu.is_ignored_input(&self.doc, n))
        {
          index = menu.candidates.next_index(index).unwrap_or(index);
        }
        if let Some(node) = menu.candidates.get(index) {
          self.focus_menu_item(idx, node);
        }
      }
    }

    let keep_open: Vec<usize> = self
      .menus
      .get(idx)
      .map(|m| m.candidates.items().to_vec())
      .unwrap_or_default()
      .into_iter()
      .filter(|&n| self.doc.attribute_is(n, attr::KEEP_SUBMENU_OPEN, "true"))
      .filter_map(|n| self.menu_by_trigger(n))
      .collect();
    for child in keep_open {
      if self.menus.get(child).is_some_and(Menu::is_open) {
        self.refresh_menu(child);
      } else {
        self.open_at(child, true);
      }
    }
  }

  /// Close a menu and any open menus nested in it.
  pub(crate) fn close_at(&mut self, idx: usize, restore_focus: bool) {
    let Some(menu) = self.menus.get_mut(idx) else {
      return;
    };
    if !menu.is_open() {
      return;
    }
    menu.set_state(&mut self.doc, MenuState::Closed);
    for task in [menu.view_refresh.take(), menu.buffer.decay.take()].into_iter().flatten() {
      self.scheduler.cancel(task);
    }
    menu.buffer.clear();
    let (id, container) = (menu.id, menu.container);
    if restore_focus {
      self
        .scheduler
        .schedule(TRIGGER_FOCUS_DELAY, Task::RestoreTriggerFocus(id));
    }
    // The search view has to be gone before pinned items are parked, or
    // they keep whatever visibility it gave them.
    menu.end_search(&mut self.doc);
    menu.always_open.park(&mut self.doc);
    log::debug!("Closed menu {id}");

    let nested: Vec<usize> = self
      .menus
      .iter()
      .enumerate()
      .filter(|(i, m)| *i != idx && m.is_open() && self.doc.contains(container, m.trigger))
      .map(|(i, _)| i)
      .collect();
    for child in nested {
      self.close_at(child, false);
    }
  }

  pub(crate) fn toggle_at(&mut self, idx: usize) {
    if self.menus.get(idx).is_some_and(Menu::is_open) {
      self.close_at(idx, true);
    } else {
      self.open_at(idx, false);
    }
  }

  // === Focus and activation ===

  pub(crate) fn focus_menu_item(&mut self, idx: usize, node: NodeId) {
    let doc = &mut self.doc;
    if let Some(menu_root) = doc.closest(node, |d, n| d.role(n) == Role::Menu) {
      if doc.attribute_is(menu_root, attr::ARIA_HIDDEN, "true") {
        doc.set_attribute(menu_root, attr::ARIA_HIDDEN, "false");
      }
    }
    let tabindex = doc
      .attribute(node, attr::TABINDEX)
      .and_then(|t| t.trim().parse::<i32>().ok());
    if !matches!(tabindex, Some(i) if i >= 0) {
      doc.set_attribute(node, attr::TABINDEX, "0");
    }
    doc.focus(node);
    if let Some(menu) = self.menus.get_mut(idx) {
      menu.last_active = Some(node);
    }
  }

  /// Click `node` on the user's behalf and route the click as if it came
  /// from the host.
  pub(crate) fn activate(&mut self, node: NodeId) {
    self.doc.click(node);
    self.ctx.emit(Event::ItemActivated { node });
    self.route_click(node);
  }

  // === Search ===

  /// Type-ahead. Returns false for keys that produce no text.
  pub(crate) fn direct_search(&mut self, idx: usize, key: &KeyEvent) -> bool {
    if !key.is_printable() || key.modifiers.ctrl || key.modifiers.meta {
      return false;
    }
    let Some(menu) = self.menus.get_mut(idx) else {
      return false;
    };
    let query = menu.buffer.push(&key.key).to_string();
    if let Some(task) = menu.buffer.decay.take() {
      self.scheduler.cancel(task);
    }
    let decay = Duration::from_millis(menu.config.search_decay_ms);
    menu.buffer.decay = Some(self.scheduler.schedule(decay, Task::ClearSearchBuffer(menu.id)));
    self.search_menu(idx, &query, SearchMode::Direct, false);
    true
  }

  /// Feed a key or button label into a menu's numpad buffer.
  pub(crate) fn numpad_input(&mut self, idx: usize, key: &str) {
    let Some(pad) = self.menus.get_mut(idx).and_then(|m| m.numpad.as_mut()) else {
      return;
    };
    match pad.input(key) {
      NumpadStep::Search(text) => {
        pad.render(&mut self.doc);
        self.search_menu(idx, &text, SearchMode::Numpad, false);
      }
      NumpadStep::Commit(text) => self.search_menu(idx, &text, SearchMode::Numpad, true),
      NumpadStep::Cleared => pad.render(&mut self.doc),
      NumpadStep::Ignored => {}
    }
  }

  /// Numpad-only menus: a key presses the matching button.
  pub(crate) fn press_numpad(&mut self, idx: usize, key: &KeyEvent, current: NodeId) {
    let Some(menu) = self.menus.get(idx) else {
      return;
    };
    let wanted = normalize(&key.key);
    let is_open_key = key.is_any(&menu.config.keys.open);
    let mut target = None;
    for &button in menu.candidates.items() {
      let kind = self
        .doc
        .attribute(button, attr::BUTTON_TYPE)
        .and_then(|t| ButtonKind::parse(&t));
      match kind {
        Some(ButtonKind::Enter) if is_open_key => {
          target = Some(if key.key == " " { current } else { button });
          break;
        }
        Some(ButtonKind::Backspace) if wanted == "backspace" => {
          target = Some(button);
          break;
        }
        _ if !wanted.is_empty() && normalize(&self.doc.text_content(button)) == wanted => {
          target = Some(button);
          break;
        }
        _ => {}
      }
    }
    if let Some(button) = target {
      self.activate(button);
    }
  }

  /// Find `query` among the candidates. A commit activates the match;
  /// otherwise it is focused.
  pub(crate) fn search_menu(&mut self, idx: usize, query: &str, mode: SearchMode, commit: bool) {
    let Some(menu) = self.menus.get(idx) else {
      return;
    };
    let Some(found) = find_item(&self.doc, menu.candidates.items(), query) else {
      log::debug!("Menu {}: no match for '{query}'", menu.id);
      return;
    };
    let (id, container, close_on_selection) = (menu.id, menu.container, menu.config.close_on_selection);
    self.ctx.emit(Event::SearchMatched {
      menu: id,
      mode,
      query: query.to_string(),
      node: found,
    });

    if commit {
      self.activate(found);
      if close_on_selection {
        self.close_at(idx, true);
      }
      return;
    }
    self.doc.scroll_into_view(found);
    self.focus_menu_item(idx, found);
    self.scheduler.schedule(
      REFOCUS_DELAY,
      Task::Refocus {
        node: found,
        scope: container,
      },
    );
  }
}
