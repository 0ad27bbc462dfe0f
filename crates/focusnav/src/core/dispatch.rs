/*!
Keydown routing.

Evaluated top to bottom, first match wins:

1. a menu's global shortcut
2. open keys on a menu trigger
3. the innermost open menu holding focus
4. the innermost section holding focus
*/

use super::tasks::{ACTIVATION_CHECK_DELAY, SEARCH_VIEW_DELAY};
use super::{Navigator, Task};
use crate::a11y::attr;
use crate::menu::Menu;
use crate::platform::Document;
use crate::section::Traversal;
use crate::types::{Direction, KeyEvent, KeyOutcome, NavError, NavResult, NodeId};

impl<D: Document> Navigator<D> {
  /// Route a keydown. Never fails: errors are logged and the key is ignored.
  pub fn handle_keydown(&mut self, key: &KeyEvent) -> KeyOutcome {
    let outcome = match self.dispatch_key(key) {
      Ok(outcome) => outcome,
      Err(e) => {
        log::warn!("keydown '{}' dropped: {e}", key.key);
        KeyOutcome::IGNORED
      }
    };
    self.settle_focus();
    outcome
  }

  fn dispatch_key(&mut self, key: &KeyEvent) -> NavResult<KeyOutcome> {
    let active = self.doc.active_element();

    if let Some(trigger) = self.shortcut_target(key, active) {
      log::debug!("Shortcut '{}' opens menu at {trigger}", key.key);
      self.activate(trigger);
      return Ok(KeyOutcome::CONSUMED);
    }

    let Some(active) = active else {
      return Ok(KeyOutcome::IGNORED);
    };

    if let Some(idx) = self.menu_by_trigger(active) {
      if self
        .menus
        .get(idx)
        .is_some_and(|m| key.is_any(&m.config.keys.open))
      {
        self.activate(active);
        return Ok(KeyOutcome::CONSUMED);
      }
    }

    for idx in self.open_menus_containing(active) {
      if let Some(outcome) = self.menu_keydown(idx, key, active)? {
        return Ok(outcome);
      }
    }

    if let Some(idx) = self.sections_containing(active).first().copied() {
      return self.section_keydown(idx, key, active);
    }
    Ok(KeyOutcome::IGNORED)
  }

  /// Trigger of the menu whose shortcut `key` fires, unless focus is typing
  /// into a field or some menu is already open.
  fn shortcut_target(&self, key: &KeyEvent, active: Option<NodeId>) -> Option<NodeId> {
    let menu = self
      .menus
      .iter()
      .find(|m| m.shortcut.as_ref().is_some_and(|s| s.matches(key)))?;
    let typing = active.is_some_and(|a| menu.is_ignored_input(&self.doc, a));
    if typing || menu.is_open() || self.any_menu_open() {
      return None;
    }
    Some(menu.trigger)
  }

  /// None: focus is not on one of this menu's candidates, try the next
  /// menu out.
  fn menu_keydown(&mut self, idx: usize, key: &KeyEvent, active: NodeId) -> NavResult<Option<KeyOutcome>> {
    let menu = self.menus.get(idx).ok_or_else(|| stale_index("menu", idx))?;
    if menu.is_ignored_input(&self.doc, active) && !key.is_any(&menu.config.keys.exit_input) {
      if menu.search_input != Some(active) {
        return Ok(Some(KeyOutcome::IGNORED));
      }
      let id = menu.id;
      let pending = menu.view_refresh;
      if let Some(task) = pending {
        self.scheduler.cancel(task);
      }
      let task = self.scheduler.schedule(SEARCH_VIEW_DELAY, Task::RefreshSearchView(id));
      if let Some(menu) = self.menus.get_mut(idx) {
        menu.view_refresh = Some(task);
      }
      return Ok(Some(KeyOutcome::PASSED));
    }

    self.refresh_menu(idx);
    let menu = self.menus.get(idx).ok_or_else(|| stale_index("menu", idx))?;
    let Some(index) = menu.active_index(&self.doc, active) else {
      return Ok(None);
    };
    let Some(current) = menu.candidates.get(index) else {
      return Ok(None);
    };
    log::debug!("Menu {} handles '{}' at index {index}", menu.id, key.key);

    let keys = &menu.config.keys;
    let spatial = menu.config.all_direction_navigation;
    let shift = key.modifiers.shift;
    let dir = |d: Direction| spatial.then_some(d);

    if key.is_any(&keys.open) {
      if menu.config.numpad_only {
        self.press_numpad(idx, key, current);
      } else {
        self.activate(current);
      }
    } else if key.is_any(&keys.right) {
      if spatial {
        let target = menu.candidates.step(&self.doc, index, dir(Direction::Right), true);
        self.focus_step(idx, target);
      } else if self.doc.attribute_is(current, attr::ARIA_HASPOPUP, "menu") {
        let child_open = self
          .menu_by_trigger(current)
          .and_then(|c| self.menus.get(c))
          .is_some_and(Menu::is_open);
        if !child_open {
          self.activate(current);
        }
      }
    } else if key.is_any(&keys.down) || key.is_any(&keys.up) {
      let forward = key.is_any(&keys.down) && !shift;
      let d = if forward { Direction::Bottom } else { Direction::Top };
      let target = menu.candidates.step(&self.doc, index, dir(d), forward);
      self.focus_step(idx, target);
    } else if key.is_any(&keys.left) {
      if spatial {
        let target = menu.candidates.step(&self.doc, index, dir(Direction::Left), false);
        self.focus_step(idx, target);
      } else if !menu.config.main_menu {
        self.close_at(idx, true);
      }
    } else if key.is_any(&keys.exit) {
      self.close_at(idx, true);
    } else if menu.config.numpad_only {
      self.press_numpad(idx, key, current);
    } else if menu.numpad.is_some() {
      self.numpad_input(idx, &key.key);
    } else if !self.direct_search(idx, key) {
      return Ok(Some(KeyOutcome::IGNORED));
    }
    Ok(Some(KeyOutcome::CONSUMED))
  }

  fn focus_step(&mut self, idx: usize, target: Option<NodeId>) {
    if let Some(node) = target {
      self.focus_menu_item(idx, node);
    }
  }

  fn section_keydown(&mut self, idx: usize, key: &KeyEvent, active: NodeId) -> NavResult<KeyOutcome> {
    let refresh = !self.config.structural_watcher;
    let section = self.sections.get_mut(idx).ok_or_else(|| stale_index("section", idx))?;
    if refresh || section.config.always_refresh {
      section.refresh(&self.doc);
    }
    if section.candidates.is_empty() {
      return Ok(KeyOutcome::IGNORED);
    }
    if section.is_ignored_input(&self.doc, active) && !key.is_any(&section.config.keys.exit_input) {
      return Ok(KeyOutcome::IGNORED);
    }
    let Some(index) = section.candidates.index_of(active) else {
      return Ok(KeyOutcome::IGNORED);
    };
    if section.scroll(&mut self.doc, &key.key) {
      return Ok(KeyOutcome::CONSUMED);
    }

    let (id, keys) = (section.id, &section.config.keys);
    log::debug!("Section {id} handles '{}' at index {index}", key.key);

    if key.is_any(&keys.section) {
      let dir = if key.modifiers.shift {
        Traversal::Backward
      } else {
        Traversal::Forward
      };
      self.navigate_at(idx, dir);
      return Ok(KeyOutcome::CONSUMED);
    }

    let moves = [
      (&keys.up, Direction::Top, false),
      (&keys.down, Direction::Bottom, true),
      (&keys.left, Direction::Left, false),
      (&keys.right, Direction::Right, true),
    ];
    if let Some(&(_, dir, forward)) = moves.iter().find(|(keys, ..)| key.is_any(keys)) {
      if let Some(target) = section.candidates.step(&self.doc, index, Some(dir), forward) {
        self.doc.focus(target);
      }
      return Ok(KeyOutcome::CONSUMED);
    }

    if key.is_any(&keys.open) {
      self.activate(active);
      self.scheduler.schedule(
        ACTIVATION_CHECK_DELAY,
        Task::CheckActivation {
          section: id,
          item: active,
        },
      );
      return Ok(KeyOutcome::CONSUMED);
    }

    Ok(KeyOutcome {
      handled: false,
      prevent_default: section.config.lock_focus,
    })
  }
}

fn stale_index(kind: &str, idx: usize) -> NavError {
  NavError::Internal(format!("{kind} index {idx} out of range"))
}
