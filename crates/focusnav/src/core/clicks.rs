/*!
Click and focus routing.

A click is offered to every menu in registration order, the way each menu's
document-level click handler would see it.
*/

use super::tasks::{REFOCUS_DELAY, RESTORE_FOCUS_DELAY};
use super::{Navigator, Task};
use crate::a11y::{attr, ButtonKind};
use crate::platform::Document;
use crate::search::NumpadBuffer;
use crate::types::NodeId;

impl<D: Document> Navigator<D> {
  /// A pointer click on `target`.
  pub fn handle_click(&mut self, target: NodeId) {
    if !self.doc.is_connected(target) {
      log::warn!("handle_click: {target} is not in the document");
      return;
    }
    self.route_click(target);

    if !self.sections.is_empty() {
      if let Some(task) = self.restore_task.take() {
        self.scheduler.cancel(task);
      }
      self.restore_task = Some(self.scheduler.schedule(RESTORE_FOCUS_DELAY, Task::RestoreFocus));
    }
    self.settle_focus();
  }

  /// Focus moved to `target` (focusin). Enters sections and records the
  /// position for later restores.
  pub fn handle_focus(&mut self, target: NodeId) {
    if self.doc.active_element() != Some(target) {
      log::debug!("handle_focus: {target} reported but document focus differs");
    }
    self.settle_focus();
  }

  pub(crate) fn route_click(&mut self, target: NodeId) {
    self.click_numpad(target);
    self.click_to_focus(target);

    for idx in 0..self.menus.len() {
      self.route_menu_click(idx, target);
    }
  }

  /// Buttons of an embedded numpad feed its digit buffer.
  fn click_numpad(&mut self, target: NodeId) {
    let doc = &self.doc;
    let Some(idx) = self.menus.iter().position(|m| {
      !m.config.numpad_only
        && m
          .numpad
          .as_ref()
          .is_some_and(|pad| doc.contains(pad.element, target))
    }) else {
      return;
    };
    let Some((button, kind)) = doc
      .closest(target, |d, n| d.has_attribute(n, attr::BUTTON_TYPE))
      .and_then(|b| Some((b, ButtonKind::parse(&doc.attribute(b, attr::BUTTON_TYPE)?)?)))
    else {
      return;
    };
    let label = NumpadBuffer::label(doc, button, kind);
    self.numpad_input(idx, &label);
  }

  /// A clicked item of an open menu takes focus, unless the click selects
  /// and closes.
  fn click_to_focus(&mut self, target: NodeId) {
    let Some(item) = self.doc.closest(target, |d, n| d.role(n).is_menu_item()) else {
      return;
    };
    if self.menu_by_trigger(item).is_some() {
      return;
    }
    let Some(idx) = self.open_menus_containing(item).into_iter().find(|&i| {
      self
        .menus
        .get(i)
        .is_some_and(|m| m.candidates.contains(item) && !m.config.close_on_selection)
    }) else {
      return;
    };
    let Some(container) = self.menus.get(idx).map(|m| m.container) else {
      return;
    };
    self.focus_menu_item(idx, item);
    self.scheduler.schedule(
      REFOCUS_DELAY,
      Task::Refocus {
        node: item,
        scope: container,
      },
    );
  }

  fn route_menu_click(&mut self, idx: usize, target: NodeId) {
    let Some(menu) = self.menus.get(idx) else {
      return;
    };
    let doc = &self.doc;
    let (trigger, container) = (menu.trigger, menu.container);
    let on_trigger = doc.contains(trigger, target);
    let inside = doc.contains(container, target);

    if menu.config.main_menu {
      if on_trigger {
        self.toggle_at(idx);
      } else if !inside && menu.is_open() {
        self.close_at(idx, false);
      }
      return;
    }

    if doc
      .active_element()
      .is_some_and(|a| menu.is_ignored_input(doc, a))
    {
      return;
    }

    if !on_trigger && !inside {
      if !menu.is_open() {
        return;
      }
      let keep_open = doc.attribute_is(trigger, attr::KEEP_SUBMENU_OPEN, "true");
      let on_other_trigger = self
        .menus
        .iter()
        .any(|m| m.trigger != trigger && doc.contains(m.trigger, target));
      if !keep_open || on_other_trigger {
        log::debug!("Outside click closes menu {}", menu.id);
        self.close_at(idx, false);
      }
      return;
    }

    if on_trigger {
      self.toggle_at(idx);
      return;
    }

    let Some(index) = doc
      .closest(target, |d, n| d.role(n).is_menu_item())
      .and_then(|item| menu.candidates.index_of(item))
    else {
      return;
    };
    let selected = menu.candidates.get(index);
    let closes = menu.config.close_on_selection && selected.and_then(|n| self.menu_by_trigger(n)).is_none();
    if let Some(menu) = self.menus.get_mut(idx) {
      if menu.config.remember_last_item {
        menu.last_index = index;
      }
    }
    if closes {
      self.close_at(idx, true);
    }
  }
}
