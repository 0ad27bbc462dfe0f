/*!
Deferred work.

Every task re-checks its precondition when it runs and does nothing if the
state it was scheduled for has moved on.
*/

use std::time::Duration;

use super::Navigator;
use crate::platform::Document;
use crate::types::{MenuId, NodeId, SectionId};

/// Focus returns to a closed menu's trigger.
pub(crate) const TRIGGER_FOCUS_DELAY: Duration = Duration::from_millis(10);
/// Typing into a search field settles before the view is rebuilt.
pub(crate) const SEARCH_VIEW_DELAY: Duration = Duration::from_millis(50);
/// Focus is re-asserted after a click or search match.
pub(crate) const REFOCUS_DELAY: Duration = Duration::from_millis(100);
/// Focus is re-asserted after entering a section.
pub(crate) const SECTION_REFOCUS_DELAY: Duration = Duration::from_millis(150);
/// Activation in a section may re-render; check focus survived.
pub(crate) const ACTIVATION_CHECK_DELAY: Duration = Duration::from_millis(100);
/// A document click may have dropped focus to the body.
pub(crate) const RESTORE_FOCUS_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Task {
  ClearSearchBuffer(MenuId),
  RestoreTriggerFocus(MenuId),
  RefreshSearchView(MenuId),
  /// Put focus back on `node` unless it moved elsewhere inside `scope`.
  Refocus { node: NodeId, scope: NodeId },
  CheckActivation { section: SectionId, item: NodeId },
  RestoreFocus,
  PollVisibility,
}

impl<D: Document> Navigator<D> {
  pub(crate) fn run_task(&mut self, task: Task) {
    log::trace!("Running {task:?} at {:?}", self.scheduler.now());
    match task {
      Task::ClearSearchBuffer(id) => {
        if let Some(menu) = self.menus.iter_mut().find(|m| m.id == id) {
          menu.buffer.decay = None;
          menu.buffer.clear();
        }
      }
      Task::RestoreTriggerFocus(id) => {
        let Some(menu) = self.menus.iter().find(|m| m.id == id) else {
          return;
        };
        if !menu.is_open() {
          self.doc.focus(menu.trigger);
        }
      }
      Task::RefreshSearchView(id) => {
        let Some(idx) = self.menus.iter().position(|m| m.id == id) else {
          return;
        };
        if let Some(menu) = self.menus.get_mut(idx) {
          menu.view_refresh = None;
        }
        self.refresh_menu(idx);
      }
      Task::Refocus { node, scope } => self.refocus(node, scope),
      Task::CheckActivation { section, item } => self.check_activation(section, item),
      Task::RestoreFocus => {
        self.restore_task = None;
        self.restore_focus();
      }
      Task::PollVisibility => self.poll_visibility(),
    }
  }

  fn refocus(&mut self, node: NodeId, scope: NodeId) {
    if !self.doc.is_connected(node) || !self.doc.is_visible(node) {
      return;
    }
    let moved_on = self
      .doc
      .active_element()
      .is_some_and(|a| a == node || (self.doc.contains(scope, a) && self.doc.is_rendered(a)));
    if !moved_on {
      self.doc.focus(node);
    }
  }
}
