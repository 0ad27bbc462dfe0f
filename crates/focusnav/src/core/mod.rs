/*!
Core navigator - owns the document, every registered scope and the event
channel.

# Module Structure

- `mod.rs` - Navigator struct, builder, events, focus settling
- `registry/` - shared state (navigation map, open menus, pinned items)
- `dispatch.rs` - keydown routing
- `clicks.rs` - click routing
- `menus.rs` - menu registration, open/close, activation, search
- `sections.rs` - section registration, traversal, focus restore
- `tasks.rs` - deferred work run by [`Navigator::advance`]

# Example

```ignore
use focusnav::{KeyEvent, MemoryDocument, MenuConfig, NavigatorBuilder};

let mut nav = NavigatorBuilder::new().structural_watcher(true).build(MemoryDocument::new());
let menu = nav.register_menu(trigger, MenuConfig::default())?;

let outcome = nav.handle_keydown(&KeyEvent::new("ArrowDown"));
nav.advance(std::time::Duration::from_millis(16));

let mut events = nav.subscribe();
while let Ok(event) = events.try_recv() {
    // handle event
}
```
*/

mod clicks;
mod dispatch;
mod menus;
mod registry;
mod sections;
mod tasks;

#[cfg(test)]
mod scenarios;

pub(crate) use registry::{NavContext, NavEntry, Registry};
pub(crate) use tasks::Task;

use async_broadcast::InactiveReceiver;
use std::time::Duration;

use crate::a11y::attr;
use crate::config::NavigatorConfig;
use crate::menu::Menu;
use crate::platform::Document;
use crate::scheduler::Scheduler;
use crate::section::Section;
use crate::types::{Event, NodeId, TaskId};

const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Keyboard focus engine over a host [`Document`].
///
/// Single-threaded: the host forwards input through the `handle_*` methods
/// and drives deferred work with [`advance`](Self::advance).
pub struct Navigator<D: Document> {
  pub(crate) doc: D,
  pub(crate) ctx: NavContext,
  events_keepalive: InactiveReceiver<Event>,
  pub(crate) scheduler: Scheduler<Task>,
  pub(crate) config: NavigatorConfig,

  pub(crate) menus: Vec<Menu>,
  pub(crate) sections: Vec<Section>,
  next_menu_id: u32,
  next_section_id: u32,

  /// Focus as of the last settle, for `FocusChanged`.
  last_focus: Option<NodeId>,
  pub(crate) poll_task: Option<TaskId>,
  pub(crate) restore_task: Option<TaskId>,
}

impl<D: Document> std::fmt::Debug for Navigator<D> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Navigator")
      .field("menus", &self.menus.len())
      .field("sections", &self.sections.len())
      .field("now", &self.scheduler.now())
      .finish_non_exhaustive()
  }
}

/// Builder for configuring a Navigator.
///
/// # Example
///
/// ```ignore
/// let nav = NavigatorBuilder::new()
///     .structural_watcher(true)
///     .visibility_watcher(true)
///     .build(doc);
/// ```
#[derive(Debug, Default, Clone, Copy)]
#[must_use = "Builder does nothing until .build() is called"]
pub struct NavigatorBuilder {
  config: NavigatorConfig,
}

impl NavigatorBuilder {
  /// Builder with default options. The document type is fixed by
  /// [`NavigatorBuilder::build`].
  pub fn new() -> Self {
    Self::default()
  }

  /// The host will call [`Navigator::notify_structure_changed`]. Default: false.
  pub const fn structural_watcher(mut self, enabled: bool) -> Self {
    self.config.structural_watcher = enabled;
    self
  }

  /// The host will call [`Navigator::notify_scope_visible`]. Default: false.
  pub const fn visibility_watcher(mut self, enabled: bool) -> Self {
    self.config.visibility_watcher = enabled;
    self
  }

  /// Visibility polling interval without a visibility watcher. Default: 250ms.
  pub const fn poll_interval_ms(mut self, ms: u64) -> Self {
    self.config.poll_interval_ms = ms;
    self
  }

  pub const fn config(mut self, config: NavigatorConfig) -> Self {
    self.config = config;
    self
  }

  pub fn build<D: Document>(self, doc: D) -> Navigator<D> {
    Navigator::create_with_config(doc, self.config)
  }
}

impl<D: Document> Navigator<D> {
  /// Navigator with default options.
  pub fn new(doc: D) -> Self {
    NavigatorBuilder::new().build(doc)
  }

  fn create_with_config(doc: D, config: NavigatorConfig) -> Self {
    let (mut tx, rx) = async_broadcast::broadcast(EVENT_CHANNEL_CAPACITY);
    tx.set_overflow(true); // Drop oldest messages when full

    let last_focus = doc.active_element();
    Self {
      doc,
      ctx: NavContext::new(tx),
      events_keepalive: rx.deactivate(),
      scheduler: Scheduler::new(),
      config,
      menus: Vec::new(),
      sections: Vec::new(),
      next_menu_id: 0,
      next_section_id: 0,
      last_focus,
      poll_task: None,
      restore_task: None,
    }
  }

  /// Subscribe to events from this navigator.
  pub fn subscribe(&self) -> async_broadcast::Receiver<Event> {
    self.events_keepalive.activate_cloned()
  }

  pub fn document(&self) -> &D {
    &self.doc
  }

  /// Mutable access for hosts that edit the document directly. Report the
  /// edit with [`notify_structure_changed`](Self::notify_structure_changed)
  /// when a structural watcher is configured.
  pub fn document_mut(&mut self) -> &mut D {
    &mut self.doc
  }

  pub const fn config(&self) -> &NavigatorConfig {
    &self.config
  }

  /// Virtual time: the sum of every [`advance`](Self::advance).
  pub fn now(&self) -> Duration {
    self.scheduler.now()
  }

  /// Number of deferred tasks not yet run.
  pub fn pending_tasks(&self) -> usize {
    self.scheduler.len()
  }

  /// Run every task due within `elapsed` of virtual time, in due order.
  pub fn advance(&mut self, elapsed: Duration) {
    let until = self.scheduler.now().saturating_add(elapsed);
    while let Some((_, task)) = self.scheduler.pop_due(until) {
      self.run_task(task);
      self.settle_focus();
    }
    self.scheduler.set_now(until);
  }

  pub(crate) fn next_menu_id(&mut self) -> u32 {
    let id = self.next_menu_id;
    self.next_menu_id += 1;
    id
  }

  pub(crate) fn next_section_id(&mut self) -> u32 {
    let id = self.next_section_id;
    self.next_section_id += 1;
    id
  }

  /// Follow up on a focus change: a focused section root hands focus to its
  /// entry item, and focus inside a scope is recorded for later restores.
  /// Emits `FocusChanged` for every element focus passes through.
  pub(crate) fn settle_focus(&mut self) {
    // Empty sections forward to their neighbours; bound the chain.
    let mut hops = self.sections.len() + 1;
    loop {
      let active = self.doc.active_element();
      if active == self.last_focus {
        return;
      }
      let previous = std::mem::replace(&mut self.last_focus, active);
      self.ctx.emit(Event::FocusChanged {
        node: active,
        previous,
      });
      let Some(node) = active else {
        return;
      };

      if let Some(idx) = self.sections.iter().position(|s| s.root == node) {
        if hops > 0 {
          hops -= 1;
          self.enter_section(idx);
          continue;
        }
        log::warn!("Focus bounced between empty sections; leaving it on {node}");
      }
      self.record_focus(node);
      return;
    }
  }

  fn record_focus(&mut self, node: NodeId) {
    if let Some(menu) = self
      .menus
      .iter_mut()
      .find(|m| m.is_open() && m.candidates.contains(node))
    {
      menu.last_active = Some(node);
    }

    let doc = &self.doc;
    let Some(root) = doc.closest(node, |d, n| d.has_attribute(n, attr::NAV_SCOPE)) else {
      return;
    };
    let Some(section) = self.sections.iter().find(|s| s.root == root) else {
      return;
    };
    section.record_focus(node);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::{MemoryDocument, NodeSpec};

  #[test]
  fn builder_sets_config() {
    let nav = NavigatorBuilder::new()
      .structural_watcher(true)
      .poll_interval_ms(100)
      .build(MemoryDocument::new());
    assert!(nav.config().structural_watcher);
    assert!(!nav.config().visibility_watcher);
    assert_eq!(nav.config().poll_interval_ms, 100);
  }

  #[test]
  fn settle_emits_focus_changes_once() {
    let mut nav = Navigator::new(MemoryDocument::new());
    let mut events = nav.subscribe();
    let body = nav.document().body();
    let button = nav
      .document_mut()
      .append(body, NodeSpec::new("button").bounds(0.0, 0.0, 10.0, 10.0));

    nav.document_mut().focus(button);
    nav.handle_focus(button);
    nav.handle_focus(button);

    assert_eq!(
      events.try_recv().ok(),
      Some(Event::FocusChanged {
        node: Some(button),
        previous: None
      })
    );
    assert!(events.try_recv().is_err(), "no duplicate event");
  }

  #[test]
  fn advance_moves_virtual_clock() {
    let mut nav = Navigator::new(MemoryDocument::new());
    nav.advance(Duration::from_millis(40));
    nav.advance(Duration::from_millis(2));
    assert_eq!(nav.now(), Duration::from_millis(42));
    assert_eq!(nav.pending_tasks(), 0);
  }
}
