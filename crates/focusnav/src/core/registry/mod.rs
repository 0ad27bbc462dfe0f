/*!
Registry - state shared by every menu and section of one navigator.

All fields are private. Mutations go through methods that keep the
navigation map sorted and emit events.

## Module Structure

- `mod.rs` - Registry struct, open-menu set, pinned items, event emission
- `nav_map.rs` - Navigation map entries and last-active records per page
*/

mod nav_map;

pub(crate) use nav_map::{LastActive, NavEntry};

use async_broadcast::Sender;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::types::{Event, MenuId, NodeId};

/// Shared navigation state.
pub(crate) struct Registry {
  events_tx: Sender<Event>,

  /// Sorted by `(page, section)`.
  pub(super) entries: Vec<NavEntry>,
  pub(super) last_active: HashMap<u32, LastActive>,

  open_menus: HashSet<MenuId>,
  /// `(item, owning trigger)` for every relocated always-open item.
  pinned: Vec<(NodeId, NodeId)>,
}

impl Registry {
  pub(crate) fn new(events_tx: Sender<Event>) -> Self {
    Self {
      events_tx,
      entries: Vec::new(),
      last_active: HashMap::new(),
      open_menus: HashSet::new(),
      pinned: Vec::new(),
    }
  }

  pub(crate) fn emit(&self, event: Event) {
    if let Err(e) = self.events_tx.try_broadcast(event) {
      if e.is_full() {
        log::error!(
          "Event channel overflow - events are being dropped. \
           Consider increasing EVENT_CHANNEL_CAPACITY or processing events faster."
        );
      }
    }
  }

  // === Open menus ===

  /// Record a menu as open or closed. Emits nothing; callers emit
  /// `MenuOpened`/`MenuClosed` with the trigger attached.
  pub(crate) fn set_menu_open(&mut self, menu: MenuId, open: bool) {
    if open {
      self.open_menus.insert(menu);
    } else {
      self.open_menus.remove(&menu);
    }
  }

  pub(crate) fn any_menu_open(&self) -> bool {
    !self.open_menus.is_empty()
  }

  // === Pinned items ===

  pub(crate) fn pin(&mut self, item: NodeId, trigger: NodeId) {
    if self.pinned.iter().any(|(i, _)| *i == item) {
      return;
    }
    self.pinned.push((item, trigger));
  }

  /// Forget every pinned item owned by `trigger`.
  pub(crate) fn unpin_trigger(&mut self, trigger: NodeId) {
    self.pinned.retain(|(_, t)| *t != trigger);
  }

  pub(crate) fn pinned(&self) -> &[(NodeId, NodeId)] {
    &self.pinned
  }
}

/// Cheap handle to the shared [`Registry`]. Every menu and section of a
/// navigator holds a clone.
#[derive(Clone)]
pub(crate) struct NavContext {
  state: Arc<RwLock<Registry>>,
}

impl std::fmt::Debug for NavContext {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("NavContext").finish_non_exhaustive()
  }
}

impl NavContext {
  pub(crate) fn new(events_tx: Sender<Event>) -> Self {
    Self {
      state: Arc::new(RwLock::new(Registry::new(events_tx))),
    }
  }

  /// Read state. Never call into the document inside the closure.
  #[inline]
  pub(crate) fn read<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
    f(&self.state.read())
  }

  /// Write state. Never call into the document inside the closure.
  #[inline]
  pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Registry) -> R) -> R {
    f(&mut self.state.write())
  }

  pub(crate) fn emit(&self, event: Event) {
    self.read(|r| r.emit(event));
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn context() -> (NavContext, async_broadcast::Receiver<Event>) {
    let (tx, rx) = async_broadcast::broadcast(16);
    (NavContext::new(tx), rx)
  }

  #[test]
  fn open_menu_set() {
    let (ctx, _rx) = context();
    assert!(!ctx.read(Registry::any_menu_open));
    ctx.write(|r| r.set_menu_open(MenuId(1), true));
    ctx.write(|r| r.set_menu_open(MenuId(2), true));
    ctx.write(|r| r.set_menu_open(MenuId(1), false));
    assert!(ctx.read(|r| r.open_menus.contains(&MenuId(2)) && !r.open_menus.contains(&MenuId(1))));
    assert!(ctx.read(Registry::any_menu_open));
  }

  #[test]
  fn pinning_is_idempotent() {
    let (ctx, _rx) = context();
    ctx.write(|r| {
      r.pin(NodeId(5), NodeId(1));
      r.pin(NodeId(5), NodeId(2));
      r.pin(NodeId(6), NodeId(1));
    });
    assert_eq!(ctx.read(|r| r.pinned().to_vec()), vec![(NodeId(5), NodeId(1)), (NodeId(6), NodeId(1))]);

    ctx.write(|r| r.unpin_trigger(NodeId(1)));
    assert!(ctx.read(|r| r.pinned().is_empty()));
  }

  #[test]
  fn emit_reaches_subscribers() {
    let (ctx, mut rx) = context();
    ctx.emit(Event::ItemActivated { node: NodeId(3) });
    assert_eq!(rx.try_recv().ok(), Some(Event::ItemActivated { node: NodeId(3) }));
  }
}
