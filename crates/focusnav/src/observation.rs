/*!
Watcher hooks and scope teardown.

The engine does not watch the document itself. A host with a structural
watcher (a mutation observer) reports edits with
[`Navigator::notify_structure_changed`]; one with a visibility watcher reports
sections coming into view with [`Navigator::notify_scope_visible`]. Without
the latter, sections are polled (see `polling.rs`). Without the former, every
keystroke refreshes the scope it lands in.

```ignore
let nav = NavigatorBuilder::new().structural_watcher(true).build(doc);
// mutation observer callback
nav.notify_structure_changed(mutation_root);
```
*/

use crate::a11y::attr;
use crate::core::Navigator;
use crate::platform::Document;
use crate::types::{MenuId, NavResult, NodeId, SectionId};

impl<D: Document> Navigator<D> {
  /// Descendants of `root` were added or removed. Refreshes every menu and
  /// section overlapping that subtree.
  pub fn notify_structure_changed(&mut self, root: NodeId) {
    let doc = &self.doc;
    let overlaps = |scope: NodeId| doc.contains(root, scope) || doc.contains(scope, root);

    let menus: Vec<usize> = self
      .menus
      .iter()
      .enumerate()
      .filter(|(_, m)| overlaps(m.container))
      .map(|(i, _)| i)
      .collect();
    let sections: Vec<usize> = self
      .sections
      .iter()
      .enumerate()
      .filter(|(_, s)| overlaps(s.root))
      .map(|(i, _)| i)
      .collect();
    log::debug!(
      "Structure changed under {root}: {} menu(s), {} section(s)",
      menus.len(),
      sections.len()
    );

    for idx in menus {
      self.refresh_menu(idx);
    }
    for idx in sections {
      if let Some(section) = self.sections.get_mut(idx) {
        section.refresh(&self.doc);
      }
    }
    self.settle_focus();
  }

  /// A section root scrolled into view. Sections that do not observe
  /// visibility ignore this.
  pub fn notify_scope_visible(&mut self, id: SectionId) {
    let idx = match self.section_index(id) {
      Ok(idx) => idx,
      Err(e) => {
        log::warn!("notify_scope_visible: {e}");
        return;
      }
    };
    if !self
      .sections
      .get(idx)
      .is_some_and(|s| s.config.observes_visibility())
    {
      return;
    }
    self.enter_section(idx);
    self.settle_focus();
  }

  /// Forget a menu. It is closed first and its always-open items go back
  /// into the menu.
  pub fn unregister_menu(&mut self, id: MenuId) -> NavResult<()> {
    let idx = self.menu_index(id)?;
    self.close_at(idx, false);
    if idx >= self.menus.len() {
      return Ok(());
    }
    let mut menu = self.menus.remove(idx);
    for task in [menu.buffer.decay.take(), menu.view_refresh.take()].into_iter().flatten() {
      self.scheduler.cancel(task);
    }
    menu.release(&mut self.doc);
    log::debug!("Unregistered menu {id}");
    self.settle_focus();
    Ok(())
  }

  /// Forget a section and drop its navigation map entry.
  pub fn unregister_section(&mut self, id: SectionId) -> NavResult<()> {
    let idx = self.section_index(id)?;
    if idx < self.sections.len() {
      let section = self.sections.remove(idx);
      self.doc.remove_attribute(section.root, attr::NAV_SCOPE);
      section.forget();
    }
    log::debug!("Unregistered section {id}");
    Ok(())
  }
}
