/*!
Section operations: registration, traversal across a page's sections and
focus restoration through the navigation map.
*/

use super::Registry;
use super::tasks::SECTION_REFOCUS_DELAY;
use super::{NavEntry, Navigator, Task};
use crate::config::SectionConfig;
use crate::platform::Document;
use crate::section::{Section, Traversal};
use crate::types::{Event, NavError, NavResult, NodeId, SectionId};

impl<D: Document> Navigator<D> {
  // === Public API ===

  /// Register a section root. Its navigation map position comes from
  /// `config.nav_map`.
  pub fn register_section(&mut self, root: NodeId, config: SectionConfig) -> NavResult<SectionId> {
    if self.sections.iter().any(|s| s.root == root) {
      log::warn!("register_section: {root} is already a section");
      return Err(NavError::AlreadyRegistered(root));
    }
    if let Some(missing) = config
      .default_item_id
      .as_deref()
      .filter(|id| self.doc.element_by_id(id).is_none())
    {
      log::warn!("register_section: default item '{missing}' not found, using the first visible item");
    }
    let id = SectionId(self.next_section_id());
    let mut section = Section::new(&mut self.doc, self.ctx.clone(), id, root, config).map_err(|e| {
      log::warn!("register_section: {e}");
      e
    })?;
    section.refresh(&self.doc);
    log::debug!(
      "Registered section {id} (page {}, section {}, {} item(s))",
      section.page(),
      section.number(),
      section.candidates.len()
    );
    self.sections.push(section);
    self.update_entry(self.sections.len() - 1);
    self.ensure_visibility_polling();
    Ok(id)
  }

  /// Move focus to the next or previous section on the same page, wrapping.
  pub fn navigate(&mut self, id: SectionId, direction: Traversal) -> NavResult<()> {
    let idx = self.section_index(id)?;
    self.navigate_at(idx, direction);
    self.settle_focus();
    Ok(())
  }

  /// Put focus back where the user left it after it fell to the body.
  pub fn restore_focus_on_return(&mut self) {
    self.restore_focus();
    self.settle_focus();
  }

  pub fn section_items(&self, id: SectionId) -> Vec<NodeId> {
    self
      .sections
      .iter()
      .find(|s| s.id == id)
      .map(|s| s.candidates.items().to_vec())
      .unwrap_or_default()
  }

  // === Lookup ===

  pub(crate) fn section_index(&self, id: SectionId) -> NavResult<usize> {
    self
      .sections
      .iter()
      .position(|s| s.id == id)
      .ok_or(NavError::SectionNotFound(id))
  }

  /// Sections whose root holds `node`, innermost first.
  pub(crate) fn sections_containing(&self, node: NodeId) -> Vec<usize> {
    let mut found: Vec<(usize, usize)> = self
      .sections
      .iter()
      .enumerate()
      .filter(|(_, s)| self.doc.contains(s.root, node))
      .map(|(i, s)| {
        let depth = std::iter::successors(self.doc.parent(s.root), |&n| self.doc.parent(n)).count();
        (i, depth)
      })
      .collect();
    found.sort_by(|a, b| b.1.cmp(&a.1));
    found.into_iter().map(|(i, _)| i).collect()
  }

  // === Navigation map ===

  /// Write the section's entry, pointing at its current focus target.
  fn update_entry(&mut self, idx: usize) {
    let Some(section) = self.sections.get(idx) else {
      return;
    };
    section.write_entry(section.focus_target(&self.doc).unwrap_or(section.root));
  }

  /// Entries of `page` with stale elements swapped for their section root.
  /// Entries whose root is gone or not rendered are skipped.
  fn resolved_entries(&self, page: u32) -> Vec<NavEntry> {
    let doc = &self.doc;
    self.ctx.write(|r| {
      let mut out = Vec::new();
      for mut entry in r.entries_on_page(page) {
        if !doc.is_connected(entry.element) || !doc.is_visible(entry.element) {
          if !doc.is_connected(entry.scope) || !doc.is_rendered(entry.scope) {
            continue;
          }
          entry.element = entry.scope;
          r.set_entry_element(entry.id, entry.scope);
        }
        out.push(entry);
      }
      out
    })
  }

  pub(crate) fn navigate_at(&mut self, idx: usize, direction: Traversal) {
    let Some(section) = self.sections.get_mut(idx) else {
      return;
    };
    section.direction = direction;
    let (id, page) = (section.id, section.page());
    if section.entry().is_none() {
      self.update_entry(idx);
    }

    let entries = self.resolved_entries(page);
    let len = entries.len();
    if len <= 1 {
      return;
    }
    let target = match (entries.iter().position(|e| e.id == id), direction) {
      (Some(pos), Traversal::Forward) => (pos + 1) % len,
      (Some(pos), Traversal::Backward) => (pos + len - 1) % len,
      (None, Traversal::Forward) => 0,
      (None, Traversal::Backward) => len - 1,
    };
    let Some(target) = entries.get(target) else {
      return;
    };
    log::debug!(
      "Section {id} -> page {page}, section {} ({:?})",
      target.section,
      direction
    );
    // An empty target keeps going the same way.
    if let Some(next) = self.sections.iter_mut().find(|s| s.id == target.id) {
      next.direction = direction;
    }
    self
      .ctx
      .write(|r| r.set_last_active(page, target.section, target.element));
    self.doc.focus(target.element);
  }

  /// Focus landed on a section root: hand it to the section's entry item,
  /// or pass it on when the section has nothing to focus.
  pub(crate) fn enter_section(&mut self, idx: usize) {
    let Some(section) = self.sections.get_mut(idx) else {
      return;
    };
    section.refresh(&self.doc);
    let (id, root, page, number) = (section.id, section.root, section.page(), section.number());
    let Some(node) = section.focus_target(&self.doc) else {
      log::debug!("Section {id} has nothing to focus, passing on");
      let direction = section.direction;
      self.navigate_at(idx, direction);
      return;
    };

    self.doc.focus(node);
    self
      .scheduler
      .schedule(SECTION_REFOCUS_DELAY, Task::Refocus { node, scope: root });
    section.write_entry(node);
    self.ctx.emit(Event::SectionEntered {
      section: id,
      page,
      index: number,
      node,
    });
  }

  /// With focus on the body, walk pages from the highest down and focus the
  /// remembered element of the first page showing something on top.
  pub(crate) fn restore_focus(&mut self) {
    if self.doc.active_element().is_some() {
      return;
    }
    let Some(max_page) = self.ctx.read(Registry::max_page) else {
      return;
    };
    for page in (1..=max_page).rev() {
      let entries: Vec<NavEntry> = self
        .resolved_entries(page)
        .into_iter()
        .filter(|e| self.doc.is_visible(e.element))
        .collect();
      let Some(first) = entries.first() else {
        continue;
      };
      if !self.doc.is_on_top(first.element) {
        continue;
      }

      let remembered = self.ctx.read(|r| r.last_active(page)).and_then(|last| {
        let entry = entries.iter().find(|e| e.section == last.section)?;
        let alive = self.doc.is_connected(last.element) && self.doc.is_visible(last.element);
        Some(if alive { last.element } else { entry.element })
      });
      let target = remembered.unwrap_or(first.element);
      log::debug!("Restoring focus to {target} on page {page}");
      self.doc.focus(target);
      return;
    }
  }

  /// After an activation in a section: if focus did not survive, fall back
  /// to the item, the section's first item, then the first section on this
  /// or a lower page that shows something on top.
  pub(crate) fn check_activation(&mut self, id: SectionId, item: NodeId) {
    if self
      .doc
      .active_element()
      .is_some_and(|a| self.doc.is_on_top(a))
    {
      return;
    }
    if self.reachable(item) {
      self.doc.focus(item);
      return;
    }
    let Ok(idx) = self.section_index(id) else {
      return;
    };
    let Some(section) = self.sections.get_mut(idx) else {
      return;
    };
    section.refresh(&self.doc);
    let (page, first) = (section.page(), section.candidates.first());
    if let Some(first) = first.filter(|&n| self.reachable(n)) {
      self.doc.focus(first);
      return;
    }
    for p in (1..=page).rev() {
      if let Some(entry) = self
        .resolved_entries(p)
        .into_iter()
        .find(|e| self.reachable(e.element))
      {
        log::debug!("Activation lost focus; falling back to page {p}, section {}", entry.section);
        self.doc.focus(entry.element);
        return;
      }
    }
  }

  fn reachable(&self, node: NodeId) -> bool {
    self.doc.is_connected(node) && self.doc.is_visible(node) && self.doc.is_on_top(node)
  }
}
