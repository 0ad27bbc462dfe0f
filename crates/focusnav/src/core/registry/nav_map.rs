/*!
Navigation map operations for the Registry.

One entry per registered section, keyed by `(page, section)`. The entry's
`element` is where focus goes when traversal lands on that section; `scope`
is the section root it falls back to. Entries are kept sorted so a page's
sections are always visited in order.
*/

use super::Registry;
use crate::types::{NodeId, SectionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NavEntry {
  pub(crate) page: u32,
  pub(crate) section: u32,
  pub(crate) id: SectionId,
  pub(crate) element: NodeId,
  pub(crate) scope: NodeId,
}

/// Last element focused on a page, and the section it was in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LastActive {
  pub(crate) section: u32,
  pub(crate) element: NodeId,
}

impl Registry {
  /// Insert or update the entry for `(entry.page, entry.section)`.
  pub(crate) fn upsert_entry(&mut self, entry: NavEntry) {
    if let Some(existing) = self
      .entries
      .iter_mut()
      .find(|e| e.page == entry.page && e.section == entry.section)
    {
      if existing.id != entry.id {
        log::warn!(
          "Section {} replaces {} at page {}, section {}",
          entry.id,
          existing.id,
          entry.page,
          entry.section
        );
      }
      *existing = entry;
      return;
    }
    self.entries.push(entry);
    self.entries.sort_by_key(|e| (e.page, e.section));
  }

  pub(crate) fn remove_entry(&mut self, id: SectionId) {
    self.entries.retain(|e| e.id != id);
  }

  pub(crate) fn entry(&self, id: SectionId) -> Option<NavEntry> {
    self.entries.iter().find(|e| e.id == id).copied()
  }

  pub(crate) fn entry_at(&self, page: u32, section: u32) -> Option<NavEntry> {
    self
      .entries
      .iter()
      .find(|e| e.page == page && e.section == section)
      .copied()
  }

  /// Entries of one page, in section order.
  pub(crate) fn entries_on_page(&self, page: u32) -> Vec<NavEntry> {
    self.entries.iter().filter(|e| e.page == page).copied().collect()
  }

  pub(crate) fn set_entry_element(&mut self, id: SectionId, element: NodeId) {
    if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
      entry.element = element;
    }
  }

  pub(crate) fn max_page(&self) -> Option<u32> {
    self.entries.iter().map(|e| e.page).max()
  }

  pub(crate) fn set_last_active(&mut self, page: u32, section: u32, element: NodeId) {
    self.last_active.insert(page, LastActive { section, element });
  }

  pub(crate) fn last_active(&self, page: u32) -> Option<LastActive> {
    self.last_active.get(&page).copied()
  }
}
