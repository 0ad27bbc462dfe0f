/*!
Page sections.

A section is a root element whose `data-item="navigationitem"` descendants
are navigated with the arrow keys. Sections are numbered within a page; the
section key (Tab) moves between them through the shared navigation map.
*/

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::a11y::{attr, NAVIGATION_ITEM};
use crate::candidates::CandidateSet;
use crate::config::SectionConfig;
use crate::core::{NavContext, NavEntry};
use crate::platform::Document;
use crate::types::{NavError, NavResult, NodeId, SectionId};

/// Direction of section-to-section traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Traversal {
  #[default]
  Forward,
  Backward,
}

#[derive(Debug)]
pub(crate) struct Section {
  pub(crate) id: SectionId,
  pub(crate) root: NodeId,
  pub(crate) config: SectionConfig,
  pub(crate) candidates: CandidateSet,
  /// Last traversal direction; an empty section passes focus on this way.
  pub(crate) direction: Traversal,
  /// Visibility at the last poll.
  pub(crate) was_visible: bool,
  ctx: NavContext,
}

fn is_navigation_item<D: Document>(doc: &D, node: NodeId) -> bool {
  doc.attribute_is(node, attr::ITEM, NAVIGATION_ITEM)
}

fn is_section_root<D: Document>(doc: &D, node: NodeId) -> bool {
  doc.has_attribute(node, attr::NAV_SCOPE)
}

impl Section {
  pub(crate) fn new<D: Document>(
    doc: &mut D,
    ctx: NavContext,
    id: SectionId,
    root: NodeId,
    config: SectionConfig,
  ) -> NavResult<Self> {
    config.nav_map.validate()?;
    if !doc.is_connected(root) {
      return Err(NavError::ElementNotFound(root));
    }
    let map = config.nav_map;
    if ctx.read(|r| r.entry_at(map.page, map.section)).is_some() {
      return Err(NavError::NavMapTaken {
        page: map.page,
        section: map.section,
      });
    }
    doc.set_attribute(root, attr::NAV_SCOPE, &format!("{}-{}", map.page, map.section));
    if !doc.has_attribute(root, attr::TABINDEX) {
      doc.set_attribute(root, attr::TABINDEX, "-1");
    }
    Ok(Self {
      id,
      root,
      config,
      candidates: CandidateSet::new(),
      direction: Traversal::Forward,
      was_visible: false,
      ctx,
    })
  }

  pub(crate) const fn page(&self) -> u32 {
    self.config.nav_map.page
  }

  pub(crate) const fn number(&self) -> u32 {
    self.config.nav_map.section
  }

  // === Navigation map ===

  pub(crate) fn entry(&self) -> Option<NavEntry> {
    self.ctx.read(|r| r.entry(self.id))
  }

  /// Point the section's map entry at `element`, creating it if needed.
  pub(crate) fn write_entry(&self, element: NodeId) {
    let entry = NavEntry {
      page: self.page(),
      section: self.number(),
      id: self.id,
      element,
      scope: self.root,
    };
    self.ctx.write(|r| r.upsert_entry(entry));
  }

  /// Remember `node` as the page's last focused element and as this
  /// section's entry point.
  pub(crate) fn record_focus(&self, node: NodeId) {
    let (id, page, number) = (self.id, self.page(), self.number());
    self.ctx.write(|r| {
      r.set_last_active(page, number, node);
      r.set_entry_element(id, node);
    });
  }

  pub(crate) fn forget(&self) {
    let id = self.id;
    self.ctx.write(|r| r.remove_entry(id));
  }

  pub(crate) fn refresh<D: Document>(&mut self, doc: &D) {
    self
      .candidates
      .refresh(doc, self.root, is_navigation_item, is_section_root);
  }

  pub(crate) fn is_ignored_input<D: Document>(&self, doc: &D, node: NodeId) -> bool {
    doc
      .input_type(node)
      .is_some_and(|t| self.config.ignored_input_types.contains(&t))
  }

  /// Element scrolled by the page keys: the configured container, else the root.
  pub(crate) fn scroll_container<D: Document>(&self, doc: &D) -> NodeId {
    self
      .config
      .scrollable_container_id
      .as_deref()
      .and_then(|id| doc.element_by_id(id))
      .unwrap_or(self.root)
  }

  fn viewport_bottom<D: Document>(&self, doc: &D) -> f64 {
    self
      .config
      .scrollable_container_id
      .as_deref()
      .and_then(|id| doc.element_by_id(id))
      .map_or_else(|| doc.viewport_height(), |c| doc.bounds(c).bottom())
  }

  /// Topmost candidate lying entirely inside the viewport (or the scroll
  /// container). First in candidate order wins ties.
  pub(crate) fn first_visible_in_viewport<D: Document>(&self, doc: &D) -> Option<NodeId> {
    let bottom = self.viewport_bottom(doc);
    let mut best: Option<(NodeId, f64)> = None;
    for &node in self.candidates.items() {
      let b = doc.bounds(node);
      if b.y < 0.0 || b.bottom() > bottom {
        continue;
      }
      match best {
        Some((_, top)) if b.y >= top => {}
        _ => best = Some((node, b.y)),
      }
    }
    best.map(|(node, _)| node)
  }

  /// Where focus goes on entering the section: the default item if visible,
  /// else the first item in view, else the first candidate if visible.
  pub(crate) fn focus_target<D: Document>(&self, doc: &D) -> Option<NodeId> {
    if let Some(default) = self
      .config
      .default_item_id
      .as_deref()
      .and_then(|id| doc.element_by_id(id))
      .filter(|&n| doc.is_visible(n))
    {
      return Some(default);
    }
    self
      .first_visible_in_viewport(doc)
      .or_else(|| self.candidates.first().filter(|&n| doc.is_visible(n)))
  }

  /// PageUp/PageDown/Home/End. Only when focus is locked or a scroll
  /// container is configured. Returns whether the key was used.
  pub(crate) fn scroll<D: Document>(&self, doc: &mut D, key: &str) -> bool {
    if !self.config.lock_focus && self.config.scrollable_container_id.is_none() {
      return false;
    }
    let container = self.scroll_container(doc);
    let metrics = doc.scroll_metrics(container);
    let top = match key {
      "PageUp" => metrics.scroll_top - metrics.client_height,
      "PageDown" => metrics.scroll_top + metrics.client_height,
      "Home" => 0.0,
      "End" => metrics.scroll_height,
      _ => return false,
    };
    doc.set_scroll_top(container, top);
    true
  }
}
