/*!
In-memory document.

A small element tree with attributes, text, explicit layout boxes and the
style bits that decide visibility. Used by headless hosts and by every test
in this crate.

```ignore
let mut doc = MemoryDocument::new();
let body = doc.body();
let button = doc.append(body, NodeSpec::new("button").text("Menu").bounds(0.0, 0.0, 80.0, 24.0));
doc.focus(button);
```

Layout is whatever the builder says: boxes are never computed, only reported.
An element that is `display: none`, or sits under one, reports zero bounds.
*/

mod tree;

use std::collections::{BTreeMap, HashMap};

use crate::types::{Bounds, NodeId, Point};

use super::{ComputedStyle, Document, ScrollMetrics};
use tree::NodeTree;

const DEFAULT_VIEWPORT: Bounds = Bounds::new(0.0, 0.0, 1280.0, 800.0);

#[derive(Debug, Clone, Default)]
struct NodeData {
  tag: String,
  attributes: BTreeMap<String, String>,
  text: String,
  value: String,
  bounds: Bounds,
  hidden: bool,
  visibility_hidden: bool,
  opacity: f64,
  scroll: ScrollMetrics,
}

/// Description of an element to insert.
#[derive(Debug, Clone)]
#[must_use]
pub struct NodeSpec {
  data: NodeData,
}

impl NodeSpec {
  pub fn new(tag: &str) -> Self {
    Self {
      data: NodeData {
        tag: tag.to_lowercase(),
        opacity: 1.0,
        ..NodeData::default()
      },
    }
  }

  pub fn attr(mut self, name: &str, value: &str) -> Self {
    self
      .data
      .attributes
      .insert(name.to_string(), value.to_string());
    self
  }

  pub fn id(self, id: &str) -> Self {
    self.attr("id", id)
  }

  pub fn role(self, role: &str) -> Self {
    self.attr("role", role)
  }

  /// Own text, placed before any child text.
  pub fn text(mut self, text: &str) -> Self {
    self.data.text = text.to_string();
    self
  }

  pub fn bounds(mut self, x: f64, y: f64, w: f64, h: f64) -> Self {
    self.data.bounds = Bounds::new(x, y, w, h);
    self
  }

  pub fn hidden(mut self) -> Self {
    self.data.hidden = true;
    self
  }

  pub fn invisible(mut self) -> Self {
    self.data.visibility_hidden = true;
    self
  }

  pub fn opacity(mut self, opacity: f64) -> Self {
    self.data.opacity = opacity;
    self
  }

  pub fn scrollable(mut self, scroll_height: f64, client_height: f64) -> Self {
    self.data.scroll = ScrollMetrics {
      scroll_top: 0.0,
      scroll_height,
      client_height,
    };
    self
  }
}

/// Element tree held in memory. See the module docs.
#[derive(Debug)]
pub struct MemoryDocument {
  nodes: HashMap<NodeId, NodeData>,
  tree: NodeTree,
  body: NodeId,
  next_id: u32,
  active: Option<NodeId>,
  viewport: Bounds,
  clicks: Vec<NodeId>,
}

impl Default for MemoryDocument {
  fn default() -> Self {
    Self::new()
  }
}

impl MemoryDocument {
  pub fn new() -> Self {
    let body = NodeId(0);
    let mut nodes = HashMap::new();
    nodes.insert(
      body,
      NodeData {
        tag: "body".to_string(),
        bounds: DEFAULT_VIEWPORT,
        opacity: 1.0,
        ..NodeData::default()
      },
    );
    Self {
      nodes,
      tree: NodeTree::new(),
      body,
      next_id: 1,
      active: None,
      viewport: DEFAULT_VIEWPORT,
      clicks: Vec::new(),
    }
  }

  /// Create an element from `spec` and append it to `parent`.
  pub fn append(&mut self, parent: NodeId, spec: NodeSpec) -> NodeId {
    let id = self.alloc(spec.data);
    self.tree.insert_before(parent, id, None);
    id
  }

  /// Detach an element (and its subtree) from the document.
  pub fn remove(&mut self, node: NodeId) {
    self.tree.detach(node);
    if self.active.is_some_and(|a| !self.is_connected(a)) {
      self.active = None;
    }
  }

  pub fn set_bounds(&mut self, node: NodeId, bounds: Bounds) {
    if let Some(n) = self.nodes.get_mut(&node) {
      n.bounds = bounds;
    }
  }

  /// Move focus to the body, as a browser does when the focused element goes away.
  pub fn blur(&mut self) {
    self.active = None;
  }

  /// Every element clicked through [`Document::click`], oldest first.
  pub fn clicks(&self) -> &[NodeId] {
    &self.clicks
  }

  pub fn clear_clicks(&mut self) {
    self.clicks.clear();
  }

  fn alloc(&mut self, data: NodeData) -> NodeId {
    let id = NodeId(self.next_id);
    self.next_id += 1;
    self.nodes.insert(id, data);
    id
  }

  /// `display: none` on the node or an ancestor.
  fn display_none(&self, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
      if self.nodes.get(&n).is_some_and(|d| d.hidden) {
        return true;
      }
      current = self.tree.parent(n);
    }
    false
  }

  /// `visibility` inherits.
  fn visibility_hidden(&self, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
      if self.nodes.get(&n).is_some_and(|d| d.visibility_hidden) {
        return true;
      }
      current = self.tree.parent(n);
    }
    false
  }

  fn preorder(&self) -> Vec<NodeId> {
    let mut out = vec![self.body];
    out.extend(self.descendants(self.body));
    out
  }
}

impl Document for MemoryDocument {
  fn body(&self) -> NodeId {
    self.body
  }

  fn parent(&self, node: NodeId) -> Option<NodeId> {
    self.tree.parent(node)
  }

  fn children(&self, node: NodeId) -> Vec<NodeId> {
    self.tree.children(node).to_vec()
  }

  fn is_connected(&self, node: NodeId) -> bool {
    node == self.body || self.tree.is_ancestor(self.body, node)
  }

  fn element_by_id(&self, id: &str) -> Option<NodeId> {
    self
      .preorder()
      .into_iter()
      .find(|n| self.attribute_is(*n, "id", id))
  }

  fn create_element(&mut self, tag: &str) -> NodeId {
    self.alloc(NodeSpec::new(tag).data)
  }

  fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>) {
    self.tree.insert_before(parent, node, reference);
  }

  fn tag_name(&self, node: NodeId) -> String {
    self
      .nodes
      .get(&node)
      .map(|n| n.tag.clone())
      .unwrap_or_default()
  }

  fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
    self.nodes.get(&node)?.attributes.get(name).cloned()
  }

  fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
    if let Some(n) = self.nodes.get_mut(&node) {
      n.attributes.insert(name.to_string(), value.to_string());
    }
  }

  fn remove_attribute(&mut self, node: NodeId, name: &str) {
    if let Some(n) = self.nodes.get_mut(&node) {
      n.attributes.remove(name);
    }
  }

  fn text_content(&self, node: NodeId) -> String {
    let mut text = self
      .nodes
      .get(&node)
      .map(|n| n.text.clone())
      .unwrap_or_default();
    for child in self.tree.children(node) {
      text.push_str(&self.text_content(*child));
    }
    text
  }

  fn set_text_content(&mut self, node: NodeId, text: &str) {
    self.tree.clear_children(node);
    if let Some(n) = self.nodes.get_mut(&node) {
      n.text = text.to_string();
    }
  }

  fn value(&self, node: NodeId) -> String {
    self
      .nodes
      .get(&node)
      .map(|n| n.value.clone())
      .unwrap_or_default()
  }

  fn set_value(&mut self, node: NodeId, value: &str) {
    if let Some(n) = self.nodes.get_mut(&node) {
      n.value = value.to_string();
    }
  }

  fn bounds(&self, node: NodeId) -> Bounds {
    if !self.is_connected(node) || self.display_none(node) {
      return Bounds::ZERO;
    }
    self.nodes.get(&node).map_or(Bounds::ZERO, |n| n.bounds)
  }

  fn style(&self, node: NodeId) -> ComputedStyle {
    ComputedStyle {
      display_none: self.display_none(node),
      visibility_hidden: self.visibility_hidden(node),
      opacity: self.nodes.get(&node).map_or(1.0, |n| n.opacity),
    }
  }

  fn is_hidden(&self, node: NodeId) -> bool {
    self.nodes.get(&node).is_some_and(|n| n.hidden)
  }

  fn set_hidden(&mut self, node: NodeId, hidden: bool) {
    if let Some(n) = self.nodes.get_mut(&node) {
      n.hidden = hidden;
    }
  }

  fn element_at_point(&self, point: Point) -> Option<NodeId> {
    // Later in document order paints on top.
    self
      .preorder()
      .into_iter()
      .rev()
      .find(|&n| self.is_visible(n) && self.bounds(n).contains(point))
  }

  fn viewport_height(&self) -> f64 {
    self.viewport.h
  }

  fn scroll_metrics(&self, node: NodeId) -> ScrollMetrics {
    self.nodes.get(&node).map(|n| n.scroll).unwrap_or_default()
  }

  fn set_scroll_top(&mut self, node: NodeId, top: f64) {
    if let Some(n) = self.nodes.get_mut(&node) {
      let max = (n.scroll.scroll_height - n.scroll.client_height).max(0.0);
      n.scroll.scroll_top = top.clamp(0.0, max);
    }
  }

  fn active_element(&self) -> Option<NodeId> {
    self.active
  }

  fn focus(&mut self, node: NodeId) {
    if node == self.body {
      self.active = None;
      return;
    }
    if !self.is_connected(node) || !self.style(node).is_rendered() {
      log::debug!("focus: {node} is not focusable (detached or not rendered)");
      return;
    }
    self.active = Some(node);
  }

  fn click(&mut self, node: NodeId) {
    self.clicks.push(node);
  }

  fn scroll_into_view(&mut self, _node: NodeId) {}
}
