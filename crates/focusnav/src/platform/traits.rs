/*!
Document abstraction.

The engine never touches a real rendering tree. Everything it needs from the
host (tree walks, attributes, geometry, computed visibility, focus and clicks)
goes through [`Document`]. A browser host implements it over the DOM; tests and
headless hosts use [`MemoryDocument`](super::MemoryDocument).
*/

use crate::a11y::{attr, Role};
use crate::types::{Bounds, NodeId, Point};

/// The parts of computed style that decide visibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComputedStyle {
  /// `display: none` on the element or any ancestor.
  pub display_none: bool,
  pub visibility_hidden: bool,
  pub opacity: f64,
}

impl Default for ComputedStyle {
  fn default() -> Self {
    Self {
      display_none: false,
      visibility_hidden: false,
      opacity: 1.0,
    }
  }
}

impl ComputedStyle {
  pub fn is_rendered(&self) -> bool {
    !self.display_none && !self.visibility_hidden && self.opacity > 0.0
  }
}

/// Scroll position of a scrollable element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
  pub scroll_top: f64,
  pub scroll_height: f64,
  pub client_height: f64,
}

/// Host document capability.
///
/// Required methods are the primitives a host must supply. Provided methods
/// derive everything else and should rarely need overriding.
pub trait Document {
  // === Tree ===

  /// Root element (`document.body`). Focus falling here means "lost".
  fn body(&self) -> NodeId;
  fn parent(&self, node: NodeId) -> Option<NodeId>;
  /// Element children in document order.
  fn children(&self, node: NodeId) -> Vec<NodeId>;
  /// Still attached under [`body`](Self::body)?
  fn is_connected(&self, node: NodeId) -> bool;
  fn element_by_id(&self, id: &str) -> Option<NodeId>;
  fn create_element(&mut self, tag: &str) -> NodeId;
  /// Insert or move `node` under `parent`, before `reference` (append if None).
  fn insert_before(&mut self, parent: NodeId, node: NodeId, reference: Option<NodeId>);

  // === Attributes and content ===

  /// Lowercase tag name.
  fn tag_name(&self, node: NodeId) -> String;
  fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
  fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);
  fn remove_attribute(&mut self, node: NodeId, name: &str);
  /// Concatenated text of the element and its descendants.
  fn text_content(&self, node: NodeId) -> String;
  fn set_text_content(&mut self, node: NodeId, text: &str);
  /// Form control value. Empty for non-inputs.
  fn value(&self, node: NodeId) -> String;
  fn set_value(&mut self, node: NodeId, value: &str);

  // === Geometry and style ===

  /// Border box in viewport coordinates. Zero-sized when not laid out.
  fn bounds(&self, node: NodeId) -> Bounds;
  fn style(&self, node: NodeId) -> ComputedStyle;
  /// Inline `display: none` toggle.
  fn is_hidden(&self, node: NodeId) -> bool;
  fn set_hidden(&mut self, node: NodeId, hidden: bool);
  /// Topmost element painted at `point`.
  fn element_at_point(&self, point: Point) -> Option<NodeId>;
  fn viewport_height(&self) -> f64;
  fn scroll_metrics(&self, node: NodeId) -> ScrollMetrics;
  fn set_scroll_top(&mut self, node: NodeId, top: f64);

  // === Focus and actions ===

  /// Focused element. None when focus is on the body.
  fn active_element(&self) -> Option<NodeId>;
  fn focus(&mut self, node: NodeId);
  /// Dispatch a synthetic click. Hosts must not forward engine-issued clicks
  /// back into [`Navigator::handle_click`](crate::Navigator::handle_click).
  fn click(&mut self, node: NodeId);
  fn scroll_into_view(&mut self, node: NodeId);

  // === Provided ===

  fn has_attribute(&self, node: NodeId, name: &str) -> bool {
    self.attribute(node, name).is_some()
  }

  fn attribute_is(&self, node: NodeId, name: &str, value: &str) -> bool {
    self.attribute(node, name).as_deref() == Some(value)
  }

  fn role(&self, node: NodeId) -> Role {
    self
      .attribute(node, attr::ROLE)
      .map_or(Role::None, |r| Role::parse(&r))
  }

  fn is_disabled(&self, node: NodeId) -> bool {
    self.has_attribute(node, attr::DISABLED)
  }

  /// `<input>` type, defaulting to `text`. None for non-inputs.
  fn input_type(&self, node: NodeId) -> Option<String> {
    if self.tag_name(node) != "input" {
      return None;
    }
    Some(
      self
        .attribute(node, attr::TYPE)
        .map_or_else(|| "text".to_string(), |t| t.to_lowercase()),
    )
  }

  /// Laid out with a non-zero box and not hidden by style.
  fn is_visible(&self, node: NodeId) -> bool {
    !self.bounds(node).is_empty() && self.style(node).is_rendered()
  }

  /// Style-only visibility, for containers that may have no box of their own.
  fn is_rendered(&self, node: NodeId) -> bool {
    self.style(node).is_rendered()
  }

  /// Nothing paints over the element's center.
  fn is_on_top(&self, node: NodeId) -> bool {
    let center = self.bounds(node).center();
    self
      .element_at_point(center)
      .is_some_and(|top| self.contains(node, top))
  }

  fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
    let siblings = self.children(self.parent(node)?);
    let pos = siblings.iter().position(|&n| n == node)?;
    siblings.get(pos + 1).copied()
  }

  fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
    let siblings = self.children(self.parent(node)?);
    let pos = siblings.iter().position(|&n| n == node)?;
    pos.checked_sub(1).and_then(|p| siblings.get(p).copied())
  }

  /// Inclusive: an element contains itself.
  fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(n) = current {
      if n == ancestor {
        return true;
      }
      current = self.parent(n);
    }
    false
  }

  /// Nearest inclusive ancestor matching `pred`.
  fn closest<F>(&self, node: NodeId, pred: F) -> Option<NodeId>
  where
    Self: Sized,
    F: Fn(&Self, NodeId) -> bool,
  {
    let mut current = Some(node);
    while let Some(n) = current {
      if pred(self, n) {
        return Some(n);
      }
      current = self.parent(n);
    }
    None
  }

  /// Descendants in document (pre-)order, excluding `node`.
  fn descendants(&self, node: NodeId) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = self.children(node).into_iter().rev().collect();
    while let Some(n) = stack.pop() {
      out.push(n);
      stack.extend(self.children(n).into_iter().rev());
    }
    out
  }
}
