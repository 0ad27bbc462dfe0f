/*! Outbound events describing focus and menu state changes. */

use super::{MenuId, NodeId, SectionId};
use serde::Serialize;
use ts_rs::TS;

/// How a search query was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum SearchMode {
  /// Rolling buffer of typed characters.
  Direct,
  /// Value of an attached search field.
  TwoLevel,
  /// Digits entered on a numpad.
  Numpad,
}

/// Events emitted when navigation state changes.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(tag = "event", content = "data")]
#[ts(export)]
pub enum Event {
  // Focus settled on a new element (None = document root)
  #[serde(rename = "focus:changed")]
  FocusChanged {
    node: Option<NodeId>,
    previous: Option<NodeId>,
  },

  // Menu lifecycle
  #[serde(rename = "menu:opened")]
  MenuOpened { menu: MenuId, trigger: NodeId },
  #[serde(rename = "menu:closed")]
  MenuClosed { menu: MenuId, trigger: NodeId },

  // An item was clicked on the user's behalf
  #[serde(rename = "item:activated")]
  ItemActivated { node: NodeId },

  // Search
  #[serde(rename = "search:matched")]
  SearchMatched {
    menu: MenuId,
    mode: SearchMode,
    query: String,
    node: NodeId,
  },
  #[serde(rename = "search:results")]
  SearchResults {
    menu: MenuId,
    query: String,
    results: Vec<NodeId>,
  },
  #[serde(rename = "search:cleared")]
  SearchCleared { menu: MenuId },

  // Section traversal
  #[serde(rename = "section:entered")]
  SectionEntered {
    section: SectionId,
    page: u32,
    index: u32,
    node: NodeId,
  },
}
