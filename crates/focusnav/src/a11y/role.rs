/*!
Role-like tags and data attributes the engine reads and writes.

Hosts mark up their documents with these; the engine never invents markup of
its own beyond the ARIA state it maintains (`aria-expanded`, `tabindex`) and
the transient `data-search-result` flag.
*/

#![allow(missing_docs)]

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Attribute names.
pub mod attr {
  pub const ROLE: &str = "role";
  pub const ID: &str = "id";
  pub const TYPE: &str = "type";
  pub const DISABLED: &str = "disabled";
  pub const TABINDEX: &str = "tabindex";

  pub const ARIA_EXPANDED: &str = "aria-expanded";
  pub const ARIA_HASPOPUP: &str = "aria-haspopup";
  pub const ARIA_LABEL: &str = "aria-label";
  pub const ARIA_HIDDEN: &str = "aria-hidden";

  /// Item stays reachable while its menu is closed.
  pub const ALWAYS_OPEN: &str = "data-always-open";
  /// Submenu opens with its parent and ignores outside clicks.
  pub const KEEP_SUBMENU_OPEN: &str = "data-keep-submenu-open";
  /// Text input drives two-level search.
  pub const USE_SEARCH: &str = "data-use-search";
  /// Element hosts numpad buttons.
  pub const USE_NUMPAD: &str = "data-use-numpad";
  /// Numpad button kind, see [`ButtonKind`](super::ButtonKind).
  pub const BUTTON_TYPE: &str = "data-button-type";
  /// `data-item="navigationitem"` marks a section candidate.
  pub const ITEM: &str = "data-item";
  /// Set on registered section roots.
  pub const NAV_SCOPE: &str = "data-nav-scope";
  /// Set on every element of an active search view.
  pub const SEARCH_RESULT: &str = "data-search-result";
}

/// Value of [`attr::ITEM`] on section candidates.
pub const NAVIGATION_ITEM: &str = "navigationitem";

/// Role-like tag read from the `role` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
  MenuItem,
  MenuItemCheckbox,
  MenuItemRadio,
  /// Scope marker for menu candidates.
  Menu,
  Group,
  /// Numpad display.
  Status,
  Button,
  #[default]
  None,
}

impl Role {
  pub fn parse(value: &str) -> Self {
    match value.trim() {
      "menuitem" => Self::MenuItem,
      "menuitemcheckbox" => Self::MenuItemCheckbox,
      "menuitemradio" => Self::MenuItemRadio,
      "menu" => Self::Menu,
      "group" => Self::Group,
      "status" => Self::Status,
      "button" => Self::Button,
      _ => Self::None,
    }
  }

  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::MenuItem => "menuitem",
      Self::MenuItemCheckbox => "menuitemcheckbox",
      Self::MenuItemRadio => "menuitemradio",
      Self::Menu => "menu",
      Self::Group => "group",
      Self::Status => "status",
      Self::Button => "button",
      Self::None => "",
    }
  }

  /// Any of the `menuitem*` roles.
  pub const fn is_menu_item(&self) -> bool {
    matches!(
      self,
      Self::MenuItem | Self::MenuItemCheckbox | Self::MenuItemRadio
    )
  }
}

/// Numpad button kind, read from `data-button-type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ButtonKind {
  Number,
  Backspace,
  Enter,
}

impl ButtonKind {
  pub fn parse(value: &str) -> Option<Self> {
    match value.trim().to_lowercase().as_str() {
      "number" => Some(Self::Number),
      "backspace" => Some(Self::Backspace),
      "enter" => Some(Self::Enter),
      _ => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn menu_item_roles() {
    assert!(Role::parse("menuitem").is_menu_item());
    assert!(Role::parse("menuitemcheckbox").is_menu_item());
    assert!(Role::parse("menuitemradio").is_menu_item());
    assert!(!Role::parse("menu").is_menu_item());
    assert!(!Role::parse("searchbox").is_menu_item());
  }

  #[test]
  fn role_strings_round_trip() {
    for role in [Role::MenuItem, Role::Menu, Role::Status, Role::Button] {
      assert_eq!(Role::parse(role.as_str()), role);
    }
    assert_eq!(Role::parse(""), Role::None);
  }

  #[test]
  fn button_kinds_are_case_insensitive() {
    assert_eq!(ButtonKind::parse("Enter"), Some(ButtonKind::Enter));
    assert_eq!(ButtonKind::parse(" backspace "), Some(ButtonKind::Backspace));
    assert_eq!(ButtonKind::parse("number"), Some(ButtonKind::Number));
    assert_eq!(ButtonKind::parse("clear"), None);
  }
}
