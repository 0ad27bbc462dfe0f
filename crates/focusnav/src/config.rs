/*!
Configuration for menus, sections and the navigator.

All structs deserialize from camelCase JSON with every field optional:

```ignore
let config = MenuConfig::from_json(r#"{ "mainMenu": true, "shortcutKey": "ctrl+alt+m" }"#)?;
```
*/

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{NavError, NavResult};

const DEFAULT_SEARCH_DECAY_MS: u64 = 500;
const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

fn keys(names: &[&str]) -> Vec<String> {
  names.iter().map(|k| (*k).to_string()).collect()
}

fn default_ignored_input_types() -> Vec<String> {
  keys(&["text", "search", "range"])
}

fn default_exit_input_keys() -> Vec<String> {
  keys(&["Tab", "Escape", "ArrowDown", "ArrowUp"])
}

/// Key bindings for a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct MenuKeys {
  pub up: Vec<String>,
  pub down: Vec<String>,
  pub left: Vec<String>,
  pub right: Vec<String>,
  /// Activate the focused item (or open the menu from its trigger).
  pub open: Vec<String>,
  pub exit: Vec<String>,
  /// Keys that leave a focused text input instead of typing into it.
  pub exit_input: Vec<String>,
}

impl Default for MenuKeys {
  fn default() -> Self {
    Self {
      up: keys(&["ArrowUp"]),
      down: keys(&["ArrowDown", "Tab"]),
      left: keys(&["ArrowLeft"]),
      right: keys(&["ArrowRight"]),
      open: keys(&[" ", "Enter"]),
      exit: keys(&["Escape"]),
      exit_input: default_exit_input_keys(),
    }
  }
}

/// Options for one menu trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct MenuConfig {
  pub keys: MenuKeys,
  /// `<input type=..>` values whose keystrokes belong to the input.
  pub ignored_input_types: Vec<String>,
  /// Arrow keys move spatially instead of opening/closing submenus.
  pub all_direction_navigation: bool,
  pub close_on_selection: bool,
  /// Reopen on the last activated item.
  pub remember_last_item: bool,
  /// Global combination that opens this menu, e.g. `"ctrl+alt+m"`.
  pub shortcut_key: Option<String>,
  /// The content container is itself a numpad.
  pub numpad_only: bool,
  /// Root menu: toggled by its trigger, closed by any outside click.
  pub main_menu: bool,
  /// Element id of the item focused on open.
  pub default_item_id: Option<String>,
  /// Idle time before the direct search buffer clears.
  pub search_decay_ms: u64,
}

impl Default for MenuConfig {
  fn default() -> Self {
    Self {
      keys: MenuKeys::default(),
      ignored_input_types: default_ignored_input_types(),
      all_direction_navigation: false,
      close_on_selection: false,
      remember_last_item: false,
      shortcut_key: None,
      numpad_only: false,
      main_menu: false,
      default_item_id: None,
      search_decay_ms: DEFAULT_SEARCH_DECAY_MS,
    }
  }
}

impl MenuConfig {
  pub fn from_json(json: &str) -> NavResult<Self> {
    Ok(serde_json::from_str(json)?)
  }
}

/// Key bindings for a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct SectionKeys {
  /// Move to the next section on the page (Shift reverses).
  pub section: Vec<String>,
  /// Click the focused item. Empty by default: native buttons click on their own.
  pub open: Vec<String>,
  pub up: Vec<String>,
  pub down: Vec<String>,
  pub left: Vec<String>,
  pub right: Vec<String>,
  pub exit_input: Vec<String>,
}

impl Default for SectionKeys {
  fn default() -> Self {
    Self {
      section: keys(&["Tab"]),
      open: Vec::new(),
      up: keys(&["ArrowUp"]),
      down: keys(&["ArrowDown", "Tab"]),
      left: keys(&["ArrowLeft"]),
      right: keys(&["ArrowRight"]),
      exit_input: default_exit_input_keys(),
    }
  }
}

/// Position of a section in the navigation map. Both numbers start at 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NavMap {
  pub page: u32,
  pub section: u32,
}

impl NavMap {
  pub const fn new(page: u32, section: u32) -> Self {
    Self { page, section }
  }

  pub const fn validate(self) -> NavResult<Self> {
    if self.page == 0 || self.section == 0 {
      return Err(NavError::InvalidNavMap {
        page: self.page,
        section: self.section,
      });
    }
    Ok(self)
  }
}

/// Options for one navigable section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct SectionConfig {
  pub nav_map: NavMap,
  pub keys: SectionKeys,
  pub ignored_input_types: Vec<String>,
  /// Suppress the browser default for every key handled inside the section.
  pub lock_focus: bool,
  /// Element scrolled by PageUp/PageDown/Home/End.
  pub scrollable_container_id: Option<String>,
  /// Recompute candidates on every keystroke even with a structural watcher.
  pub always_refresh: bool,
  pub default_item_id: Option<String>,
  /// React to the section becoming visible. Defaults to `section == 1`.
  pub observe_visibility: Option<bool>,
}

impl Default for SectionConfig {
  fn default() -> Self {
    Self {
      nav_map: NavMap::default(),
      keys: SectionKeys::default(),
      ignored_input_types: default_ignored_input_types(),
      lock_focus: false,
      scrollable_container_id: None,
      always_refresh: false,
      default_item_id: None,
      observe_visibility: None,
    }
  }
}

impl SectionConfig {
  pub fn new(page: u32, section: u32) -> Self {
    Self {
      nav_map: NavMap::new(page, section),
      ..Self::default()
    }
  }

  pub fn from_json(json: &str) -> NavResult<Self> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn observes_visibility(&self) -> bool {
    self
      .observe_visibility
      .unwrap_or(self.nav_map.section == 1)
  }
}

/// Navigator-wide options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default, rename_all = "camelCase")]
#[ts(export)]
pub struct NavigatorConfig {
  /// The host reports subtree changes via `notify_structure_changed`.
  /// Without it, sections refresh their candidates on every keystroke.
  pub structural_watcher: bool,
  /// The host reports sections becoming visible via `notify_scope_visible`.
  /// Without it, visibility is polled.
  pub visibility_watcher: bool,
  pub poll_interval_ms: u64,
}

impl Default for NavigatorConfig {
  fn default() -> Self {
    Self {
      structural_watcher: false,
      visibility_watcher: false,
      poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
    }
  }
}

impl NavigatorConfig {
  pub fn from_json(json: &str) -> NavResult<Self> {
    Ok(serde_json::from_str(json)?)
  }
}
