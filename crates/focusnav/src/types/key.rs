/*!
Keyboard input as seen by the engine.

Keys use DOM `KeyboardEvent.key` names (`"ArrowDown"`, `"Enter"`, `" "`, `"a"`).
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{NavError, NavResult};

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Modifiers {
  pub ctrl: bool,
  pub alt: bool,
  pub shift: bool,
  pub meta: bool,
}

/// A single keydown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct KeyEvent {
  pub key: String,
  /// Physical key code (`"KeyM"`), when the host knows it.
  pub code: Option<String>,
  pub modifiers: Modifiers,
}

impl KeyEvent {
  pub fn new(key: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      code: None,
      modifiers: Modifiers::default(),
    }
  }

  #[must_use]
  pub fn with_code(mut self, code: impl Into<String>) -> Self {
    self.code = Some(code.into());
    self
  }

  #[must_use]
  pub const fn shift(mut self) -> Self {
    self.modifiers.shift = true;
    self
  }

  #[must_use]
  pub const fn ctrl(mut self) -> Self {
    self.modifiers.ctrl = true;
    self
  }

  #[must_use]
  pub const fn alt(mut self) -> Self {
    self.modifiers.alt = true;
    self
  }

  #[must_use]
  pub const fn meta(mut self) -> Self {
    self.modifiers.meta = true;
    self
  }

  /// Is this key one of `keys`? Exact, case-sensitive match on `key`.
  pub fn is_any(&self, keys: &[String]) -> bool {
    keys.iter().any(|k| *k == self.key)
  }

  /// Single-character keys produce text; named keys (`"Shift"`, `"F5"`) do not.
  pub fn is_printable(&self) -> bool {
    self.key.chars().count() == 1
  }
}

/// What the host should do with the native event after dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyOutcome {
  /// Some scope acted on the key.
  pub handled: bool,
  /// Suppress the browser default (scrolling, tabbing, typing).
  pub prevent_default: bool,
}

impl KeyOutcome {
  pub const IGNORED: Self = Self {
    handled: false,
    prevent_default: false,
  };

  pub const CONSUMED: Self = Self {
    handled: true,
    prevent_default: true,
  };

  /// Handled, but the native default still runs (typing into a field).
  pub const PASSED: Self = Self {
    handled: true,
    prevent_default: false,
  };
}

/// A global key combination such as `ctrl+alt+m`.
///
/// Matching requires the exact modifier set. The main key matches either
/// `key` case-insensitively or a `Key<X>` physical code, so `alt+m` still
/// fires on layouts where Alt changes the produced character.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Shortcut {
  pub modifiers: Modifiers,
  /// Lowercased main key.
  pub key: String,
}

impl Shortcut {
  pub fn matches(&self, event: &KeyEvent) -> bool {
    if self.modifiers != event.modifiers {
      return false;
    }
    if self.key == event.key.to_lowercase() {
      return true;
    }
    let expected = format!("Key{}", self.key.to_uppercase());
    event.code.as_deref() == Some(expected.as_str())
  }
}

impl FromStr for Shortcut {
  type Err = NavError;

  fn from_str(s: &str) -> NavResult<Self> {
    let lowered = s.trim().to_lowercase();
    let mut modifiers = Modifiers::default();
    let mut key = None;

    for part in lowered.split('+') {
      match part.trim() {
        "ctrl" | "control" => modifiers.ctrl = true,
        "alt" | "option" => modifiers.alt = true,
        "shift" => modifiers.shift = true,
        "meta" | "cmd" | "super" => modifiers.meta = true,
        "" => {}
        other => {
          if key.replace(other.to_string()).is_some() {
            return Err(NavError::InvalidShortcut(s.to_string()));
          }
        }
      }
    }

    // "ctrl++" means the plus key itself
    if key.is_none() && lowered.ends_with("++") {
      key = Some("+".to_string());
    }

    let key = key.ok_or_else(|| NavError::InvalidShortcut(s.to_string()))?;
    Ok(Self { modifiers, key })
  }
}

impl fmt::Display for Shortcut {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let Modifiers {
      ctrl,
      alt,
      shift,
      meta,
    } = self.modifiers;
    for (held, name) in [(ctrl, "ctrl"), (alt, "alt"), (shift, "shift"), (meta, "meta")] {
      if held {
        write!(f, "{name}+")?;
      }
    }
    f.write_str(&self.key)
  }
}
