/*!
Numpad digit entry.

A numpad is a group of buttons tagged with `data-button-type`. Number buttons
append their label, backspace removes the last digit and enter commits. While
digits are buffered the numpad's status element shows them; clearing the
buffer restores its original text.
*/

use crate::a11y::{attr, ButtonKind, Role};
use crate::platform::Document;
use crate::types::NodeId;

/// Result of feeding one key or button label into the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NumpadStep {
  /// Buffer changed; search for the new text.
  Search(String),
  /// Enter on a non-empty buffer.
  Commit(String),
  /// Backspace emptied the buffer.
  Cleared,
  /// Nothing to do.
  Ignored,
}

/// Digit buffer plus the numpad's markup.
#[derive(Debug, Clone)]
pub(crate) struct NumpadBuffer {
  pub(crate) element: NodeId,
  pub(crate) status: Option<NodeId>,
  status_text: String,
  text: String,
}

impl NumpadBuffer {
  /// Locate the status display under `element` and remember its text.
  pub(crate) fn new<D: Document>(doc: &D, element: NodeId) -> Self {
    let status = doc
      .descendants(element)
      .into_iter()
      .find(|&n| doc.role(n) == Role::Status);
    let status_text = status.map(|s| doc.text_content(s)).unwrap_or_default();
    Self {
      element,
      status,
      status_text,
      text: String::new(),
    }
  }

  /// Feed a key name (`"7"`, `"Backspace"`, `"Enter"`).
  pub(crate) fn input(&mut self, key: &str) -> NumpadStep {
    let key = key.trim();
    match key.to_lowercase().as_str() {
      "backspace" => {
        if self.text.pop().is_none() {
          return NumpadStep::Ignored;
        }
        if self.text.is_empty() {
          NumpadStep::Cleared
        } else {
          NumpadStep::Search(self.text.clone())
        }
      }
      "enter" if self.text.is_empty() => NumpadStep::Ignored,
      "enter" => NumpadStep::Commit(self.text.clone()),
      _ if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) => {
        self.text.push_str(key);
        NumpadStep::Search(self.text.clone())
      }
      _ => NumpadStep::Ignored,
    }
  }

  /// Show the buffer (or the original text when empty) on the status element.
  pub(crate) fn render<D: Document>(&self, doc: &mut D) {
    let Some(status) = self.status else {
      return;
    };
    let shown = if self.text.is_empty() {
      &self.status_text
    } else {
      &self.text
    };
    doc.set_text_content(status, shown);
  }

  pub(crate) fn reset<D: Document>(&mut self, doc: &mut D) {
    self.text.clear();
    self.render(doc);
  }

  /// Buttons under the numpad element.
  pub(crate) fn buttons<D: Document>(&self, doc: &D) -> Vec<(NodeId, ButtonKind)> {
    doc
      .descendants(self.element)
      .into_iter()
      .filter_map(|n| {
        let kind = ButtonKind::parse(&doc.attribute(n, attr::BUTTON_TYPE)?)?;
        Some((n, kind))
      })
      .collect()
  }

  /// Key name a button click feeds into [`input`](Self::input).
  pub(crate) fn label<D: Document>(doc: &D, button: NodeId, kind: ButtonKind) -> String {
    match kind {
      ButtonKind::Number => doc.text_content(button).trim().to_string(),
      ButtonKind::Backspace => "Backspace".to_string(),
      ButtonKind::Enter => "Enter".to_string(),
    }
  }
}
