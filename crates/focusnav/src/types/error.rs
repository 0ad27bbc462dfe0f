/*! Error types for navigation operations. */

use super::{MenuId, NodeId, SectionId};

/// Errors that can occur while registering scopes or dispatching input.
///
/// None of these are fatal. Event entry points on
/// [`Navigator`](crate::Navigator) log them and treat the event as a no-op.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
  #[error("Element not found: {0}")]
  ElementNotFound(NodeId),

  #[error("Menu trigger {0} has no content container")]
  MissingContainer(NodeId),

  #[error("Element {0} is already registered")]
  AlreadyRegistered(NodeId),

  #[error("Menu not found: {0}")]
  MenuNotFound(MenuId),

  #[error("Section not found: {0}")]
  SectionNotFound(SectionId),

  #[error("Invalid navigation map: page {page}, section {section} (both must be >= 1)")]
  InvalidNavMap { page: u32, section: u32 },

  #[error("Page {page}, section {section} already belongs to another section")]
  NavMapTaken { page: u32, section: u32 },

  #[error("Invalid shortcut '{0}'")]
  InvalidShortcut(String),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl From<serde_json::Error> for NavError {
  fn from(e: serde_json::Error) -> Self {
    Self::InvalidConfig(e.to_string())
  }
}

/// Result type for navigation operations.
pub type NavResult<T> = Result<T, NavError>;
