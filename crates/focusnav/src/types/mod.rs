/*! Core types for focusnav.

Regenerate TypeScript types: `cargo test export_bindings`
*/

#![allow(missing_docs)]

mod error;
mod event;
mod geometry;
mod ids;
mod key;

pub use error::{NavError, NavResult};
pub use event::{Event, SearchMode};
pub use geometry::{distance, find_nearest, is_in_direction, Bounds, Direction, Point};
pub use ids::{MenuId, NodeId, SectionId, TaskId};
pub use key::{KeyEvent, KeyOutcome, Modifiers, Shortcut};
