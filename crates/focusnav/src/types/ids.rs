/*! Branded ID types for type-safe entity references. */

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Handle to an element in the host document.
///
/// Opaque to the engine: only the [`Document`](crate::platform::Document)
/// implementation knows what a given id refers to.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  TS,
  Display,
  From,
  Into,
)]
#[ts(export)]
pub struct NodeId(pub u32);

/// Menu identifier, assigned at registration.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, From, Into,
)]
#[ts(export)]
pub struct MenuId(pub u32);

/// Section identifier, assigned at registration.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, Display, From, Into,
)]
#[ts(export)]
pub struct SectionId(pub u32);

/// Scheduled task identifier. Used to cancel a pending task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
pub struct TaskId(pub u64);
