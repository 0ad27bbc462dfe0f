/*! Accessibility markup: roles, attribute names, numpad button kinds. */

mod role;

pub use role::{attr, ButtonKind, Role, NAVIGATION_ITEM};
