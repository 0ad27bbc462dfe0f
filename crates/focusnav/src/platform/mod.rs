/*!
Host abstraction.

- `traits.rs` - the [`Document`] capability the engine consumes
- `memory/` - [`MemoryDocument`], an in-memory implementation
*/

mod memory;
mod traits;

pub use memory::{MemoryDocument, NodeSpec};
pub use traits::{ComputedStyle, Document, ScrollMetrics};
