/*!
focusnav - keyboard and spatial focus navigation

Drives focus through hierarchical menus and multi-page, multi-section layouts
over any host document that implements [`Document`].

```ignore
use focusnav::{KeyEvent, MemoryDocument, MenuConfig, Navigator, SectionConfig};

let mut nav = Navigator::new(doc);

// Menus: the trigger's next sibling is the content container
let menu = nav.register_menu(trigger, MenuConfig::from_json(r#"{ "rememberLastItem": true }"#)?)?;

// Sections: Tab moves between sections of the same page
nav.register_section(sidebar, SectionConfig::new(1, 1))?;
nav.register_section(content, SectionConfig::new(1, 2))?;

// Forward host input
let outcome = nav.handle_keydown(&KeyEvent::new("ArrowDown"));
if outcome.prevent_default {
    // suppress the native default
}
nav.handle_click(target);

// Drive deferred work (search decay, focus re-checks, polling)
nav.advance(std::time::Duration::from_millis(16));

// Subscribe to events
let mut events = nav.subscribe();
while let Ok(event) = events.try_recv() {
    // handle event
}
```
*/

mod candidates;
mod config;
mod core;
mod menu;
mod observation;
mod platform;
mod polling;
mod scheduler;
mod search;
mod section;

pub mod a11y;

mod types;
pub use types::*;

pub use crate::config::{MenuConfig, MenuKeys, NavMap, NavigatorConfig, SectionConfig, SectionKeys};
pub use crate::core::{Navigator, NavigatorBuilder};
pub use crate::menu::MenuState;
pub use crate::platform::{ComputedStyle, Document, MemoryDocument, NodeSpec, ScrollMetrics};
pub use crate::section::Traversal;
