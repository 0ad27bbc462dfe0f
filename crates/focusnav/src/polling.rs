/*!
Visibility polling.

Used only when the host has no visibility watcher. Every poll interval the
sections that observe visibility are checked; a section whose root has come
into the viewport since the last poll is entered, as if the host had called
[`Navigator::notify_scope_visible`].

Polling is owned by the navigator's scheduler: it starts with the first
observing section and stops once none are left.
*/

use std::time::Duration;

use crate::core::{Navigator, Task};
use crate::platform::Document;
use crate::types::NodeId;

/// Shortest interval accepted, so a poll never reschedules itself at the
/// current instant.
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Laid out, rendered and overlapping the viewport.
fn in_viewport<D: Document>(doc: &D, node: NodeId) -> bool {
  let b = doc.bounds(node);
  doc.is_visible(node) && b.y < doc.viewport_height() && b.bottom() > 0.0
}

impl<D: Document> Navigator<D> {
  pub(crate) fn ensure_visibility_polling(&mut self) {
    if self.config.visibility_watcher || self.poll_task.is_some_and(|t| self.scheduler.is_pending(t)) {
      return;
    }
    if !self.sections.iter().any(|s| s.config.observes_visibility()) {
      return;
    }
    let interval = Duration::from_millis(self.config.poll_interval_ms).max(MIN_POLL_INTERVAL);
    self.poll_task = Some(self.scheduler.schedule(interval, Task::PollVisibility));
    log::trace!("Visibility poll scheduled in {interval:?}");
  }

  pub(crate) fn poll_visibility(&mut self) {
    self.poll_task = None;

    let doc = &self.doc;
    let mut appeared = Vec::new();
    for (idx, section) in self.sections.iter_mut().enumerate() {
      if !section.config.observes_visibility() {
        continue;
      }
      let visible = in_viewport(doc, section.root);
      if visible && !section.was_visible {
        appeared.push(idx);
      }
      section.was_visible = visible;
    }

    for idx in appeared {
      if let Some(section) = self.sections.get(idx) {
        log::debug!("Section {} came into view", section.id);
      }
      self.enter_section(idx);
    }
    self.ensure_visibility_polling();
  }
}
