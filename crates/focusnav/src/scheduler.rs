/*!
Deterministic task scheduling.

Deferred work (buffer decay, focus re-checks, visibility polling) is queued
against a virtual clock instead of real timers. The host drives the clock with
[`Navigator::advance`](crate::Navigator::advance); tests do the same, so every
timing path is reproducible.

Tasks run in `(due time, insertion order)` order. A task scheduled while
another runs, with a due time inside the window being advanced, runs in the
same `advance` call.
*/

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::types::TaskId;

#[derive(Debug)]
pub(crate) struct Scheduler<T> {
  now: Duration,
  next_id: u64,
  queue: BTreeMap<(Duration, TaskId), T>,
  due_of: HashMap<TaskId, Duration>,
}

impl<T> Default for Scheduler<T> {
  fn default() -> Self {
    Self {
      now: Duration::ZERO,
      next_id: 0,
      queue: BTreeMap::new(),
      due_of: HashMap::new(),
    }
  }
}

impl<T> Scheduler<T> {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Current virtual time.
  pub(crate) const fn now(&self) -> Duration {
    self.now
  }

  pub(crate) fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
    let id = TaskId(self.next_id);
    self.next_id += 1;
    let due = self.now.saturating_add(delay);
    self.queue.insert((due, id), task);
    self.due_of.insert(id, due);
    id
  }

  /// Drop a pending task. Returns false if it already ran or never existed.
  pub(crate) fn cancel(&mut self, id: TaskId) -> bool {
    let Some(due) = self.due_of.remove(&id) else {
      return false;
    };
    self.queue.remove(&(due, id)).is_some()
  }

  pub(crate) fn is_pending(&self, id: TaskId) -> bool {
    self.due_of.contains_key(&id)
  }

  pub(crate) fn len(&self) -> usize {
    self.queue.len()
  }

  /// Pop the earliest task due at or before `until`, moving the clock to its
  /// due time.
  pub(crate) fn pop_due(&mut self, until: Duration) -> Option<(TaskId, T)> {
    let (&(due, id), _) = self.queue.first_key_value()?;
    if due > until {
      return None;
    }
    let task = self.queue.remove(&(due, id))?;
    self.due_of.remove(&id);
    self.now = self.now.max(due);
    Some((id, task))
  }

  /// Move the clock forward without running anything. Never goes backwards.
  pub(crate) fn set_now(&mut self, now: Duration) {
    self.now = self.now.max(now);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
  }

  fn drain(s: &mut Scheduler<&'static str>, until: Duration) -> Vec<&'static str> {
    let mut ran = Vec::new();
    while let Some((_, t)) = s.pop_due(until) {
      ran.push(t);
    }
    s.set_now(until);
    ran
  }

  #[test]
  fn runs_in_due_then_insertion_order() {
    let mut s = Scheduler::new();
    s.schedule(ms(100), "c");
    s.schedule(ms(10), "a");
    s.schedule(ms(100), "d");
    s.schedule(ms(50), "b");

    assert_eq!(drain(&mut s, ms(100)), vec!["a", "b", "c", "d"]);
    assert_eq!(s.now(), ms(100));
  }

  #[test]
  fn leaves_future_tasks_queued() {
    let mut s = Scheduler::new();
    s.schedule(ms(10), "soon");
    s.schedule(ms(500), "later");

    assert_eq!(drain(&mut s, ms(100)), vec!["soon"]);
    assert_eq!(s.len(), 1);
    assert_eq!(drain(&mut s, ms(500)), vec!["later"]);
  }

  #[test]
  fn delays_are_relative_to_now() {
    let mut s = Scheduler::new();
    s.set_now(ms(1000));
    s.schedule(ms(10), "x");
    assert!(drain(&mut s, ms(1005)).is_empty());
    assert_eq!(drain(&mut s, ms(1010)), vec!["x"]);
  }

  #[test]
  fn cancel_removes_pending_task() {
    let mut s = Scheduler::new();
    let id = s.schedule(ms(500), "decay");
    assert!(s.is_pending(id));
    assert!(s.cancel(id));
    assert!(!s.cancel(id), "second cancel is a no-op");
    assert!(drain(&mut s, ms(1000)).is_empty());
  }

  #[test]
  fn clock_never_goes_backwards() {
    let mut s: Scheduler<()> = Scheduler::new();
    s.set_now(ms(50));
    s.set_now(ms(10));
    assert_eq!(s.now(), ms(50));
  }
}
