//! Owned timer handles.
//!
//! A `Timer` holds at most one pending callback. Arming it again replaces the
//! pending callback, cancelling it drops the callback without running it. The
//! browser implementation wraps `setTimeout`; `ManualClock` provides virtual
//! time for tests and headless hosts.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// A single-slot, one-shot timer.
pub trait Timer {
    /// Schedule `callback` to run once after `delay`, replacing any pending one.
    fn arm(&mut self, delay: Duration, callback: Box<dyn FnOnce()>);

    /// Drop the pending callback, if any, without running it.
    fn cancel(&mut self);

    /// Whether a callback is scheduled and has not run yet.
    fn is_armed(&self) -> bool;
}

impl<T: Timer + ?Sized> Timer for Box<T> {
    fn arm(&mut self, delay: Duration, callback: Box<dyn FnOnce()>) {
        (**self).arm(delay, callback)
    }

    fn cancel(&mut self) {
        (**self).cancel()
    }

    fn is_armed(&self) -> bool {
        (**self).is_armed()
    }
}

type TaskKey = (Duration, u64);

#[derive(Default)]
struct ClockState {
    now: Duration,
    next_seq: u64,
    tasks: BTreeMap<TaskKey, Box<dyn FnOnce()>>,
}

/// Virtual clock driving any number of `ManualTimer`s.
///
/// Nothing runs until `advance` is called. Tasks fire in deadline order, ties
/// broken by arm order, and tasks armed from inside a callback are picked up
/// within the same `advance` call if their deadline falls inside it.
#[derive(Clone, Default)]
pub struct ManualClock {
    state: Rc<RefCell<ClockState>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a timer bound to this clock.
    pub fn timer(&self) -> ManualTimer {
        ManualTimer {
            clock: self.clone(),
            slot: None,
        }
    }

    /// Current virtual time since the clock was created.
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Number of callbacks waiting to fire across all timers.
    pub fn pending(&self) -> usize {
        self.state.borrow().tasks.len()
    }

    /// Move time forward by `by`, running every callback that comes due.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let due = state
                    .tasks
                    .first_key_value()
                    .map(|(key, _)| *key)
                    .filter(|(deadline, _)| *deadline <= target);
                match due {
                    Some(key) => {
                        state.now = key.0;
                        state.tasks.remove(&key)
                    }
                    None => None,
                }
            };
            // Borrow released: callbacks may arm or cancel timers on this clock.
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.state.borrow_mut().now = target;
    }

    fn schedule(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TaskKey {
        let mut state = self.state.borrow_mut();
        let key = (state.now + delay, state.next_seq);
        state.next_seq += 1;
        state.tasks.insert(key, callback);
        key
    }

    fn unschedule(&self, key: &TaskKey) {
        // Drop the callback outside the borrow; its captures may own timers.
        let task = self.state.borrow_mut().tasks.remove(key);
        drop(task);
    }

    fn is_scheduled(&self, key: &TaskKey) -> bool {
        self.state.borrow().tasks.contains_key(key)
    }
}

/// Timer driven by a `ManualClock`.
pub struct ManualTimer {
    clock: ManualClock,
    slot: Option<TaskKey>,
}

impl Timer for ManualTimer {
    fn arm(&mut self, delay: Duration, callback: Box<dyn FnOnce()>) {
        self.cancel();
        self.slot = Some(self.clock.schedule(delay, callback));
    }

    fn cancel(&mut self) {
        if let Some(key) = self.slot.take() {
            self.clock.unschedule(&key);
        }
    }

    fn is_armed(&self) -> bool {
        self.slot
            .as_ref()
            .is_some_and(|key| self.clock.is_scheduled(key))
    }
}

impl Drop for ManualTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
