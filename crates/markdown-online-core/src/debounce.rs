//! Trailing-edge debouncing over an owned `Timer`.

use std::rc::Rc;
use std::time::Duration;

use crate::timer::Timer;

/// Collapses bursts of calls into a single trailing invocation.
///
/// Every `call` cancels whatever is pending and arms the timer again with the
/// newest payload, so only the last call of a burst shorter than `delay`
/// reaches the handler. The handler's result is not observed; a panic inside
/// it surfaces wherever the host runs timer callbacks.
pub struct Debouncer<T: 'static> {
    timer: Box<dyn Timer>,
    delay: Duration,
    handler: Rc<dyn Fn(T)>,
}

impl<T: 'static> Debouncer<T> {
    pub fn new(timer: impl Timer + 'static, delay: Duration, handler: impl Fn(T) + 'static) -> Self {
        Self {
            timer: Box::new(timer),
            delay,
            handler: Rc::new(handler),
        }
    }

    /// Schedule the handler with `payload`, superseding any pending call.
    pub fn call(&mut self, payload: T) {
        self.timer.cancel();
        let handler = self.handler.clone();
        self.timer
            .arm(self.delay, Box::new(move || handler(payload)));
    }

    /// Drop the pending call, if any.
    pub fn cancel(&mut self) {
        self.timer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
