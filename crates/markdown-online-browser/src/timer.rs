//! `setTimeout`-backed timer.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use markdown_online_core::Timer;

/// Browser timer. Dropping the pending `Timeout` clears it.
#[derive(Default)]
pub struct BrowserTimer {
    pending: Option<Timeout>,
    fired: Rc<Cell<bool>>,
}

impl BrowserTimer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Timer for BrowserTimer {
    fn arm(&mut self, delay: Duration, callback: Box<dyn FnOnce()>) {
        self.cancel();

        let fired = Rc::new(Cell::new(false));
        self.fired = fired.clone();
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        self.pending = Some(Timeout::new(millis, move || {
            fired.set(true);
            callback();
        }));
    }

    fn cancel(&mut self) {
        if let Some(timeout) = self.pending.take() {
            drop(timeout.cancel());
        }
    }

    fn is_armed(&self) -> bool {
        self.pending.is_some() && !self.fired.get()
    }
}
