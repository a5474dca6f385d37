//! Undo countdown on the browser event loop.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::future::TimeoutFuture;
use novashell_core::{UndoTimer, UndoToken};
use wasm_bindgen_futures::spawn_local;

/// Runs `on_expire(token)` once the delay elapses, unless cancelled or
/// re-armed first.
///
/// Each arm spawns a task that sleeps and then checks whether its token is
/// still the armed one. Cancelling only clears that marker, so no JS timer
/// handle has to be kept or dropped from inside its own callback.
pub struct BrowserUndoTimer {
    armed: Rc<Cell<Option<UndoToken>>>,
    on_expire: Rc<dyn Fn(UndoToken)>,
}

impl BrowserUndoTimer {
    pub fn new(on_expire: impl Fn(UndoToken) + 'static) -> Self {
        Self {
            armed: Rc::new(Cell::new(None)),
            on_expire: Rc::new(on_expire),
        }
    }
}

impl UndoTimer for BrowserUndoTimer {
    fn arm(&mut self, token: UndoToken, delay: Duration) {
        self.armed.set(Some(token));

        let armed = Rc::clone(&self.armed);
        let on_expire = Rc::clone(&self.on_expire);
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        spawn_local(async move {
            TimeoutFuture::new(millis).await;
            if armed.get() == Some(token) {
                armed.set(None);
                on_expire(token);
            }
        });
    }

    fn cancel(&mut self) {
        self.armed.set(None);
    }
}
