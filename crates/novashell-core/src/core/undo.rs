//! Host hooks for the undo countdown and timestamps.
//!
//! The store never sleeps or spawns. It asks an [`UndoTimer`] to call back
//! later and reads wall-clock time from a [`Clock`]; the browser crate backs
//! both with JS timers and `Date.now()`, native hosts and tests use the
//! manual implementations here.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Identifies one armed undo slot.
///
/// Each deletion gets a fresh token. Expiry is reported with the token it
/// was armed for, so a callback for an older slot has no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct UndoToken(pub(crate) u64);

impl UndoToken {
    pub fn value(self) -> u64 {
        self.0
    }

    /// Rebuild a token handed across an FFI boundary.
    pub fn from_value(value: u64) -> Self {
        Self(value)
    }
}

/// Schedules expiry of the pending undo.
pub trait UndoTimer {
    /// Arrange for `Vfs::expire_undo(token)` to run after `delay`.
    ///
    /// Arming replaces whatever was armed before.
    fn arm(&mut self, token: UndoToken, delay: Duration);

    /// Drop the scheduled callback.
    ///
    /// Must be a no-op when nothing is armed or the callback already fired.
    fn cancel(&mut self);
}

/// Source of wall-clock time in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

// =============================================================================
// System Clock
// =============================================================================

/// Clock backed by [`SystemTime`]. Not usable on `wasm32-unknown-unknown`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

// =============================================================================
// Manual Clock
// =============================================================================

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by.as_millis() as u64);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// =============================================================================
// Manual Timer
// =============================================================================

/// What a [`ManualTimer`] has been asked to do so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManualTimerState {
    pub armed: Option<(UndoToken, Duration)>,
    pub arm_count: usize,
    pub cancel_count: usize,
}

/// Timer that records requests instead of scheduling anything.
///
/// The host (or a test) fires expiry itself by calling `Vfs::expire_undo`
/// with [`ManualTimer::armed_token`]. Clones share state, so a handle kept
/// outside the store can observe it.
#[derive(Clone, Debug, Default)]
pub struct ManualTimer {
    state: Rc<RefCell<ManualTimerState>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token currently armed, if any.
    pub fn armed_token(&self) -> Option<UndoToken> {
        self.state.borrow().armed.map(|(token, _)| token)
    }

    pub fn state(&self) -> ManualTimerState {
        self.state.borrow().clone()
    }
}

impl UndoTimer for ManualTimer {
    fn arm(&mut self, token: UndoToken, delay: Duration) {
        let mut state = self.state.borrow_mut();
        state.armed = Some((token, delay));
        state.arm_count += 1;
    }

    fn cancel(&mut self) {
        let mut state = self.state.borrow_mut();
        state.armed = None;
        state.cancel_count += 1;
    }
}
