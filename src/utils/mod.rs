//! Browser services the file store runs on.
//!
//! Provides:
//! - [`BrowserStorage`] - sessionStorage / localStorage tiers
//! - [`BrowserUndoTimer`] - Undo countdown via `setTimeout`
//! - [`JsClock`] - `Date.now()` clock
//! - [`logger`] - Console backend for the `log` facade

mod clock;
pub mod dom;
pub mod logger;
pub mod storage;
mod timer;

pub use clock::JsClock;
pub use storage::BrowserStorage;
pub use timer::BrowserUndoTimer;
