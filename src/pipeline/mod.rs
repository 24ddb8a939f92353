//! Pipeline entry points for watcher operations.
//!
//! - `classify`: Compare a fresh record with the stored one
//! - `Dispatcher`: Compose and fan out notifications
//! - `run_watch`: One full scrape-compare-notify-persist cycle

pub mod classify;
pub mod dispatch;
pub mod watch;

pub use classify::classify;
pub use dispatch::Dispatcher;
pub use watch::{PageSource, run_watch};
