//! Notification channels.
//!
//! Each channel is an independent transport behind the [`Channel`] trait;
//! the dispatcher fans a notification out to all of them and isolates
//! per-channel failures.

mod email;
mod telegram;

use async_trait::async_trait;

use crate::error::Result;

pub use email::GmailChannel;
pub use telegram::TelegramChannel;

/// Pluggable notification transport.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Short channel name for log lines ("gmail", "telegram").
    fn name(&self) -> &'static str;

    /// Deliver one notification.
    async fn send(&self, subject: &str, body: &str) -> Result<()>;
}
