// src/pipeline/dispatch.rs

//! Notification dispatch.
//!
//! Composes one subject/body per outcome and fans it out to every
//! configured channel. A channel failure is logged and never stops the
//! remaining channels or the run.

use chrono::Utc;

use crate::models::{Notification, ScrapeOutcome};
use crate::notify::Channel;

/// Historical subject lines, kept verbatim: operators filter on them.
const SUBJECT_ERROR: &str = "Error scraping cgeonline";
const SUBJECT_NO_NEWS: &str = "No new date in cgeonline.";
const SUBJECT_NEW_DATE: &str = "New date in cgeonline!";

/// Fans notifications out to all configured channels.
pub struct Dispatcher {
    channels: Vec<Box<dyn Channel>>,
    target_url: String,
}

impl Dispatcher {
    pub fn new(channels: Vec<Box<dyn Channel>>, target_url: String) -> Self {
        Self {
            channels,
            target_url,
        }
    }

    /// Compose the notification for an outcome, or `None` when the outcome
    /// stays silent (an unchanged run without the every-time flag).
    pub fn compose(&self, outcome: &ScrapeOutcome, email_every_time: bool) -> Option<Notification> {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");

        match outcome {
            ScrapeOutcome::Error {
                reason,
                raw_context,
            } => Some(Notification {
                subject: SUBJECT_ERROR.to_string(),
                body: format!(
                    "{timestamp}\n\n{reason}\n\n{raw_context}\n\n{}",
                    self.target_url
                ),
            }),
            ScrapeOutcome::Unchanged { record } => {
                if !email_every_time {
                    return None;
                }
                Some(Notification {
                    subject: SUBJECT_NO_NEWS.to_string(),
                    body: format!("{timestamp}\n\n{record}\n\n{}", self.target_url),
                })
            }
            ScrapeOutcome::Changed { record } => Some(Notification {
                subject: SUBJECT_NEW_DATE.to_string(),
                body: format!("{timestamp}\n\n{record}\n\n{}", self.target_url),
            }),
        }
    }

    /// Dispatch the outcome to every channel. Never fails: each channel
    /// send runs in its own failure boundary.
    pub async fn dispatch(&self, outcome: &ScrapeOutcome, email_every_time: bool) {
        let Some(notification) = self.compose(outcome, email_every_time) else {
            log::debug!("Outcome '{}' stays silent", outcome.label());
            return;
        };

        log::info!(
            "Dispatching '{}' to {} channel(s)",
            notification.subject,
            self.channels.len()
        );

        for channel in &self.channels {
            match channel.send(&notification.subject, &notification.body).await {
                Ok(()) => log::info!("Sent {} notification", channel.name()),
                Err(e) => {
                    log::error!("Error sending {} notification: {}", channel.name(), e);
                    log::debug!("{} failure detail: {:?}", channel.name(), e);
                }
            }
        }
    }
}
