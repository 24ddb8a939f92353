//! Outcome of one scrape-compare cycle.

use super::record::AppointmentRecord;

/// Result of comparing a fresh observation against the stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// The scrape itself failed (transport or page structure)
    Error { reason: String, raw_context: String },

    /// Same data as the previous run, or the baseline first run
    Unchanged { record: AppointmentRecord },

    /// The row data changed since the previous run
    Changed { record: AppointmentRecord },
}

impl ScrapeOutcome {
    /// The scraped record, when the scrape succeeded.
    pub fn record(&self) -> Option<&AppointmentRecord> {
        match self {
            Self::Error { .. } => None,
            Self::Unchanged { record } | Self::Changed { record } => Some(record),
        }
    }

    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error { .. } => "error",
            Self::Unchanged { .. } => "unchanged",
            Self::Changed { .. } => "changed",
        }
    }
}

/// A composed notification, handed independently to each channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}
