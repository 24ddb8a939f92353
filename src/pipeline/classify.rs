// src/pipeline/classify.rs

//! Outcome classification.
//!
//! Compares the freshly scraped record against the last persisted one
//! and decides whether there is anything to announce.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{AppointmentRecord, ScrapeOutcome};

/// Placeholder text the page shows while no next opening is announced.
/// Tolerant of casing and stray whitespace ("Fecha por  confirmar").
static PLACEHOLDER_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)fecha\s*por\s*confirmar").expect("placeholder pattern compiles")
});

/// Classify a scraped record against the previous observation.
///
/// A missing previous record means a baseline first run: the current
/// record is adopted silently. A placeholder next-opening is never news,
/// even when other cells drifted textually.
pub fn classify(current: AppointmentRecord, previous: Option<&AppointmentRecord>) -> ScrapeOutcome {
    let Some(previous) = previous else {
        log::debug!("No previous record, adopting current as baseline");
        return ScrapeOutcome::Unchanged { record: current };
    };

    if PLACEHOLDER_DATE.is_match(&current.next_opening) {
        log::debug!("Next opening is still a placeholder: {}", current.next_opening);
        return ScrapeOutcome::Unchanged { record: current };
    }

    if &current == previous {
        ScrapeOutcome::Unchanged { record: current }
    } else {
        ScrapeOutcome::Changed { record: current }
    }
}
