//! Service layer for the watcher application.
//!
//! This module contains the business logic for:
//! - Page fetching with bounded retries (`Fetcher`)
//! - Service-row extraction (`extract_record`)

mod extract;
mod fetch;

pub use extract::extract_record;
pub use fetch::Fetcher;
