// src/pipeline/watch.rs

//! Watch pipeline.
//!
//! One full cycle: fetch the page, extract the target row, classify it
//! against the stored observation, dispatch notifications, persist.
//!
//! The state file is written only after a successful scrape, so a failed
//! run keeps the last known-good record as the next comparison baseline.
//! Concurrent invocations are undefined behavior; the scheduler calling
//! this must serialize runs.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Config, ScrapeOutcome};
use crate::pipeline::{Dispatcher, classify};
use crate::services::{Fetcher, extract_record};
use crate::storage::RecordStore;

/// Source of the raw page body. Production uses [`Fetcher`]; tests script
/// page content or transport failures.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn page(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl PageSource for Fetcher {
    async fn page(&self, url: &str) -> Result<String> {
        self.fetch(url).await
    }
}

/// Run one scrape-compare-notify-persist cycle.
///
/// Fetch and extraction errors are dispatched best-effort as an error
/// notification and then returned to the caller for a non-zero exit.
/// State-store errors propagate without a notification attempt.
pub async fn run_watch(
    config: &Config,
    source: &dyn PageSource,
    store: &dyn RecordStore,
    dispatcher: &Dispatcher,
    email_every_time: bool,
) -> Result<ScrapeOutcome> {
    let url = config.watch.dates_url();
    log::info!("Scraping {}", url);

    let record = match source.page(&url).await.and_then(|html| {
        log::debug!("Fetched {} bytes", html.len());
        extract_record(&html, &url)
    }) {
        Ok(record) => record,
        Err(e) => {
            log::error!("Error while scraping cgeonline: {}", e);
            let outcome = ScrapeOutcome::Error {
                reason: e.to_string(),
                raw_context: e.raw_context(),
            };
            dispatcher.dispatch(&outcome, email_every_time).await;
            return Err(e);
        }
    };

    log::debug!("Scraped data from the target row: {:?}", record);

    let previous = store.load().await?;
    let outcome = classify(record, previous.as_ref());
    log::info!("Outcome: {}", outcome.label());

    dispatcher.dispatch(&outcome, email_every_time).await;

    if let Some(record) = outcome.record() {
        store.save(record).await?;
        log::debug!("State file updated");
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use tempfile::TempDir;

    use crate::error::AppError;
    use crate::models::{AppointmentRecord, Notification};
    use crate::notify::Channel;
    use crate::pipeline::dispatch::tests::RecordingChannel;
    use crate::storage::{LocalStore, RecordStore};

    use super::*;

    const PAGE_PLACEHOLDER: &str = r#"<html><body><table>
        <tr><th>Servicio</th><th>Ultima apertura</th><th>Proxima apertura</th><th>Solicitud</th></tr>
        <tr><td>Registro Civil-Nacimientos</td><td>10/11/2022</td><td>fecha por confirmar</td>
            <td><a href="/tramites/registro-civil-nacimientos.html">solicitar</a></td></tr>
        </table></body></html>"#;

    const PAGE_NEW_DATE: &str = r#"<html><body><table>
        <tr><th>Servicio</th><th>Ultima apertura</th><th>Proxima apertura</th><th>Solicitud</th></tr>
        <tr><td>Registro Civil-Nacimientos</td><td>10/11/2022</td><td>12/12/2022</td>
            <td><a href="/tramites/registro-civil-nacimientos.html">solicitar</a></td></tr>
        </table></body></html>"#;

    /// Returns scripted pages (or transport failures) in order.
    struct ScriptedSource {
        script: Mutex<Vec<Result<String>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<String>>) -> Self {
            Self {
                script: Mutex::new(script),
            }
        }

        fn pages(pages: &[&str]) -> Self {
            Self::new(pages.iter().map(|p| Ok(p.to_string())).collect())
        }
    }

    #[async_trait]
    impl PageSource for ScriptedSource {
        async fn page(&self, _url: &str) -> Result<String> {
            self.script.lock().unwrap().remove(0)
        }
    }

    struct Harness {
        _tmp: TempDir,
        config: Config,
        store: LocalStore,
        dispatcher: Dispatcher,
        email_sent: Arc<Mutex<Vec<Notification>>>,
        chat_sent: Arc<Mutex<Vec<Notification>>>,
    }

    fn harness() -> Harness {
        harness_with_channels(false, false)
    }

    fn harness_with_channels(email_fails: bool, chat_fails: bool) -> Harness {
        let tmp = TempDir::new().unwrap();
        let config = Config::default();
        let store = LocalStore::new(tmp.path().join("last_record.json"));

        let email = RecordingChannel::new("gmail", email_fails);
        let chat = RecordingChannel::new("telegram", chat_fails);
        let email_sent = Arc::clone(&email.sent);
        let chat_sent = Arc::clone(&chat.sent);

        let channels: Vec<Box<dyn Channel>> = vec![Box::new(email), Box::new(chat)];
        let dispatcher = Dispatcher::new(channels, config.watch.dates_url());

        Harness {
            _tmp: tmp,
            config,
            store,
            dispatcher,
            email_sent,
            chat_sent,
        }
    }

    fn placeholder_record() -> AppointmentRecord {
        AppointmentRecord {
            service_name: "Registro Civil-Nacimientos".to_string(),
            last_opened_date: "10/11/2022".to_string(),
            next_opening: "fecha por confirmar".to_string(),
            request_path: "/tramites/registro-civil-nacimientos.html".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_run_adopts_baseline_silently() {
        let h = harness();
        let source = ScriptedSource::pages(&[PAGE_PLACEHOLDER]);

        let outcome = run_watch(&h.config, &source, &h.store, &h.dispatcher, false)
            .await
            .unwrap();

        assert!(matches!(outcome, ScrapeOutcome::Unchanged { .. }));
        assert!(h.email_sent.lock().unwrap().is_empty());
        assert!(h.chat_sent.lock().unwrap().is_empty());

        // State file created with the scraped record.
        let stored = h.store.load().await.unwrap().unwrap();
        assert_eq!(stored, placeholder_record());
    }

    #[tokio::test]
    async fn test_new_date_notifies_both_channels_and_updates_state() {
        let h = harness();
        h.store.save(&placeholder_record()).await.unwrap();

        let source = ScriptedSource::pages(&[PAGE_NEW_DATE]);
        let outcome = run_watch(&h.config, &source, &h.store, &h.dispatcher, false)
            .await
            .unwrap();

        assert!(matches!(outcome, ScrapeOutcome::Changed { .. }));

        let email = h.email_sent.lock().unwrap();
        let chat = h.chat_sent.lock().unwrap();
        assert_eq!(email.len(), 1);
        assert_eq!(chat.len(), 1);
        assert_eq!(email[0].subject, "New date in cgeonline!");

        let stored = h.store.load().await.unwrap().unwrap();
        assert_eq!(stored.next_opening, "12/12/2022");
    }

    #[tokio::test]
    async fn test_fetch_error_notifies_and_leaves_state_untouched() {
        let h = harness();
        h.store.save(&placeholder_record()).await.unwrap();

        let source = ScriptedSource::new(vec![Err(AppError::Transport {
            status: Some(525),
            reason: "edge TLS negotiation failure (status 525)".to_string(),
            raw: "<html>525</html>".to_string(),
        })]);

        let err = run_watch(&h.config, &source, &h.store, &h.dispatcher, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport { status: Some(525), .. }));

        let email = h.email_sent.lock().unwrap();
        let chat = h.chat_sent.lock().unwrap();
        assert_eq!(email.len(), 1);
        assert_eq!(chat.len(), 1);
        assert_eq!(email[0].subject, "Error scraping cgeonline");
        assert!(email[0].body.contains("525"));

        // Last known-good record stays the baseline.
        let stored = h.store.load().await.unwrap().unwrap();
        assert_eq!(stored, placeholder_record());
    }

    #[tokio::test]
    async fn test_row_not_found_dispatches_error() {
        let h = harness();
        let source = ScriptedSource::pages(&["<html><body>mantenimiento</body></html>"]);

        let err = run_watch(&h.config, &source, &h.store, &h.dispatcher, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RowNotFound { .. }));
        assert_eq!(h.chat_sent.lock().unwrap().len(), 1);
        assert!(h.store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_two_identical_runs_are_idempotent() {
        let h = harness();
        let source = ScriptedSource::pages(&[PAGE_NEW_DATE, PAGE_NEW_DATE]);

        let first = run_watch(&h.config, &source, &h.store, &h.dispatcher, false)
            .await
            .unwrap();
        let second = run_watch(&h.config, &source, &h.store, &h.dispatcher, false)
            .await
            .unwrap();

        // First run is the baseline; second sees no change. No sends.
        assert!(matches!(first, ScrapeOutcome::Unchanged { .. }));
        assert!(matches!(second, ScrapeOutcome::Unchanged { .. }));
        assert!(h.email_sent.lock().unwrap().is_empty());
        assert!(h.chat_sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_notifies_when_flag_set() {
        let h = harness();
        h.store.save(&placeholder_record()).await.unwrap();

        let source = ScriptedSource::pages(&[PAGE_PLACEHOLDER]);
        let outcome = run_watch(&h.config, &source, &h.store, &h.dispatcher, true)
            .await
            .unwrap();

        assert!(matches!(outcome, ScrapeOutcome::Unchanged { .. }));
        let email = h.email_sent.lock().unwrap();
        assert_eq!(email.len(), 1);
        assert_eq!(email[0].subject, "No new date in cgeonline.");
    }

    #[tokio::test]
    async fn test_channel_failure_does_not_abort_run() {
        let h = harness_with_channels(true, false);
        h.store.save(&placeholder_record()).await.unwrap();

        let source = ScriptedSource::pages(&[PAGE_NEW_DATE]);
        let outcome = run_watch(&h.config, &source, &h.store, &h.dispatcher, false)
            .await
            .unwrap();

        assert!(matches!(outcome, ScrapeOutcome::Changed { .. }));
        // Chat channel still delivered and the state write still ran.
        assert_eq!(h.chat_sent.lock().unwrap().len(), 1);
        let stored = h.store.load().await.unwrap().unwrap();
        assert_eq!(stored.next_opening, "12/12/2022");
    }
}
