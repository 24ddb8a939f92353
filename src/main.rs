//! citawatch CLI
//!
//! One-shot watcher for the cgeonline appointment-openings page. Meant to
//! be invoked on a schedule (cron or similar); the scheduler must not run
//! two instances concurrently.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use citawatch::{
    config,
    error::Result,
    models::Config,
    notify::{Channel, GmailChannel, TelegramChannel},
    pipeline::{self, Dispatcher},
    services::Fetcher,
    storage::{LocalStore, RecordStore},
};

/// citawatch - cgeonline appointment watcher
#[derive(Parser, Debug)]
#[command(
    name = "citawatch",
    version,
    about = "Watches cgeonline for new appointment openings"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// Path to the channel secrets file
    #[arg(short, long, default_value = "data/secrets.toml")]
    secrets: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one scrape-compare-notify cycle
    Watch {
        /// Send a notification even when there is no new info
        #[arg(long)]
        email_every_time: bool,
    },

    /// Validate configuration and secrets files
    Validate,

    /// Show the stored last observation
    Status,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
///
/// Exits non-zero when the watch pipeline ends in an unrecoverable
/// fetch/match/persist error; a quiet no-change run exits 0.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Watch { email_every_time } => {
            let (config, secrets) = config::load_all(&cli.config, &cli.secrets)?;

            let fetcher = Fetcher::new(&config.watch)?;
            let store = LocalStore::new(&config.paths.state_file);

            let channels: Vec<Box<dyn Channel>> = vec![
                Box::new(GmailChannel::new(&config.notify, &secrets.gmail)?),
                Box::new(TelegramChannel::new(&config.notify, &secrets.telegram)?),
            ];
            let dispatcher = Dispatcher::new(channels, config.watch.dates_url());

            let outcome =
                pipeline::run_watch(&config, &fetcher, &store, &dispatcher, email_every_time)
                    .await?;
            log::info!("Run complete: {}", outcome.label());
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            config::load_config(&cli.config)?;
            log::info!("✓ Config OK ({})", cli.config.display());

            config::load_secrets(&cli.secrets)?;
            log::info!("✓ Secrets OK ({})", cli.secrets.display());

            log::info!("All validations passed!");
        }

        Command::Status => {
            let config = Config::load_or_default(&cli.config);
            let store = LocalStore::new(&config.paths.state_file);

            match store.load().await? {
                Some(record) => {
                    log::info!("State file: {}", config.paths.state_file.display());
                    for line in record.to_string().lines() {
                        log::info!("  {}", line);
                    }
                }
                None => {
                    log::info!(
                        "No stored observation yet at {}",
                        config.paths.state_file.display()
                    );
                }
            }
        }
    }

    Ok(())
}
