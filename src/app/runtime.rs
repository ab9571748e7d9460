use std::fs;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{debug, error, info, warn};
use tubewatch_core::config::{self, AppConfig, ConfigOrigin, LoadedConfig};
use tubewatch_core::download::{DownloadError, DownloadOptions, YtDlp};
use tubewatch_core::events::{DesktopNotifier, EventSink, NotificationSink};
use tubewatch_core::pipeline::{Coordinator, SourcePoller, spawn_worker};
use tubewatch_core::source::ClipboardSource;

use crate::ProcessExit;
use crate::app::terminal;
use crate::cli::Args;

const APP_NAME: &str = "tubewatch";

/// How long shutdown waits for notifications that are still being shown.
const NOTIFICATION_FLUSH_BOUND: Duration = Duration::from_secs(2);

pub(crate) async fn run_tubewatch() -> Result<ProcessExit> {
    let args = Args::parse();

    // Config comes first: the log directory lives under download_path.
    let loaded = config::load_or_create(&args.config);
    let config = loaded.config.clone();

    let (log_file, log_file_error) =
        match terminal::open_log_file(&config.log_dir(), Local::now().date_naive()) {
            Ok(file) => (Some(file), None),
            Err(error) => (None, Some(error)),
        };
    terminal::init_tracing(
        terminal::resolve_default_log_level(args.verbose, args.quiet),
        terminal::is_no_color_requested(args.no_color),
        log_file,
    );
    if let Some(error) = log_file_error {
        warn!(
            dir = %config.log_dir().display(),
            error = %error,
            "Could not open log file, logging to console only"
        );
    }

    debug!(?args, "CLI arguments parsed");
    info!("Tubewatch starting");
    report_config(&loaded);

    fs::create_dir_all(&config.download_path).with_context(|| {
        format!(
            "could not create download directory {}",
            config.download_path.display()
        )
    })?;

    let downloader = match initialize_downloader().await {
        Ok(downloader) => downloader,
        Err(error) => {
            error!(error = %error, "Download tool is not available");
            return Ok(ProcessExit::Failure);
        }
    };
    let source = ClipboardSource::open().context("system clipboard is not available")?;
    debug!("system clipboard opened");

    if !args.quiet {
        print_banner(&config);
    }

    let sink = Arc::new(if config.enable_notifications {
        NotificationSink::new(Arc::new(DesktopNotifier::new(APP_NAME)))
    } else {
        NotificationSink::log_only()
    });
    let coordinator = Arc::new(Coordinator::new(
        Arc::clone(&sink) as Arc<dyn EventSink>
    ));
    let worker = spawn_worker(
        Arc::clone(&coordinator),
        Arc::new(downloader),
        DownloadOptions::from_config(&config),
    );

    let mut poller = SourcePoller::new(source, Arc::clone(&coordinator), config.poll_interval());
    poller.run(wait_for_interrupt()).await;

    if let Some(current) = coordinator.current() {
        warn!(
            link = %current.link,
            started_at = %current.started_at,
            "Download in progress will be cancelled"
        );
    }
    info!(
        processed = worker.stats().total(),
        completed = worker.stats().completed(),
        failed = worker.stats().failed(),
        seen = coordinator.ledger().len(),
        "Shutting down"
    );
    worker.abandon();
    sink.flush(NOTIFICATION_FLUSH_BOUND).await;

    Ok(ProcessExit::Success)
}

fn report_config(loaded: &LoadedConfig) {
    let path = loaded.path.display();
    match &loaded.origin {
        ConfigOrigin::File => info!(path = %path, "Loaded configuration"),
        ConfigOrigin::CreatedDefault => info!(path = %path, "Created default config file"),
        ConfigOrigin::CreateFailed(error) => {
            warn!(error = %error, "Could not save default config, continuing with defaults");
        }
        ConfigOrigin::Invalid(error) => {
            error!(error = %error, "Error loading config, using defaults");
        }
    }
    for adjustment in &loaded.adjustments {
        warn!(path = %path, "{adjustment}");
    }
}

async fn initialize_downloader() -> Result<YtDlp, DownloadError> {
    let downloader = YtDlp::locate()?;
    let version = downloader.version().await?;
    info!(
        program = %downloader.program().display(),
        version = %version,
        "Download tool ready"
    );
    Ok(downloader)
}

async fn wait_for_interrupt() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Interrupt received"),
        Err(error) => error!(error = %error, "Could not listen for Ctrl+C, stopping"),
    }
}

fn print_banner(config: &AppConfig) {
    let notifications = if config.enable_notifications {
        "Enabled"
    } else {
        "Disabled"
    };
    println!("{}", "=".repeat(60));
    println!("YouTube Clipboard Auto-Downloader");
    println!("{}", "=".repeat(60));
    println!("Download folder: {}", config.download_path.display());
    println!("Video format: {}", config.video_format);
    println!("Notifications: {notifications}");
    println!("Queue mode: Sequential (one download at a time)");
    println!("{}", "=".repeat(60));
    println!("Copy any YouTube URL to start downloading.");
    println!("Press Ctrl+C to stop.");
    println!("{}", "=".repeat(60));
}
