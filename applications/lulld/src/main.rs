/// Lull Daemon - headless ambient sound mixer
use anyhow::Context;
use clap::{Parser, Subcommand};
use lull_core::SystemClock;
use lull_playback::{PlaybackEvent, PlayerManager};
use lull_service::{
    remaining_auto_stop, Command, PlaybackController, PlaybackService, ServiceHandle,
};
use lull_storage::settings::scheduled_stop_time;
use lull_storage::{JsonFileStore, PresetStore};
use lulld::{DaemonConfig, GrantingFocus, LoggingDeviceVolume, LoggingEngine};
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lulld")]
#[command(about = "Headless Lull ambient sound mixer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the playback service, reading one JSON command per line from stdin
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the configured sound catalog
    Catalog {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries status lines
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lulld=info,lull_service=info,lull_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(&load_config(config)?)?;
        }
        Commands::Catalog { config } => {
            print_catalog(&load_config(config)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<DaemonConfig> {
    let config = DaemonConfig::load(path.as_deref()).context("Failed to load configuration")?;
    config.validate()?;
    Ok(config)
}

fn serve(config: &DaemonConfig) -> anyhow::Result<()> {
    info!("Opening store at {}", config.storage.path.display());
    let store = Arc::new(
        JsonFileStore::open(&config.storage.path).context("Failed to open preset store")?,
    );
    let catalog = Arc::new(config.catalog());
    let clock = Arc::new(SystemClock);

    let manager = PlayerManager::new(
        config.service.playback.clone(),
        Arc::new(LoggingEngine::new(catalog.clone())),
        catalog,
        Box::new(GrantingFocus::default()),
        PresetStore::new(store.clone()),
    );
    let controller = PlaybackController::new(
        Box::new(LoggingDeviceVolume::default()),
        store.clone(),
        clock.clone(),
    );

    let service = PlaybackService::spawn(&config.service, manager, controller)?;
    let handle = service.handle();

    // Re-arm an auto-stop that outlived the previous run
    let remaining = remaining_auto_stop(store.as_ref(), clock.as_ref());
    let pending = scheduled_stop_time(store.as_ref()).filter(|_| !remaining.is_zero());
    if let Some(at_uptime_millis) = pending {
        info!("Restoring auto-stop in {}s", remaining.as_secs());
        handle.send(Command::ScheduleStopPlayback { at_uptime_millis })?;
    }

    let watcher = spawn_status_printer(handle.clone())?;

    info!("lulld ready, reading commands from stdin");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str(line) {
            Ok(request) => handle.send_request(request)?,
            Err(e) => warn!("Ignoring malformed request: {}", e),
        }
    }

    info!("stdin closed, shutting down");
    service.shutdown()?;
    if watcher.join().is_err() {
        warn!("status printer panicked");
    }

    Ok(())
}

/// Print one JSON status line per state change until the service stops
fn spawn_status_printer(handle: ServiceHandle) -> anyhow::Result<thread::JoinHandle<()>> {
    let events = handle.subscribe()?;

    let watcher = thread::Builder::new()
        .name("lulld-status".to_string())
        .spawn(move || {
            for event in &events {
                if event != PlaybackEvent::StateChanged {
                    continue;
                }

                let Ok(status) = handle.query(|manager| {
                    json!({
                        "state": manager.playback_state(),
                        "preset": manager.current_preset().map(|p| p.name),
                        "sounds": manager.mix(),
                    })
                }) else {
                    break;
                };

                let mut stdout = io::stdout().lock();
                if writeln!(stdout, "{status}").is_err() {
                    break;
                }
            }
        })?;

    Ok(watcher)
}

fn print_catalog(config: &DaemonConfig) {
    println!("Sounds ({}):", config.sounds.len());
    println!("{:<16} {:<10} Tags", "Key", "Mode");
    println!("{}", "-".repeat(40));

    for sound in &config.sounds {
        let mode = if sound.is_looping { "loop" } else { "one-shot" };
        let tags: Vec<String> = sound.tags.iter().map(ToString::to_string).collect();
        println!("{:<16} {:<10} {}", sound.key, mode, tags.join(", "));
    }
}
