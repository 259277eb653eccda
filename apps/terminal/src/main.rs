use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{AppController, SessionStore};
use data_providers::Providers;
use shared::protocol::{ImageFile, ViewEvent};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::broadcast,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{parse_line, Command, HELP};
use config::Settings;

/// Terminal front end for the Smart Krishi advisory views.
#[derive(Parser, Debug)]
#[command(name = "krishi")]
struct Args {
    /// Settings file; defaults to ./krishi.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the simulated network latency.
    #[arg(long)]
    latency_ms: Option<u64>,
    /// Reads commands from a file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(latency_ms) = args.latency_ms {
        settings.latency_ms = latency_ms;
    }

    let filter = EnvFilter::try_new(&settings.log_filter)
        .with_context(|| format!("invalid log filter '{}'", settings.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let controller = AppController::new(
        settings.controller_config(),
        Providers::static_data(),
        SessionStore::new(),
    );
    let printer = tokio::spawn(print_events(controller.subscribe_events()));
    controller.navigate(&settings.start_path).await;
    info!(latency_ms = settings.latency_ms, "shell ready");

    let input: Box<dyn AsyncBufRead + Unpin + Send> = match &args.script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open script '{}'", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => {
            println!("{HELP}");
            Box::new(BufReader::new(tokio::io::stdin()))
        }
    };

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("error: {err:#}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(err) = execute(&controller, &settings, command).await {
            println!("error: {err:#}");
        }
    }

    controller.teardown().await;
    // Give the printer a moment to flush events raised by the last command.
    tokio::time::sleep(Duration::from_millis(20)).await;
    printer.abort();
    Ok(())
}

async fn execute(controller: &Arc<AppController>, settings: &Settings, command: Command) -> Result<()> {
    match command {
        Command::Actions(actions) => {
            for action in actions {
                // Refusals are already published as error events.
                if let Err(err) = controller.dispatch(action).await {
                    debug!(error = %err, "action refused");
                    break;
                }
            }
        }
        Command::Upload(path) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let preview = controller
                .upload_image(ImageFile {
                    file_name,
                    mime_type: None,
                    bytes,
                })
                .await?;
            println!("preview: {} ({} bytes)", preview.mime_type, preview.size_bytes);
        }
        Command::Nav => {
            let nav = controller.nav_bar().await;
            for item in nav.items {
                let marker = if item.active { "*" } else { " " };
                println!("{marker} {:<18} {}", item.label, item.path);
            }
            println!("  [{}]", if nav.show_logout { "Logout" } else { "Login" });
        }
        Command::State => {
            let snapshot = controller.snapshot().await;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Wait => tokio::time::sleep(wait_duration(settings)).await,
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

/// Long enough for every delayed completion armed so far to land.
fn wait_duration(settings: &Settings) -> Duration {
    Duration::from_millis(settings.latency_ms.saturating_add(50))
}

async fn print_events(mut events: broadcast::Receiver<ViewEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => println!("{}", describe(&event)),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                println!("... {skipped} events skipped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn describe(event: &ViewEvent) -> String {
    match event {
        ViewEvent::Navigated { to, path, .. } => format!("» {to} ({path})"),
        ViewEvent::SessionChanged { authenticated } => {
            format!("» session {}", if *authenticated { "signed in" } else { "signed out" })
        }
        ViewEvent::Toast(toast) => format!("» {}: {}", toast.title, toast.description),
        ViewEvent::TranscriptAppended { entry } => {
            format!("» [{:?}] {}", entry.role, entry.content)
        }
        ViewEvent::PreviewReady { file_name } => format!("» preview ready for {file_name}"),
        ViewEvent::DetectionReady { report } => {
            format!("» detected {}: {}", report.label, report.description)
        }
        ViewEvent::RecommendationsReady { count } => format!("» {count} crops recommended"),
        ViewEvent::PageUpdated { page } => format!("» {page} updated"),
        ViewEvent::Error(error) => format!("» error ({:?}): {}", error.code, error.message),
    }
}
