use std::io::BufRead;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use serde_json::Value;

use soundboard::audio_system::{
    AssetProvider, PermissiveProvider, PlaybackController, RodioProvider,
};
use soundboard::config::Config;
use soundboard::error::AppResult;
use soundboard::messaging::{Event, EventAdapter, EventBus};

const LOG_TARGET_STARTUP: &str = "soundboard::startup";

/// Initialize tracing with file rotation
///
/// Logs are written to `<config dir>/Soundboard/logs/soundboard.YYYY-MM-DD.log`.
/// Debug builds also log to the console.
fn initialize_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_appender::rolling;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_dir = dirs::config_dir()
        .map(|dir| dir.join("Soundboard").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    let file_appender = rolling::daily(&log_dir, "soundboard.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    // Configure filter (info level by default)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true);

    #[cfg(debug_assertions)]
    {
        let console_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer)
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();
    }

    tracing::info!(target: LOG_TARGET_STARTUP, "Logging to {}", log_dir.display());
    guard
}

fn main() {
    let _guard = initialize_tracing();

    if let Err(e) = run() {
        tracing::error!(target: LOG_TARGET_STARTUP, "{:#}", e);
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> AppResult<()> {
    let silent = std::env::args().skip(1).any(|arg| arg == "--silent");

    let config = Config::load().with_context(|| {
        format!("Failed to load config from {}", Config::config_path_display())
    })?;
    let asset_dir = config.asset_dir_full_path()?;
    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Assets: {} (*.{}), volume {:.2}, muted {}",
        asset_dir.display(),
        config.extension,
        config.initial_volume,
        config.start_muted
    );

    // Keep the provider alive for the whole run: it owns the output stream
    let provider: Box<dyn AssetProvider> = if silent {
        tracing::warn!(target: LOG_TARGET_STARTUP, "Silent mode, no audio output");
        Box::new(PermissiveProvider)
    } else {
        Box::new(
            RodioProvider::new(&asset_dir, &config.extension)
                .context("Failed to initialize audio output (try --silent)")?,
        )
    };

    let controller = PlaybackController::load(provider.as_ref(), config.audio_settings());
    tracing::info!(
        target: LOG_TARGET_STARTUP,
        "Available sounds: {:?}",
        controller.registered_names()
    );

    let bus = EventBus::new();
    let mut adapter = EventAdapter::new(controller, &bus);
    if config.autoplay_music {
        adapter.controller_mut().toggle_music(true);
    }

    spawn_stdin_reader(bus.clone())?;

    println!("Commands: play <name> | stop [name] | mute | volume <v> | music on|off | quit");
    adapter.run(Duration::from_millis(config.poll_interval_ms));
    Ok(())
}

/// Forward stdin lines to the bus as events until EOF or `quit`.
fn spawn_stdin_reader(bus: EventBus) -> AppResult<()> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match parse_command(&line) {
                    Some(Event::Shutdown) => break,
                    Some(event) => {
                        bus.publish(event);
                    }
                    None if line.trim().is_empty() => {}
                    None => eprintln!("Unknown command: {}", line.trim()),
                }
            }
            bus.publish(Event::Shutdown);
        })
        .context("Failed to start stdin reader thread")?;
    Ok(())
}

fn parse_command(line: &str) -> Option<Event> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?;
    let arg = parts.next();

    let event = match (command, arg) {
        ("play", Some(name)) => Event::PlaySound {
            name: name.to_string(),
        },
        ("stop", Some(name)) => Event::StopSound {
            name: name.to_string(),
        },
        ("stop", None) => Event::StopAll,
        ("mute", None) => Event::ToggleMute,
        ("volume", Some(value)) => Event::SetVolume {
            value: serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string())),
        },
        ("music", Some("on")) => Event::ToggleMusic { play: true },
        ("music", Some("off")) => Event::ToggleMusic { play: false },
        ("quit", None) | ("exit", None) => Event::Shutdown,
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_play_and_stop() {
        assert_eq!(
            parse_command("play victoria"),
            Some(Event::PlaySound {
                name: "victoria".to_string()
            })
        );
        assert_eq!(parse_command("stop"), Some(Event::StopAll));
        assert_eq!(parse_command("  quit "), Some(Event::Shutdown));
    }

    #[test]
    fn test_parse_volume_keeps_raw_text() {
        assert_eq!(
            parse_command("volume 0.5"),
            Some(Event::SetVolume { value: json!(0.5) })
        );
        assert_eq!(
            parse_command("volume abc"),
            Some(Event::SetVolume { value: json!("abc") })
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("music loud"), None);
        assert_eq!(parse_command("play"), None);
    }
}
