//! hits - ED:HITS traffic advisories and crime reporting
//!
//! Runs the ED:HITS plugin against Elite Dangerous journal files, acting as
//! the host application: it tracks the commander and star system, feeds
//! every journal entry to the plugin and owns the overlay connection.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/edhits/config.toml (~/.config/edhits/config.toml)
//! - Logs: $XDG_STATE_HOME/edhits/edhits.log (~/.local/state/edhits/edhits.log)

mod host;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hits_core::{Config, OverlayCommand, OverlaySink, Plugin, PluginStats, TcpOverlay};
use host::{HostState, JournalTail};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "hits")]
#[command(about = "ED:HITS traffic advisories and crime reporting")]
#[command(version)]
struct Args {
    /// Also print overlay text to stdout
    #[arg(short, long)]
    echo: bool,

    /// Mirror log output to stderr
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show configuration and file locations
    Status,

    /// Feed every entry of a journal file through the plugin
    Replay {
        /// Journal file (one JSON object per line)
        file: PathBuf,
    },

    /// Follow the newest journal in the journal directory
    Watch {
        /// Journal directory (default: from config, else the game's default)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Poll interval in milliseconds (default: from config)
        #[arg(long)]
        poll: Option<u64>,
    },

    /// Ask the HITS server about one star system
    Check {
        /// Star system name
        system: String,
    },
}

/// Overlay sink that prints each message before forwarding it
struct EchoOverlay<S> {
    inner: S,
}

impl<S: OverlaySink> OverlaySink for EchoOverlay<S> {
    fn connect(&mut self) -> hits_core::Result<()> {
        self.inner.connect()
    }

    fn send(&mut self, command: &OverlayCommand) -> hits_core::Result<()> {
        if let OverlayCommand::Message(message) = command {
            println!("[overlay] {}", message.text);
        }
        self.inner.send(command)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    let mut config = Config::load().context("failed to load configuration")?;
    if args.verbose {
        config.logging.stderr = true;
    }

    let _log_guard =
        hits_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("hits starting");

    if let Command::Status = args.command {
        return cmd_status(&config);
    }

    let tcp = TcpOverlay::new(&config.overlay);
    let overlay: Box<dyn OverlaySink> = if args.echo {
        Box::new(EchoOverlay { inner: tcp })
    } else {
        Box::new(tcp)
    };

    let mut plugin = Plugin::new(config, overlay).context("failed to create plugin")?;
    plugin.start();

    let result = match args.command {
        Command::Replay { file } => cmd_replay(&mut plugin, &file),
        Command::Watch { dir, poll } => cmd_watch(&mut plugin, dir, poll),
        Command::Check { system } => {
            plugin.check_location(&system);
            Ok(())
        }
        Command::Status => Ok(()),
    };

    plugin.stop();
    print_stats(plugin.stats());

    result
}

fn cmd_status(config: &Config) -> Result<()> {
    let ctx = hits_core::SessionContext::from_preferences(&config.preferences);

    println!("ED:HITS Configuration");
    println!("=====================");
    println!();
    println!("Config file:     {}", Config::config_path().display());
    println!("Log file:        {}", Config::log_path().display());
    println!();
    println!("Server:          {}", ctx.server);
    println!("Overlay TTL:     {}s", ctx.overlay_ttl_secs);
    println!(
        "Traffic reports: {}",
        if ctx.advisory_enabled { "on" } else { "off" }
    );
    println!("Overlay:         {}", config.overlay.address);
    println!("Journal dir:     {}", config.journal.resolve_dir().display());

    Ok(())
}

fn cmd_replay<S: OverlaySink>(plugin: &mut Plugin<S>, file: &Path) -> Result<()> {
    let reader = BufReader::new(
        std::fs::File::open(file)
            .with_context(|| format!("failed to open journal {}", file.display()))?,
    );

    let mut host = HostState::default();
    let mut skipped = 0usize;

    for line in reader.lines() {
        let line = line.context("failed to read journal")?;
        if line.trim().is_empty() {
            continue;
        }
        if !host::dispatch(plugin, &mut host, &line) {
            skipped += 1;
        }
    }

    if skipped > 0 {
        println!("Skipped {} malformed line(s)", skipped);
    }

    tracing::info!(file = %file.display(), skipped, "Replay complete");
    Ok(())
}

fn cmd_watch<S: OverlaySink>(
    plugin: &mut Plugin<S>,
    dir: Option<PathBuf>,
    poll: Option<u64>,
) -> Result<()> {
    let dir = dir.unwrap_or_else(|| plugin.config().journal.resolve_dir());
    let poll_ms = poll.unwrap_or(plugin.config().journal.poll_ms);

    // Set up signal handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        eprintln!("\nShutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    println!(
        "Watching {} (poll every {}ms). Press Ctrl+C to stop.",
        dir.display(),
        poll_ms
    );

    let mut tail = JournalTail::new(&dir);
    let mut host = HostState::default();
    let poll_duration = Duration::from_millis(poll_ms);

    while running.load(Ordering::SeqCst) {
        let batch = match tail.poll() {
            Ok(batch) => batch,
            Err(e) => {
                // Missing directory or a journal rotated mid-poll; try again next tick
                tracing::warn!(dir = %dir.display(), error = %e, "Failed to read journal directory");
                thread::sleep(poll_duration);
                continue;
            }
        };

        for line in &batch.backlog {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(line) {
                host.observe(&value);
            }
        }
        if !batch.backlog.is_empty() {
            tracing::info!(
                commander = ?host.commander,
                system = ?host.system,
                "Caught up with existing journal"
            );
        }

        for line in &batch.fresh {
            host::dispatch(plugin, &mut host, line);
        }

        thread::sleep(poll_duration);
    }

    println!("Watch mode stopped.");
    tracing::info!(
        journal = ?tail.current().map(|p| p.display().to_string()),
        "hits watch mode stopped"
    );

    Ok(())
}

fn print_stats(stats: &PluginStats) {
    println!();
    println!("Entries handled:   {}", stats.entries);
    println!("Locations checked: {}", stats.locations_checked);
    println!("Crimes reported:   {}", stats.crimes_reported);
    println!("Failures:          {}", stats.failures);
}
