// banwatch - main.rs
//
// Binary entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and validation (config.toml + CLI overrides)
// 3. Logging initialisation
// 4. The poll loop: one tick per scan interval, printing every jail state

use banwatch::app::monitor::BanMonitor;
use banwatch::core::model::JailState;
use banwatch::platform::config::{self, ConfigOverrides, RawConfig};
use banwatch::util::{self, error::BanWatchError};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

/// banwatch - report the IPs fail2ban has banned, per jail.
#[derive(Parser, Debug)]
#[command(name = "banwatch", version, about)]
struct Cli {
    /// Jail to watch (repeatable). Replaces the jails in config.toml.
    #[arg(short = 'j', long = "jail")]
    jails: Vec<String>,

    /// fail2ban log file [default: /var/log/fail2ban.log].
    #[arg(short = 'l', long = "log-file")]
    log_file: Option<PathBuf>,

    /// Display name prefixed to each jail sensor [default: fail2ban].
    #[arg(short = 'n', long = "name")]
    name: Option<String>,

    /// Seconds between log re-reads [default: 120].
    #[arg(short = 's', long = "scan-interval")]
    scan_interval: Option<u64>,

    /// Config file (defaults to the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Read the log immediately, print, and exit.
    #[arg(long)]
    once: bool,

    /// Print states as JSON lines instead of text.
    #[arg(long)]
    json: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "banwatch stopped");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> util::error::Result<()> {
    // Config names the log level and output, so it is read before tracing
    // is initialised. Warnings are logged once tracing is up.
    let (config_path, required) = match cli.config {
        Some(ref path) => (path.clone(), true),
        None => (config::default_config_path(), false),
    };
    let raw = config::read_raw_config(&config_path, required)?.unwrap_or_else(RawConfig::default);

    let overrides = ConfigOverrides {
        jails: cli.jails,
        log_file: cli.log_file,
        name: cli.name,
        scan_interval_secs: cli.scan_interval,
    };
    let (config, warnings) = config::resolve_config(raw, overrides)?;

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_output.as_deref(),
    );
    tracing::info!(
        version = util::constants::APP_VERSION,
        config = %config_path.display(),
        "banwatch starting"
    );
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let mut monitor = BanMonitor::from_config(&config)?;

    // The timed refresh first fires one interval after startup; --once
    // forces the read instead.
    if cli.once {
        let states = monitor.read_now();
        return print_states(&states, cli.json);
    }

    loop {
        let states = monitor.poll_all();
        print_states(&states, cli.json)?;
        std::thread::sleep(monitor.interval());
    }
}

fn print_states(states: &[JailState], json: bool) -> Result<(), BanWatchError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for state in states {
        let line = if json {
            serde_json::to_string(state)?
        } else {
            state.summary()
        };
        // Broken pipes on stdout are ignored.
        if let Err(e) = writeln!(out, "{line}") {
            tracing::debug!(error = %e, "stdout write failed");
        }
    }
    Ok(())
}
