//! Demo command line: drives the global logger from several threads.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::thread;
use tracing::warn;

use crate::domain::models::Severity;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::LoggerConfig;
use crate::services::{bridge, global};

#[derive(Parser, Debug)]
#[command(name = "rotolog")]
#[command(about = "Write leveled log lines to rotating files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Root directory for dated log directories [env: ROTOLOG_LOG_DIR]
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Base name of the log files [env: ROTOLOG_BASE_NAME]
    #[arg(long)]
    pub name: Option<String>,

    /// Minimum severity written: all, debug, info, warn, error, fatal
    #[arg(long)]
    pub level: Option<Severity>,

    /// Do not mirror records to stderr
    #[arg(long)]
    pub no_console: bool,

    /// Tag shown as @prefix on console lines
    #[arg(long)]
    pub prefix: Option<String>,

    /// Lines written by each thread
    #[arg(long, default_value_t = 100)]
    pub lines: usize,

    /// Number of writer threads
    #[arg(long, default_value_t = 4)]
    pub threads: usize,

    /// Panic inside a guarded scope to produce a crash dump
    #[arg(long)]
    pub crash: bool,
}

impl Cli {
    /// Layer command line flags over the loaded configuration.
    pub fn apply(&self, mut config: LoggerConfig) -> LoggerConfig {
        if let Some(log_dir) = &self.log_dir {
            config.log_dir.clone_from(log_dir);
        }
        if let Some(name) = &self.name {
            config.base_name.clone_from(name);
        }
        if let Some(level) = self.level {
            config.threshold = level;
        }
        if self.no_console {
            config.console = false;
        }
        if let Some(prefix) = &self.prefix {
            config.console_prefix.clone_from(prefix);
        }
        config
    }
}

/// Run the demo described by `cli`.
pub fn run(cli: &Cli) -> Result<()> {
    let config = cli.apply(ConfigLoader::load()?);
    ConfigLoader::validate(&config)?;

    let path = global::init_with_config(&config)
        .with_context(|| format!("Failed to open log file under {}", config.log_dir.display()))?;

    if let Err(e) = bridge::init_tracing_bridge(global::shared()) {
        warn!(error = %e, "tracing bridge not installed");
    }

    crate::infof!("writing to {}", path.display());

    thread::scope(|scope| {
        for worker in 0..cli.threads {
            scope.spawn(move || write_lines(worker, cli.lines));
        }
    });

    if cli.crash {
        let outcome: Option<()> = global::catch_crash(|| panic!("demo crash requested"));
        if outcome.is_none() {
            crate::warnf!("crash dump written under {}", config.crash_dir.display());
        }
    }

    global::logger()
        .flush()
        .context("Failed to flush log file")?;
    global::shutdown();
    Ok(())
}

fn write_lines(worker: usize, lines: usize) {
    for n in 0..lines {
        match n % 5 {
            0 => crate::debugf!("worker {worker} step {n}"),
            1 => crate::infoln!("worker", worker, "step", n),
            2 => global::warn(format_args!("worker {worker} slow at step {n}")),
            3 => crate::errorf!("worker {worker} failed step {n}"),
            _ => global::v(Severity::Info).info(format_args!("worker {worker} checkpoint {n}")),
        }
    }
}
