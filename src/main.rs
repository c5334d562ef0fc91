use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{Generator, generate};
use colored::Colorize;
use dirwatch::cli::Cli;
use dirwatch::config::Config;
use dirwatch::config::validator::ConfigValidator;
use dirwatch::daemon::Daemon;
use dirwatch::output::{self, ConsoleSink, Verbosity};
use dirwatch::shutdown::CancellationToken;
use std::io;
use std::process;
use tracing::{debug, warn};

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        print_completions(shell, &mut cmd);
        return Ok(());
    }

    let config_path = Config::resolve_path(cli.config.as_deref());
    let mut config = match &config_path {
        Some(path) => {
            ConfigValidator::new().validate_config_file(path)?;
            if cli.config.is_some() {
                Config::load_explicit(path)?
            } else {
                Config::load(path)?
            }
        }
        None => Config::default(),
    };
    config.apply_overrides(cli.overrides());

    if cli.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if !config.logging.color {
        colored::control::set_override(false);
    }

    let verbosity = Verbosity::from_flags(cli.verbose, cli.quiet);
    output::set_verbosity(verbosity);
    output::init_logging(
        &output::log_directive(verbosity, &config.logging.level),
        config.logging.color,
    )?;

    if let Some(path) = &config_path {
        debug!(path = %path.display(), exists = path.exists(), "Configuration file");
    }

    let settings = config.settings()?;
    if !settings.directory.is_dir() {
        warn!(
            directory = %settings.directory.display(),
            "Watch directory does not exist yet; polling anyway"
        );
    }

    let token = CancellationToken::new();
    let mut daemon = Daemon::from_settings(&settings, token.clone());
    let mut sink = ConsoleSink;

    if cli.once {
        daemon.run_once(&mut sink);
        return Ok(());
    }

    #[cfg(unix)]
    dirwatch::shutdown::forward_signals(token).context("Failed to install signal handlers")?;

    let summary = daemon.run(&mut sink);
    output::info(&format!(
        "Stopped after {} ({} cycles, {} matches)",
        humantime::format_duration(std::time::Duration::from_secs(summary.uptime.as_secs())),
        summary.cycles,
        summary.matches
    ));

    Ok(())
}

fn print_completions<G: Generator>(g: G, cmd: &mut clap::Command) {
    generate(g, cmd, cmd.get_name().to_string(), &mut io::stdout());
}
