#![forbid(unsafe_code)]

mod app;
mod cmd;
mod notify;
mod output;
mod render;
mod source;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "tb",
    author,
    version,
    about = "taskboard: a homework board that groups tasks by weekday",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Task document location: a file path or an http(s) URL.
    #[arg(long, global = true, value_name = "PATH|URL")]
    source: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/taskboard/config.toml).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Fetch the board and show it grouped by day",
        after_help = "EXAMPLES:\n    # Everything\n    tb show\n\n    # Pending Math tasks from the last day\n    tb show --subject Math --window 24h --status pending"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        about = "Mark a task completed, or pending again",
        after_help = "EXAMPLES:\n    # Fingerprints are the #... column of `tb show`\n    tb toggle MathشنبهDoexercis"
    )]
    Toggle(cmd::toggle::ToggleArgs),

    #[command(about = "List the subjects (distinct task titles)")]
    Subjects,

    #[command(
        about = "Fetch once and announce new tasks",
        after_help = "EXAMPLES:\n    # From cron or a systemd timer\n    tb check --quiet"
    )]
    Check,

    #[command(about = "Generate shell completions")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("TASKBOARD_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "taskboard=debug,info"
        } else if quiet {
            "error"
        } else {
            "taskboard=info,warn"
        })
    });

    let format = env::var("TASKBOARD_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.is::<output::Reported>() => {
            debug!(error = %err, "command failed");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err),
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let app = app::App::resolve(
        cli.config.as_deref(),
        cli.source.clone(),
        cli.format,
        cli.json,
        cli.quiet,
    )?;
    debug!(command = ?cli.command, "dispatching");

    match &cli.command {
        Commands::Show(args) => cmd::show::run_show(args, &app),
        Commands::Toggle(args) => cmd::toggle::run_toggle(args, &app),
        Commands::Subjects => cmd::subjects::run_subjects(&app),
        Commands::Check => cmd::check::run_check(&app),
        Commands::Completions(_) => Ok(()),
    }
}
