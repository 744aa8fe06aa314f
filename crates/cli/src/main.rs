mod commands;
mod options;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "isocfg")]
#[command(about = "Compile isolate sandbox configurations into command lines")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the isolate command line for a configuration
    Compile(commands::compile::CompileArgs),

    /// Report advisory issues in a configuration
    Validate(commands::validate::ValidateArgs),

    /// List the available presets
    Presets(commands::presets::PresetsArgs),

    /// Write a configuration as JSON
    Export(commands::export::ExportArgs),

    /// Show version information
    Version(commands::version::VersionArgs),
}

/// `directives` in `RUST_LOG` syntax take precedence; `verbose` only moves the
/// fallback level used when none are given.
fn log_filter(verbose: bool, directives: &str) -> EnvFilter {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives)
}

fn init_tracing(verbose: bool) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();

    // stdout carries the command line or JSON, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, &directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Compile(args) => commands::compile::run(args),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Presets(args) => commands::presets::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Version(args) => {
            commands::version::run(args);
            Ok(())
        }
    }
}
