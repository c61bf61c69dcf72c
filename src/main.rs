//! wkl - turn a repository reference into a wiki-generation request.

use clap::Parser;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use wikilaunch::cli::{BuildOptions, Cli, Commands, ConfigCommands};
use wikilaunch::commands::{self, CommandResult};
use wikilaunch::config::{ResolvedConfig, config_path, load_config, resolve_config};

/// Environment variable holding the log filter (e.g. `wikilaunch=debug`).
const LOG_ENV: &str = "WKL_LOG";

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let human = cli.human_readable;

    if let Err(e) = run_command(cli.command, cli.config_path.as_deref(), human) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

/// Log to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("wikilaunch=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run_command(
    command: Commands,
    explicit_config: Option<&Path>,
    human: bool,
) -> Result<(), wikilaunch::Error> {
    let config_file = config_path(explicit_config);

    match command {
        Commands::Resolve { reference } => {
            let result = commands::resolve_reference(&reference)?;
            output(&result, human);
        }
        Commands::Build { reference, options } => {
            let resolved = resolve_options(config_file.as_deref(), &options, human)?;
            let result = commands::build_wiki_request(&reference, &resolved)?;
            output(&result, human);
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show { options } => {
                let resolved = resolve_options(config_file.as_deref(), &options, false)?;
                let result = commands::config_show(&resolved, config_file.as_deref());
                output(&result, human);
            }
            ConfigCommands::Path => {
                let result = commands::config_path_info(config_file.as_deref());
                output(&result, human);
            }
            ConfigCommands::Init { force } => {
                let result = commands::config_init(config_file.as_deref(), force)?;
                output(&result, human);
            }
        },
    }

    Ok(())
}

/// Load config.kdl and layer CLI flags on top.
///
/// When `warn` is set, config warnings are printed to stderr.
fn resolve_options(
    config_file: Option<&Path>,
    options: &BuildOptions,
    warn: bool,
) -> Result<ResolvedConfig, wikilaunch::Error> {
    let loaded = load_config(config_file)?;
    let resolved = resolve_config(&loaded, &options.to_overrides())?;

    if warn {
        for warning in &resolved.warnings {
            eprintln!("Warning: {}", warning);
        }
    }

    Ok(resolved)
}

/// Print output in JSON or human-readable format.
fn output<T: CommandResult>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
