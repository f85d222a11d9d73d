use std::path::Path;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use stringloc::GoogleWebTranslator;
use stringloc_cli::check::run_validate_command;
use stringloc_cli::config::{RunArgs, resolve_run};
use stringloc_cli::translate::run_translate_command;
use tracing_subscriber::EnvFilter;

/// A locale hit a fatal error.
const EXIT_FAILED: u8 = 1;
/// Bad input path, bad options, or nothing to process.
const EXIT_USAGE: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable the debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Machine-translate missing strings into every locale folder.
    Translate {
        #[command(flatten)]
        run: RunArgs,

        /// Translate every string again, ignoring existing locale files
        #[arg(short, long)]
        force: bool,
    },

    /// Check locale files for missing placeholders, empty strings and suspicious characters.
    Validate {
        #[command(flatten)]
        run: RunArgs,

        /// Also write every finding as JSON to this file
        #[arg(long)]
        report_json: Option<String>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Translate { .. } => "translate",
            Commands::Validate { .. } => "validate",
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "warn,stringloc=debug,stringloc_cli=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn usage_error(command: &str, message: &str) -> ExitCode {
    eprintln!("Error: {}\n", message);
    let mut cmd = Args::command();
    match cmd.find_subcommand_mut(command) {
        Some(sub) => eprintln!("{}", sub.render_help()),
        None => eprintln!("{}", cmd.render_help()),
    }
    ExitCode::from(EXIT_USAGE)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    let command = args.commands.name();

    let result = match args.commands {
        Commands::Translate { run, force } => {
            let resolved = match resolve_run(&run, force, args.verbose) {
                Ok(resolved) => resolved,
                Err(e) => return usage_error(command, &e),
            };
            GoogleWebTranslator::new()
                .map_err(|e| e.to_string())
                .and_then(|translator| run_translate_command(&resolved, &translator))
        }
        Commands::Validate { run, report_json } => {
            let resolved = match resolve_run(&run, false, args.verbose) {
                Ok(resolved) => resolved,
                Err(e) => return usage_error(command, &e),
            };
            run_validate_command(&resolved, report_json.as_deref().map(Path::new))
        }
    };

    match result {
        Ok(failed) if failed.is_empty() => ExitCode::SUCCESS,
        Ok(failed) => {
            eprintln!("Failed locales: {}", failed.join(", "));
            ExitCode::from(EXIT_FAILED)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FAILED)
        }
    }
}
