//! CLI frontend for Inkwell story interviews.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ink",
    about = "Inkwell: guided interviews that turn conversation into story notes",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interview script interactively
    Run {
        /// Script id (see `ink scripts`)
        script: String,

        /// Story project root that artifacts are written under
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Engine config file (default: <root>/ink.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory of additional or overriding script files
        #[arg(long)]
        scripts_dir: Option<PathBuf>,
    },

    /// List available interview scripts
    Scripts {
        /// Directory of additional or overriding script files
        #[arg(long)]
        scripts_dir: Option<PathBuf>,
    },

    /// Show the categories and questions of a script
    Show {
        /// Script id
        script: String,

        /// Directory of additional or overriding script files
        #[arg(long)]
        scripts_dir: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            script,
            root,
            config,
            scripts_dir,
        } => commands::run::run(
            &script,
            root.as_deref(),
            config.as_deref(),
            scripts_dir.as_deref(),
        ),
        Commands::Scripts { scripts_dir } => commands::scripts::run(scripts_dir.as_deref()),
        Commands::Show {
            script,
            scripts_dir,
        } => commands::show::run(&script, scripts_dir.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
