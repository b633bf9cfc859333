//! CLI Adapter.

mod generate;
mod input;
mod markers;
mod wizard;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::AppError;

#[derive(Parser)]
#[command(name = "vsp")]
#[command(version)]
#[command(
    about = "Turn a video script and a visual prompt template into numbered Source Context / Prompt lists",
    long_about = None
)]
struct Cli {
    /// Configuration file (defaults to ./vsp.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Use the offline mock service instead of the Gemini API
    #[arg(long, global = true)]
    mock: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step through script, template and theme input, then keep adding script chunks
    #[clap(visible_alias = "w")]
    Wizard {
        /// Write the transcript to this file when the session ends
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Generate prompts non-interactively from files
    #[clap(visible_alias = "g")]
    Generate {
        /// Script content file
        #[arg(short, long)]
        script: PathBuf,
        /// "Prompt Visual Image" template file
        #[arg(short, long)]
        template: PathBuf,
        /// Theme substituted into the template
        #[arg(long)]
        theme: String,
        /// Further script chunk files, sent in order on the same session
        #[arg(short, long = "next")]
        next: Vec<PathBuf>,
        /// Write the transcript to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report the highest Source Context / Prompt numbers in a transcript
    #[clap(visible_alias = "m")]
    Markers {
        /// Transcript file
        file: PathBuf,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<(), AppError> = match cli.command {
        Commands::Wizard { output } => {
            wizard::run_wizard(cli.config.as_deref(), cli.mock, output.as_deref())
        }
        Commands::Generate { script, template, theme, next, output } => {
            let args = generate::GenerateArgs { script, template, theme, next, output };
            generate::run_generate(cli.config.as_deref(), cli.mock, args)
        }
        Commands::Markers { file } => markers::run_markers(&file),
    };

    if let Err(e) = result {
        log::debug!("Command failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}
