use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use cmd::commands::{apply_command, run_command, show_command, verify_command};

#[derive(Parser)]
#[command(author, version, about = "Record and replay codemod runs", long_about = None)]
#[command(name = "codemill")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunArgs {
    /// Directory to dry-run over (never modified)
    target: PathBuf,
    /// Suffix rename rule, e.g. ".txt=.md"
    #[arg(long)]
    rename: String,
    /// Extra key=value arguments recorded with the case
    #[arg(long = "arg")]
    args: Vec<String>,
    /// Directory receiving the case file and payload data
    #[arg(short, long, default_value = "case-out")]
    output: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Dry-run the built-in suffix-rename codemod and record the case
    Run(RunArgs),
    /// Display a recorded case, tolerating partial captures
    Show {
        /// Path to the case file
        case: PathBuf,
    },
    /// Recompute every checksum in a recorded case
    Verify {
        /// Path to the case file
        case: PathBuf,
    },
    /// Replay a recorded case against a directory
    Apply {
        /// Path to the case file
        case: PathBuf,
        /// Directory the jobs are replayed into
        #[arg(long)]
        root: PathBuf,
        /// Replay an unsealed case with whatever jobs were recovered
        #[arg(long)]
        allow_partial: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    diagnostics::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run_command(args.target, &args.rename, &args.args, args.output).await,
        Commands::Show { case } => show_command(&case).await,
        Commands::Verify { case } => verify_command(&case).await,
        Commands::Apply {
            case,
            root,
            allow_partial,
        } => apply_command(&case, root, allow_partial).await,
    }
}
