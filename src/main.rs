mod calc;
mod cmd;
mod data;
mod ui;

use clap::{Parser, Subcommand};
use data::Store;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tlog", about = "time logging")]
struct Cli {
    /// Path to the data directory containing config and data files (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize data files from config
    Init,
    /// Print time logs and a summary for a date range
    Logs {
        /// Range start (YYYY-MM-DD); defaults to the current month
        #[arg(long)]
        from: Option<String>,
        /// Range end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Export time logs for a date range as CSV
    Export {
        /// Range start (YYYY-MM-DD); defaults to the current month
        #[arg(long)]
        from: Option<String>,
        /// Range end (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,
    },
    /// List all projects
    Projects,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Resolve data_dir to an absolute path so file I/O works regardless of
    // future directory changes within the process.
    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    let store = Store::new(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run(&store)?;
    }

    match cli.command {
        None => cmd::root::run(&store),
        Some(Commands::Init) => cmd::init::run(&store),
        Some(Commands::Logs { from, to }) => cmd::logs::run(&store, from, to),
        Some(Commands::Export { from, to, output }) => cmd::export::run(&store, from, to, output),
        Some(Commands::Projects) => cmd::projects::run(&store),
    }
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &std::path::Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
