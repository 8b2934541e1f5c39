use clap::Parser;
use std::env;

use crate::cli::command::Command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Group and count employees stored in SQLite",
    long_about = "Seeds an employee table, counts employees grouped by any of their fields with optional filters, and serves the same query over REST.",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[arg(
        long,
        env = "GROUPCOUNT_DATA_DIR",
        default_value = ".groupcount/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        long = "log-file",
        env = "GROUPCOUNT_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    match dotenvy::from_filename(&dotenv_path) {
        Ok(_) => log::debug!("Loaded env from {}", dotenv_path),
        Err(_) => log::debug!("No env file at {}", dotenv_path),
    }
    Cli::parse()
}
