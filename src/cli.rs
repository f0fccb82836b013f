// Command-line surface. Parsing only: turning these flags into a usable
// configuration happens in `config`.

use clap::{ArgAction, CommandFactory, Parser};
use std::path::PathBuf;

/// Upload images and MP3s to LPix and print the BBCode for each one.
#[derive(Parser, Debug, Default)]
#[command(name = "lpix-send", version, about)]
pub struct Args {
    /// Files to upload, in order
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Append the resulting [img] codes to this file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Append the resulting [timg] codes to this file
    #[arg(long, value_name = "FILE")]
    pub tlog: Option<PathBuf>,

    /// Gallery to store uploaded images in [default: Default]
    #[arg(long, value_name = "NAME")]
    pub gallery: Option<String>,

    /// Configuration file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Account name, overrides the configuration
    #[arg(long, value_name = "NAME")]
    pub username: Option<String>,

    /// Per-file upload limit of the account, in MB
    #[arg(long, value_name = "MB")]
    pub limit_mb: Option<u64>,

    /// API endpoint to post to
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log filter derived from `-v` occurrences.
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

/// Generated usage text.
pub fn usage() -> String {
    Args::command().render_help().to_string()
}

/// Print usage to stderr; stdout only ever carries BBCode.
pub fn print_usage() {
    eprintln!("{}", usage());
}
