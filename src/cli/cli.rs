use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{ColorMode, LogLevel};

/// Navigate an in-memory directory tree with cd, pwd, ls, mkdir and rmdir
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// File to read commands from instead of standard input
    pub script: Option<PathBuf>,
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// YAML file with the root name, color mode and an initial tree
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Overrides the color mode from the config file
    #[clap(long, value_enum)]
    pub color: Option<ColorMode>,
}
