//! Configuration for the huffpuff binary.
//!
//! Command-line arguments are parsed with clap, then resolved into a
//! [`Config`]: defaults filled in, paths checked, the sample seed fixed. A
//! generated sample always reports its seed so the run can be repeated.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use huffpuff_core::{Error, Result};
use log::LevelFilter;

use crate::input_gen::Profile;

/// Text used by `codes` when no input is given.
pub const DEFAULT_CODES_TEXT: &str = "aaabbcdeffff";

/// Raw command line.
#[derive(Parser, Debug)]
#[command(name = "huffpuff", version, about = "Huffman-compress files and inspect code tables")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print a compression summary
    #[arg(long, global = true)]
    pub stats: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compress a file into a huffpuff container
    Compress {
        /// File to compress
        input: PathBuf,
        /// Container to write
        output: PathBuf,
    },
    /// Restore the original file from a container
    Decompress {
        /// Container to read
        input: PathBuf,
        /// File to write
        output: PathBuf,
    },
    /// Print the frequency and code table of some input
    Codes {
        /// Literal text to analyze
        #[arg(long, conflicts_with = "input")]
        text: Option<String>,
        /// File to analyze
        #[arg(long = "in")]
        input: Option<PathBuf>,
    },
    /// Write generated sample input
    Sample {
        /// File to write
        #[arg(long)]
        out: PathBuf,
        /// Random seed (default: time-based, printed)
        #[arg(long)]
        seed: Option<u64>,
        /// Number of bytes to generate
        #[arg(long, default_value_t = 65536)]
        size: usize,
        /// Statistical shape of the data
        #[arg(long, value_enum, default_value_t = Profile::Mixed)]
        profile: Profile,
    },
}

/// Where `codes` reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodesSource {
    Text(String),
    File(PathBuf),
}

/// A resolved action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Compress { input: PathBuf, output: PathBuf },
    Decompress { input: PathBuf, output: PathBuf },
    Codes { source: CodesSource },
    Sample { out: PathBuf, seed: u64, size: usize, profile: Profile },
}

/// Complete configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level installed for `env_logger` (RUST_LOG still overrides)
    pub log_level: LevelFilter,

    /// Whether to print the compression summary
    pub print_stats: bool,

    pub action: Action,
}

impl Config {
    /// Resolve parsed arguments.
    ///
    /// # Errors
    /// `Error::Config` if an input and output path are the same file name.
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let log_level = match cli.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };

        let action = match cli.command {
            Command::Compress { input, output } => {
                check_distinct(&input, &output)?;
                Action::Compress { input, output }
            }
            Command::Decompress { input, output } => {
                check_distinct(&input, &output)?;
                Action::Decompress { input, output }
            }
            Command::Codes { text, input } => Action::Codes {
                source: match (text, input) {
                    (_, Some(path)) => CodesSource::File(path),
                    (Some(text), None) => CodesSource::Text(text),
                    (None, None) => CodesSource::Text(DEFAULT_CODES_TEXT.to_string()),
                },
            },
            Command::Sample {
                out,
                seed,
                size,
                profile,
            } => Action::Sample {
                out,
                seed: seed.unwrap_or_else(time_seed),
                size,
                profile,
            },
        };

        Ok(Self {
            log_level,
            print_stats: cli.stats,
            action,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.action {
            Action::Compress { input, output } => {
                println!("Compress: {} -> {}", input.display(), output.display());
            }
            Action::Decompress { input, output } => {
                println!("Decompress: {} -> {}", input.display(), output.display());
            }
            Action::Codes { source } => match source {
                CodesSource::Text(text) => println!("Codes for text: {text:?}"),
                CodesSource::File(path) => println!("Codes for file: {}", path.display()),
            },
            Action::Sample {
                out,
                seed,
                size,
                profile,
            } => {
                println!("Sample: {} ({} bytes, {:?})", out.display(), size, profile);
                println!("Seed: {seed}");
            }
        }
        println!("Log level: {}", self.log_level);
        println!();
    }
}

fn check_distinct(input: &Path, output: &Path) -> Result<()> {
    if input == output {
        return Err(Error::Config(format!(
            "input and output are the same path: {}",
            input.display()
        )));
    }
    Ok(())
}

fn time_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
