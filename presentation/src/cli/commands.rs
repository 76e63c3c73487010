//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for debate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Transcript, argument graph, camps and verdict
    Full,
    /// Verdict, camps, crux and concessions
    Summary,
    /// The full result as JSON
    Json,
}

impl From<OutputFormat> for dialectic_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => dialectic_domain::OutputFormat::Full,
            OutputFormat::Summary => dialectic_domain::OutputFormat::Summary,
            OutputFormat::Json => dialectic_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for dialectic
#[derive(Parser, Debug)]
#[command(name = "dialectic")]
#[command(author, version, about = "Dialectical debate engine - personas argue, a graph keeps score")]
#[command(long_about = r#"
Dialectic runs a structured debate between personas and tracks it as an
argumentation graph. Each turn is crystallized into arguments and attacks;
acceptance semantics decide which positions survive.

The debate moves through four phases:
1. Opening: every persona states a position
2. Exchange: claims and challenges
3. Crux Seeking: find the disagreement that matters
4. Resolution: concede or hold, until the debate converges

Turns come from a script (TOML or JSON). A recorded event log can be
replayed without running anything.

Configuration files are loaded from (in priority order):
1. DIALECTIC_* environment variables
2. --config <path>         Explicit config file
3. ./dialectic.toml        Project-level config
4. ~/.config/dialectic/config.toml   Global config

Example:
  dialectic --script cars.toml
  dialectic --script cars.toml --max-turns 8 --events run.jsonl -o full
  dialectic --replay run.jsonl -o json
"#)]
pub struct Cli {
    /// Debate script providing turns and crystallizations
    #[arg(short, long, value_name = "PATH", required_unless_present_any = ["replay", "show_config"])]
    pub script: Option<PathBuf>,

    /// Topic under debate (overrides the script's topic)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Participating personas, in opening order (can be specified multiple times)
    #[arg(short, long = "persona", value_name = "ID")]
    pub personas: Vec<String>,

    /// Turn budget (clamped to the script length)
    #[arg(long, value_name = "N")]
    pub max_turns: Option<usize>,

    /// Write the engine event stream as JSONL
    #[arg(long, value_name = "PATH")]
    pub events: Option<PathBuf>,

    /// Rebuild and print the result of a recorded event log
    #[arg(long, value_name = "PATH", conflicts_with = "script")]
    pub replay: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostics logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
