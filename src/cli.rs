//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for meetsim.

use clap::{Args, Parser, Subcommand};

/// meetsim - Business meeting simulator
///
/// Hold a meeting with a small panel of AI personas. Each line you type is
/// answered by the persona you addressed, or by one or two of them chosen
/// at random.
#[derive(Parser, Debug)]
#[command(name = "meetsim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive meeting on stdin/stdout
    Meet(MeetArgs),

    /// List the persona roster
    Personas {
        /// Path to configuration file
        #[arg(short, long, env = "MEETSIM_CONFIG")]
        config: Option<String>,

        /// Roster file (JSON array of {"name", "mbti"} records)
        #[arg(long)]
        roster: Option<String>,
    },

    /// Display version information
    Version,

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

/// Options for an interactive meeting
#[derive(Args, Debug, Clone, Default)]
pub struct MeetArgs {
    /// Meeting topic
    #[arg(short, long)]
    pub topic: String,

    /// Path to configuration file
    #[arg(short, long, env = "MEETSIM_CONFIG")]
    pub config: Option<String>,

    /// Roster file (overrides the configured roster)
    #[arg(long)]
    pub roster: Option<String>,

    /// Capability provider: openai, mock, none
    #[arg(long)]
    pub provider: Option<String>,

    /// Your display name in the transcript
    #[arg(long)]
    pub user_name: Option<String>,

    /// Seed for reproducible speaker selection
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory for saved logs and summaries
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Save the meeting log when the meeting ends
    #[arg(long)]
    pub save_log: bool,

    /// Save the summary when the meeting ends
    #[arg(long)]
    pub save_summary: bool,
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the current configuration
    Show {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate a configuration file
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        config: Option<String>,
    },
}
