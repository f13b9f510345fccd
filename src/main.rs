//! meetsim - Business meeting simulator
//!
//! Entry point for the `meetsim` binary. A human types into stdin; a small
//! roster of AI personas answers in turns on stdout.

mod capability;
mod cli;
mod config;
mod error;
mod logging;
mod meeting;
mod persona;
mod report;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use crate::capability::build_capability;
use crate::cli::{Cli, Commands, MeetArgs};
use crate::config::{LoggingSettings, MeetingConfig};
use crate::error::{Error, Result};
use crate::logging::LogGuards;
use crate::meeting::{MeetingSession, OrchestratorSettings, TurnOrchestrator};
use crate::persona::{load_roster, Roster};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Version => {
            print_version();
            Ok(())
        }
        Commands::Config { subcommand } => {
            let _log_guards = init_default_logging(cli.verbose, cli.quiet)?;
            handle_config_command(subcommand)
        }
        Commands::Personas { config, roster } => {
            let mut cfg = MeetingConfig::load(config.as_deref())?;
            if let Some(path) = roster {
                cfg.roster.path = Some(path);
            }
            let _log_guards = logging::init_logging(&cfg.logging, cli.verbose, cli.quiet)?;
            list_personas(&cfg);
            Ok(())
        }
        Commands::Meet(args) => {
            let config = meeting_config(&args)?;
            let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| Error::Internal(format!("Failed to create async runtime: {}", e)))?;

            runtime.block_on(run_meeting(config, args))
        }
    }
}

fn init_default_logging(verbose: u8, quiet: bool) -> Result<LogGuards> {
    logging::init_logging(&LoggingSettings::default(), verbose, quiet)
}

fn print_version() {
    println!("meetsim {}", env!("CARGO_PKG_VERSION"));
    println!("{}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Load configuration and layer the `meet` flags on top
fn meeting_config(args: &MeetArgs) -> Result<MeetingConfig> {
    let mut config = MeetingConfig::load(args.config.as_deref())?;

    if let Some(ref provider) = args.provider {
        config.capability.provider = provider.clone();
    }
    if let Some(ref name) = args.user_name {
        config.meeting.user_name = name.clone();
    }
    if let Some(seed) = args.seed {
        config.meeting.seed = Some(seed);
    }
    if let Some(ref dir) = args.output_dir {
        config.export.output_dir = dir.clone();
    }
    if let Some(ref path) = args.roster {
        config.roster.path = Some(path.clone());
    }

    config.validate()?;
    Ok(config)
}

fn list_personas(config: &MeetingConfig) {
    let roster = load_roster(config.roster_path().as_deref());
    if roster.is_empty() {
        println!("No personas loaded.");
        return;
    }
    for persona in roster.iter() {
        println!("{}", persona);
    }
}

// ─────────────────────────────────────────────────────────────────
// Interactive meeting
// ─────────────────────────────────────────────────────────────────

/// Slash commands understood by the meeting loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MeetingCommand {
    End,
    Save,
    Reset,
    Quit,
}

impl MeetingCommand {
    fn parse(line: &str) -> Option<Self> {
        match line {
            "/end" => Some(MeetingCommand::End),
            "/save" => Some(MeetingCommand::Save),
            "/reset" => Some(MeetingCommand::Reset),
            "/quit" | "/exit" => Some(MeetingCommand::Quit),
            _ => None,
        }
    }
}

async fn run_meeting(config: MeetingConfig, args: MeetArgs) -> Result<()> {
    let roster = Arc::new(load_roster(config.roster_path().as_deref()));
    let capability = build_capability(&config.capability);
    let settings = OrchestratorSettings::from_config(&config);

    let mut orchestrator = match config.meeting.seed {
        Some(seed) => TurnOrchestrator::with_seed(capability, settings, seed),
        None => TurnOrchestrator::new(capability, settings),
    };

    let mut session = MeetingSession::new(config.meeting.user_name.clone());
    if !session.start(&args.topic) {
        return Err(Error::config_field_invalid("topic", "meeting topic cannot be empty"));
    }

    info!(
        session = %session.id(),
        personas = roster.len(),
        capability = orchestrator.capability_name(),
        "Meeting ready"
    );
    print_banner(&session, &roster);

    let output_dir = config.output_dir();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match MeetingCommand::parse(line) {
            Some(MeetingCommand::Quit) => {
                debug!("Quit requested");
                return Ok(());
            }
            Some(MeetingCommand::End) if !session.is_started() => {
                if let Some(summary) = session.summary() {
                    println!("{}", summary);
                }
            }
            Some(MeetingCommand::End) => {
                finish(&orchestrator, &mut session, &roster, &args, &output_dir).await;
            }
            Some(MeetingCommand::Save) => save_log_to(&output_dir, &session, &roster),
            Some(MeetingCommand::Reset) => {
                session.reset();
                session.start(&args.topic);
                println!("(meeting restarted)");
                print_banner(&session, &roster);
            }
            None => {
                if !session.is_started() {
                    println!("(the meeting has ended; /reset to start over or /quit)");
                    continue;
                }

                if !session.submit_human_line(line) {
                    continue;
                }
                let outcome = orchestrator.run_persona_turn(&mut session, &roster).await;
                if outcome.is_silent() {
                    println!("(no one responded)");
                    continue;
                }

                let entries = session.transcript().entries();
                for entry in &entries[entries.len() - outcome.appended..] {
                    println!("{}", entry.render());
                }
            }
        }
    }

    // EOF ends the meeting
    if session.is_started() {
        finish(&orchestrator, &mut session, &roster, &args, &output_dir).await;
    }

    Ok(())
}

fn print_banner(session: &MeetingSession, roster: &Roster) {
    println!("Meeting started: {}", session.topic());
    if roster.is_empty() {
        println!("(no personas available)");
    } else {
        println!("Participants: {}", roster.names().join(", "));
    }
}

/// End the meeting, print the summary and save what was asked for
async fn finish(
    orchestrator: &TurnOrchestrator,
    session: &mut MeetingSession,
    roster: &Roster,
    args: &MeetArgs,
    output_dir: &Path,
) {
    let Some(summary) = orchestrator.end_meeting(session).await else {
        return;
    };

    println!();
    println!("{}", summary);

    if args.save_log {
        save_log_to(output_dir, session, roster);
    }
    if args.save_summary {
        match report::save_summary(output_dir, &summary, Local::now()) {
            Ok(path) => println!("(summary saved to {})", path.display()),
            Err(e) => report_save_error(e),
        }
    }
}

fn save_log_to(dir: &Path, session: &MeetingSession, roster: &Roster) {
    match report::save_log(dir, session, roster, Local::now()) {
        Ok(path) => println!("(log saved to {})", path.display()),
        Err(e) => report_save_error(e),
    }
}

fn report_save_error(e: Error) {
    warn!(error = %e.format_for_log(), "Save failed");
    eprint!("{}", e.format_for_terminal());
}

// ─────────────────────────────────────────────────────────────────
// Configuration commands
// ─────────────────────────────────────────────────────────────────

/// Handle configuration subcommands
fn handle_config_command(subcommand: cli::ConfigSubcommand) -> Result<()> {
    use cli::ConfigSubcommand;

    match subcommand {
        ConfigSubcommand::Show { config } => {
            let mut cfg = MeetingConfig::load(config.as_deref())?;
            if !cfg.capability.api_key.is_empty() {
                cfg.capability.api_key = "********".to_string();
            }
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let created: PathBuf = config::init_config(path.as_deref(), force)?;
            println!("Configuration file created: {}", created.display());
        }
        ConfigSubcommand::Validate { config } => {
            MeetingConfig::load(config.as_deref())?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meeting_command_parse() {
        assert_eq!(MeetingCommand::parse("/end"), Some(MeetingCommand::End));
        assert_eq!(MeetingCommand::parse("/save"), Some(MeetingCommand::Save));
        assert_eq!(MeetingCommand::parse("/reset"), Some(MeetingCommand::Reset));
        assert_eq!(MeetingCommand::parse("/exit"), Some(MeetingCommand::Quit));
        assert_eq!(MeetingCommand::parse("end"), None);
        assert_eq!(MeetingCommand::parse("/end now"), None);
    }

    fn config_file(dir: &tempfile::TempDir, content: &str) -> Option<String> {
        let path = dir.path().join("meetsim.toml");
        std::fs::write(&path, content).unwrap();
        Some(path.to_string_lossy().to_string())
    }

    #[test]
    fn test_meet_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let args = MeetArgs {
            topic: "Pricing".to_string(),
            config: config_file(&dir, "[meeting]\nuser_name = \"Dana\"\nseed = 1\n"),
            provider: Some("mock".to_string()),
            user_name: Some("Kim".to_string()),
            seed: Some(9),
            output_dir: Some("/tmp/meetings".to_string()),
            ..Default::default()
        };
        let config = meeting_config(&args).unwrap();
        assert_eq!(config.capability.provider, "mock");
        assert_eq!(config.meeting.user_name, "Kim");
        assert_eq!(config.meeting.seed, Some(9));
        assert_eq!(config.output_dir(), PathBuf::from("/tmp/meetings"));
    }

    #[test]
    fn test_meet_flags_are_validated() {
        let dir = tempfile::tempdir().unwrap();
        let args = MeetArgs {
            topic: "Pricing".to_string(),
            config: config_file(&dir, ""),
            provider: Some("telepathy".to_string()),
            ..Default::default()
        };
        assert!(meeting_config(&args).is_err());
    }
}
