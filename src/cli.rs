//! CLI - Command Line Interface for hlsdeck
//!
//! Scriptable access to the same catalog, source resolution and checkpoint
//! logic the TUI uses. Output is JSON when requested or when stdout is not a
//! terminal.
//!
//! # Examples
//!
//! ```bash
//! hlsdeck library --json
//! hlsdeck resolve Breaking_Bad Season_1 0
//! hlsdeck resolve Breaking_Bad Season_1 0 --no-adaptive
//! hlsdeck progress --clear
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::{PlaybackCheckpoint, ResolvedSource};
use crate::stream::PlayerKind;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Backend unreachable or HTTP failure
    NetworkError = 3,
    /// Series, season or episode not in the catalog
    NotFound = 4,
    /// Episode has no playable locator
    NoSource = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// hlsdeck - terminal browser and player for an HLS media library
///
/// Run without arguments to launch the interactive TUI.
#[derive(Parser, Debug)]
#[command(
    name = "hlsdeck",
    version,
    author = "Gorka & Hermes",
    about = "Terminal browser and player for an HLS media library",
    long_about = "Browse series and seasons served by an HLS backend, play \
                  episodes in mpv and pick up where you left off.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  hlsdeck                                   Launch interactive TUI\n\
                  hlsdeck library --json                    Dump the catalog\n\
                  hlsdeck resolve Show Season_1 0           Print the stream URL\n\
                  hlsdeck progress                          Show the resume point"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Backend origin, e.g. http://nas.local:8000
    #[arg(long, global = true)]
    pub origin: Option<String>,

    /// Media element for the TUI
    #[arg(long, value_enum, global = true)]
    pub player: Option<PlayerKind>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch and print the catalog
    #[command(visible_alias = "ls")]
    Library(LibraryCmd),

    /// Print the stream URL an episode would play from
    #[command(visible_alias = "r")]
    Resolve(ResolveCmd),

    /// Show or clear the stored resume point
    #[command(visible_alias = "p")]
    Progress(ProgressCmd),
}

/// Library listing options
#[derive(Args, Debug)]
pub struct LibraryCmd {
    /// Only list this series
    #[arg(long, short = 's')]
    pub series: Option<String>,
}

/// Source resolution for one episode
#[derive(Args, Debug)]
pub struct ResolveCmd {
    /// Series key as it appears in the catalog
    pub series: String,

    /// Season key
    pub season: String,

    /// Zero-based episode position within the season
    pub index: usize,

    /// Assume the player can play HLS manifests (default)
    #[arg(long, overrides_with = "no_adaptive")]
    pub adaptive: bool,

    /// Assume the player can only play progressive files
    #[arg(long = "no-adaptive", overrides_with = "adaptive")]
    pub no_adaptive: bool,
}

impl ResolveCmd {
    /// Adaptive support unless `--no-adaptive` was the last word
    pub fn supports_adaptive(&self) -> bool {
        !self.no_adaptive
    }
}

/// Checkpoint inspection
#[derive(Args, Debug)]
pub struct ProgressCmd {
    /// Remove the stored checkpoint
    #[arg(long)]
    pub clear: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// `resolve` result
#[derive(Debug, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub series: String,
    pub season: String,
    pub index: usize,
    pub name: String,
    #[serde(flatten)]
    pub source: ResolvedSource,
}

/// `progress` result
#[derive(Debug, Serialize, Deserialize)]
pub struct ProgressResponse {
    /// Stored checkpoint, if any
    pub checkpoint: Option<PlaybackCheckpoint>,
    /// Episode name when the checkpoint matches the catalog
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,
    /// Whether the checkpoint would trigger a resume prompt; `None` when the
    /// catalog could not be fetched
    pub valid: Option<bool>,
    /// Set by `--clear`
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cleared: bool,
}

// =============================================================================
// Output Helper
// =============================================================================

/// Output helper for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data wrapped in the JSON envelope
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        let output = JsonOutput::success(data);
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Print a plain line (human mode)
    pub fn line(&self, msg: impl std::fmt::Display) {
        println!("{}", msg);
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Catalog keys are used as-is; reject ones that cannot exist
pub fn validate_key(key: &str) -> Result<&str, &'static str> {
    if key.trim().is_empty() {
        Err("Catalog key must not be empty")
    } else {
        Ok(key)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from::<_, &str>([]);
        assert!(!cli.is_cli_mode());
    }

    #[test]
    fn test_resolve_command() {
        let cli = Cli::parse_from(["hlsdeck", "resolve", "Show", "Season_1", "3"]);
        if let Some(Command::Resolve(cmd)) = cli.command {
            assert_eq!(cmd.series, "Show");
            assert_eq!(cmd.season, "Season_1");
            assert_eq!(cmd.index, 3);
            assert!(cmd.supports_adaptive());
        } else {
            panic!("Expected Resolve command");
        }
    }

    #[test]
    fn test_last_adaptive_flag_wins() {
        let cli = Cli::parse_from(["hlsdeck", "resolve", "A", "B", "0", "--adaptive", "--no-adaptive"]);
        let Some(Command::Resolve(cmd)) = cli.command else {
            panic!("Expected Resolve command");
        };
        assert!(!cmd.supports_adaptive());

        let cli = Cli::parse_from(["hlsdeck", "resolve", "A", "B", "0", "--no-adaptive", "--adaptive"]);
        let Some(Command::Resolve(cmd)) = cli.command else {
            panic!("Expected Resolve command");
        };
        assert!(cmd.supports_adaptive());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "hlsdeck",
            "--json",
            "--quiet",
            "--origin",
            "http://nas:8000",
            "--player",
            "headless",
            "library",
        ]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.origin.as_deref(), Some("http://nas:8000"));
        assert_eq!(cli.player, Some(PlayerKind::Headless));
    }

    #[test]
    fn test_negative_index_rejected() {
        assert!(Cli::try_parse_from(["hlsdeck", "resolve", "A", "B", "-1"]).is_err());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("Season_1").is_ok());
        assert!(validate_key("  ").is_err());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
        assert_eq!(i32::from(ExitCode::NoSource), 5);
    }

    #[test]
    fn test_json_output_skips_zero_exit() {
        let out = serde_json::to_value(JsonOutput::success(1)).unwrap();
        assert!(out.get("exit_code").is_none());
        let err = serde_json::to_value(JsonOutput::<()>::error_msg("x", ExitCode::NotFound)).unwrap();
        assert_eq!(err["exit_code"], 4);
    }
}
