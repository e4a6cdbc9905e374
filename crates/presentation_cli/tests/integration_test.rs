//! Integration tests for CLI
//!
//! These tests verify CLI functionality without running actual commands,
//! but instead test the command parsing and structure.

#![allow(clippy::panic)] // Allow panic! in tests for clear failure messages

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

// Mock CLI structure for testing (mirrors main.rs)
#[derive(Parser)]
#[command(name = "busboard")]
#[command(author, version, about = "AtB bus departure monitor", long_about = None)]
struct Cli {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    Run {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    Poll {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    CheckConfig {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    ParseTime {
        value: String,
        #[arg(short, long, default_value = "Europe/Oslo")]
        timezone: String,
    },
}

fn parse_args(args: &[&str]) -> Result<Cli, clap::Error> {
    let os_args: Vec<OsString> = args.iter().map(OsString::from).collect();
    Cli::try_parse_from(os_args)
}

#[test]
fn cli_parses_run_command() {
    let cli = parse_args(&["busboard", "run"]).unwrap();
    if let Commands::Run { config } = cli.command {
        assert!(config.is_none());
    } else {
        panic!("Expected Run command");
    }
}

#[test]
fn cli_parses_run_with_config() {
    let cli = parse_args(&["busboard", "run", "--config", "/etc/busboard.toml"]).unwrap();
    if let Commands::Run { config } = cli.command {
        assert_eq!(config, Some(PathBuf::from("/etc/busboard.toml")));
    } else {
        panic!("Expected Run command");
    }
}

#[test]
fn cli_parses_poll_with_short_config() {
    let cli = parse_args(&["busboard", "poll", "-c", "stops.toml"]).unwrap();
    if let Commands::Poll { config } = cli.command {
        assert_eq!(config, Some(PathBuf::from("stops.toml")));
    } else {
        panic!("Expected Poll command");
    }
}

#[test]
fn cli_parses_check_config_command() {
    let cli = parse_args(&["busboard", "check-config"]).unwrap();
    assert!(matches!(cli.command, Commands::CheckConfig { config: None }));
}

#[test]
fn cli_parses_parse_time_command() {
    let cli = parse_args(&["busboard", "parse-time", "2021-03-01T08:15:00"]).unwrap();
    if let Commands::ParseTime { value, timezone } = cli.command {
        assert_eq!(value, "2021-03-01T08:15:00");
        assert_eq!(timezone, "Europe/Oslo");
    } else {
        panic!("Expected ParseTime command");
    }
}

#[test]
fn cli_parses_parse_time_with_timezone() {
    let cli = parse_args(&[
        "busboard",
        "parse-time",
        "2021-07-01 12:00",
        "--timezone",
        "UTC",
    ])
    .unwrap();
    if let Commands::ParseTime { value, timezone } = cli.command {
        assert_eq!(value, "2021-07-01 12:00");
        assert_eq!(timezone, "UTC");
    } else {
        panic!("Expected ParseTime command");
    }
}

#[test]
fn cli_parse_time_requires_value() {
    let result = parse_args(&["busboard", "parse-time"]);
    assert!(result.is_err());
}

#[test]
fn cli_parses_verbose_flag() {
    let cli = parse_args(&["busboard", "-v", "poll"]).unwrap();
    assert_eq!(cli.verbose, 1);
}

#[test]
fn cli_parses_multiple_verbose_flags() {
    let cli = parse_args(&["busboard", "-vvv", "run"]).unwrap();
    assert_eq!(cli.verbose, 3);
}

#[test]
fn cli_requires_subcommand() {
    let result = parse_args(&["busboard"]);
    assert!(result.is_err());
}

#[test]
fn cli_rejects_unknown_subcommand() {
    let result = parse_args(&["busboard", "status"]);
    assert!(result.is_err());
}
