//! Command-line interface for the display client.
//!
//! Global options shape endpoint resolution and the shared settings store; every one of them
//! can also come from its environment variable.

use std::{env, path::PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use floorboard_common::{DEFAULT_API_PORT, PROBE_PORTS};

/// Top-level CLI parser for the display client.
#[derive(Debug, Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    #[command(flatten)]
    pub options: DisplayOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct DisplayOptions {
    /// API base URL to use verbatim, skipping discovery.
    #[arg(long, global = true, env = "FLOORBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Port of the static fallback `http://localhost:<port>/api`.
    #[arg(long, global = true, env = "FLOORBOARD_API_PORT", default_value_t = DEFAULT_API_PORT)]
    pub api_port: u16,

    /// Settings file shared by every display on this machine.
    #[arg(
        long,
        global = true,
        env = "FLOORBOARD_STORE",
        default_value = "floorboard-display.json"
    )]
    pub store: PathBuf,

    /// Probe loopback addresses before network addresses.
    #[arg(long, global = true, env = "FLOORBOARD_LOOPBACK_FIRST")]
    pub loopback_first: bool,

    /// Host the dashboard was served from, probed first.
    #[arg(long, global = true, env = "FLOORBOARD_PAGE_HOST")]
    pub page_host: Option<String>,

    /// Ports tried on every candidate host, comma separated.
    #[arg(
        long,
        global = true,
        env = "FLOORBOARD_PROBE_PORTS",
        value_delimiter = ',',
        default_values_t = PROBE_PORTS.to_vec()
    )]
    pub probe_ports: Vec<u16>,

    /// Timeout of a single discovery probe.
    #[arg(long, global = true, default_value_t = 1500)]
    pub probe_timeout_ms: u64,

    /// How often floors and shared settings are refreshed.
    #[arg(long, global = true, default_value_t = 5)]
    pub poll_interval_secs: u64,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::default())]
    pub log_format: LogFormat,
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
    Pretty,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the floors assigned to one screen, updating as data and settings change.
    Show {
        /// 1-based screen index.
        #[arg(long, default_value_t = 1)]
        screen: u32,
    },

    /// Rotate through all screens on a timer.
    Carousel,

    /// Change a setting for every display.
    #[command(subcommand)]
    Set(SetCommand),

    /// Print the resolved API base URL and how it was found.
    Resolve,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum SetCommand {
    /// Number of screens the floors are spread over.
    Screens { count: u64 },
    /// Carousel rotation interval in milliseconds.
    Speed { ms: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_with_global_options() {
        let cli = Cli::try_parse_from([
            "display",
            "show",
            "--screen",
            "2",
            "--api-url",
            "http://10.0.0.2:1337/api",
            "--loopback-first",
        ])
        .unwrap();
        assert!(
            matches!(cli.command, Command::Show { screen: 2 }),
            "unexpected command: {:?}",
            cli.command
        );
        assert_eq!(cli.options.api_url.as_deref(), Some("http://10.0.0.2:1337/api"));
        assert!(cli.options.loopback_first, "flag must be picked up");
    }

    #[test]
    fn discovery_ports_default_and_override() {
        let cli = Cli::try_parse_from(["display", "resolve"]).unwrap();
        assert_eq!(cli.options.probe_ports, PROBE_PORTS);

        let cli = Cli::try_parse_from(["display", "resolve", "--probe-ports", "4000,4001"]).unwrap();
        assert_eq!(cli.options.probe_ports, [4000, 4001]);
    }

    #[test]
    fn set_subcommands() {
        let cli = Cli::try_parse_from(["display", "set", "speed", "2500"]).unwrap();
        assert!(
            matches!(cli.command, Command::Set(SetCommand::Speed { ms: 2500 })),
            "unexpected command: {:?}",
            cli.command
        );
        let cli = Cli::try_parse_from(["display", "set", "screens", "3"]).unwrap();
        assert!(
            matches!(cli.command, Command::Set(SetCommand::Screens { count: 3 })),
            "unexpected command: {:?}",
            cli.command
        );
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert!(
            Cli::try_parse_from(["display", "set", "screens", "many"]).is_err(),
            "non-numeric count must fail to parse"
        );
    }
}
