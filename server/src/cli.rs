//! Command-line interface definitions for the server.
//!
//! This module contains the CLI argument parsing structures and enums
//! used by the main server binary. Every service argument can also be
//! supplied through its environment variable.

use std::{env, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use floorboard_common::{DEFAULT_API_PORT, ENDPOINT_FILE_NAME};

/// Top-level command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands for the server.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the dashboard API service.
    ControlService(ServiceArgs),

    /// Print the allowed CORS origins for the current network state and exit.
    Origins {
        /// Operator-supplied extra origins, comma separated.
        #[arg(long, env = "CORS_ORIGINS")]
        cors_origins: Option<String>,
    },
}

/// Log output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
    Pretty,
}

/// Arguments for the control service command.
#[derive(Debug, Parser)]
pub struct ServiceArgs {
    /// Preferred listen port. The next free port above it is used if it is taken.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_API_PORT)]
    pub port: u16,

    /// Bind address for the listener.
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub bind: String,

    /// Extra allowed CORS origins, comma separated.
    #[arg(long, env = "CORS_ORIGINS")]
    pub cors_origins: Option<String>,

    /// Path to the floor data file (TOML).
    #[arg(long, env = "DATABASE_PATH", default_value = "floorboard.toml")]
    pub data: PathBuf,

    /// Secret for bearer-token authentication of the API.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Lifetime of issued bearer tokens.
    #[arg(long, env = "JWT_EXPIRES_IN", default_value = "24h")]
    pub jwt_expires_in: String,

    /// Where the resolved endpoint is published, relative to the working directory.
    #[arg(long, default_value = ENDPOINT_FILE_NAME)]
    pub endpoint_file: PathBuf,

    /// Marks the published endpoint as running inside the desktop wrapper.
    #[arg(long, env = "FLOORBOARD_ELECTRON")]
    pub electron: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::default())]
    pub log_format: LogFormat,
}
