//! Clap derive structures for the `candela` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

use candela_core::{ApiMode, Direction};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// candela -- drive candlestick RGB lighting controllers from a terminal
#[derive(Debug, Parser)]
#[command(
    name = "candela",
    version,
    about = "Control candlestick RGB lighting controllers from the command line",
    long_about = "List candlesticks registered with a backend, inspect their state,\n\
        send program/speed/direction/color commands, and follow the\n\
        active candlestick's connection status live.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL (overrides backend_url from the config file)
    #[arg(long, short = 'b', global = true)]
    pub backend: Option<String>,

    /// Target candlestick id (defaults to default_device_id)
    #[arg(long, short = 'd', global = true)]
    pub device: Option<String>,

    /// Backend API flavor
    #[arg(long, global = true)]
    pub mode: Option<ModeArg>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format (defaults to `output` from the config file)
    #[arg(long, short = 'o', global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,
}

// ── Value enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Multi-device registry API
    Registry,
    /// Single-device predecessor API
    Legacy,
}

impl From<ModeArg> for ApiMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Registry => ApiMode::Registry,
            ModeArg::Legacy => ApiMode::Legacy,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Up,
    Down,
    Left,
    Right,
}

impl From<DirectionArg> for Direction {
    fn from(d: DirectionArg) -> Self {
        match d {
            DirectionArg::Up => Direction::Up,
            DirectionArg::Down => Direction::Down,
            DirectionArg::Left => Direction::Left,
            DirectionArg::Right => Direction::Right,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List candlesticks known to the backend
    #[command(alias = "ls")]
    Devices,

    /// Show one candlestick's current state
    Get {
        /// Candlestick id
        id: String,
    },

    /// Send a command to a candlestick
    Send(SendArgs),

    /// Poll the backend and print the active candlestick's status as it changes
    Watch(WatchArgs),

    /// Check backend health
    Health,

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct SendArgs {
    /// Lighting program (rainbow, bounce, fall, police, wave, static_color, random, stop)
    #[arg(long, short = 'p')]
    pub program: Option<String>,

    /// Animation speed
    #[arg(long, short = 's', value_parser = clap::value_parser!(u8).range(3..=40))]
    pub speed: Option<u8>,

    /// Animation direction
    #[arg(long)]
    pub direction: Option<DirectionArg>,

    /// Color as #rrggbb
    #[arg(long, short = 'c')]
    pub color: Option<String>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in milliseconds (overrides poll_interval_ms)
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,
    /// Print the effective configuration (file + env + flags) as TOML
    Show,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
