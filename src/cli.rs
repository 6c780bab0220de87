//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, register, deregister, validate, health), and their
//! associated argument structs. Every flag has an environment variable
//! equivalent for container deployments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "hermes",
    version,
    about = "Round-robin request broker",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        hermes run                                   Broker on :8080, control on :9000\n  \
        hermes register --port 8081 --mount /media   Announce a backend\n  \
        hermes health                                Check a running broker"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the broker
    Run(Box<RunArgs>),

    /// Register a backend with a running broker
    Register(BackendArgs),

    /// Withdraw a backend from a running broker
    Deregister(BackendArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        hermes run                                Auto-detect config\n  \
        hermes run -c hermes.yaml                 Specific config file\n  \
        hermes run -p 8000 --control-port 9100    Custom ports")]
pub struct RunArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// HTTP listen port [default: 8080]
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// HTTP listen address [default: 0.0.0.0]
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Registration listen port [default: 9000]
    #[arg(long, env = "CONTROL_PORT")]
    pub control_port: Option<u16>,

    /// Registration listen address [default: 0.0.0.0]
    #[arg(long, env = "CONTROL_HOST")]
    pub control_host: Option<String>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Backend call timeout in milliseconds [default: 5000]
    #[arg(long, env = "REQUEST_TIMEOUT_MS", help_heading = "Tuning")]
    pub timeout: Option<u64>,

    /// Max request body size in bytes [default: 1048576]
    #[arg(long, env = "MAX_BODY_SIZE", help_heading = "Tuning")]
    pub max_body: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct BackendArgs {
    /// Broker control address (<ip>:<port>)
    #[arg(short, long, env = "BROKER_ADDRESS", default_value = "127.0.0.1:9000")]
    pub broker: String,

    /// Address the broker should forward to
    #[arg(short, long, env = "BACKEND_ADDRESS", default_value = "127.0.0.1")]
    pub address: String,

    /// Port the backend serves on
    #[arg(short, long, env = "BACKEND_PORT", default_value_t = 8081)]
    pub port: u16,

    /// Numeric backend id
    #[arg(long, env = "BACKEND_ID", default_value_t = 0)]
    pub id: u32,

    /// Mount path the backend serves
    #[arg(short, long, env = "BACKEND_MOUNT", default_value = "/default")]
    pub mount: String,

    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "hermes.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8080")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn register_defaults_match_backend_conventions() {
        let cli = Cli::try_parse_from(["hermes", "register"]).unwrap();
        let Some(Commands::Register(args)) = cli.command else {
            panic!("expected register");
        };
        assert_eq!(args.broker, "127.0.0.1:9000");
        assert_eq!(args.port, 8081);
        assert_eq!(args.id, 0);
        assert_eq!(args.mount, "/default");
    }

    #[test]
    fn run_flags_are_optional_overrides() {
        let cli = Cli::try_parse_from(["hermes", "run", "--control-port", "9100"]).unwrap();
        let Some(Commands::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.control_port, Some(9100));
        assert!(args.timeout.is_none());
    }
}
