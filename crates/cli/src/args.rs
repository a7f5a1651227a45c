//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not load configuration (see `main`).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "routeros-cli")]
#[command(about = "Reconcile RouterOS configuration objects against a declared state", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  routeros-cli resources\n  routeros-cli schema bgp_template\n  routeros-cli create bgp_template --set name=edge --set as=65001\n  routeros-cli update bgp_template '*2' --file desired.json\n  routeros-cli import bgp_template edge -o yaml\n"
)]
pub struct Cli {
    /// Base URL of the device REST interface (e.g., https://192.168.88.1)
    #[arg(short, long, global = true, env = "ROUTEROS_BASE_URL")]
    pub base_url: Option<String>,

    /// Username for basic authentication
    #[arg(short, long, global = true, env = "ROUTEROS_USERNAME")]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(short, long, global = true, env = "ROUTEROS_PASSWORD")]
    pub password: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, env = "ROUTEROS_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Maximum number of retries for failed requests
    #[arg(long, global = true, env = "ROUTEROS_MAX_RETRIES")]
    pub max_retries: Option<usize>,

    /// Maximum number of concurrent requests against the device
    #[arg(long, global = true, env = "ROUTEROS_MAX_CONNECTIONS")]
    pub max_connections: Option<usize>,

    /// Upper bound for one reconciliation call, in seconds
    #[arg(long, global = true, env = "ROUTEROS_OPERATION_TIMEOUT")]
    pub operation_timeout: Option<u64>,

    /// Skip TLS certificate verification (for self-signed certificates)
    #[arg(long, global = true, env = "ROUTEROS_SKIP_VERIFY")]
    pub skip_verify: bool,

    /// Profile name to load from config file
    #[arg(long, global = true, env = "ROUTEROS_PROFILE")]
    pub profile: Option<String>,

    /// Path to a custom configuration file (overrides default location).
    ///
    /// Can also be set via ROUTEROS_CONFIG_PATH environment variable.
    #[arg(long, global = true, env = "ROUTEROS_CONFIG_PATH", value_name = "FILE")]
    pub config_path: Option<PathBuf>,

    /// Output format (table, json, yaml)
    #[arg(short, long, global = true, default_value = "table")]
    pub output: String,

    /// Output file path (saves results to file instead of stdout)
    #[arg(long, global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Serve Prometheus metrics on this address (e.g., 127.0.0.1:9090)
    #[arg(long, global = true, value_name = "ADDR")]
    pub metrics_bind: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Desired state given on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct DesiredArgs {
    /// JSON file with attribute values (names or device keys)
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Attribute assignment, repeatable (e.g., --set hold_time=90s --set input.filter=bgp-in)
    #[arg(short, long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List registered resource types
    Resources,

    /// Show the attributes of a resource type
    Schema {
        /// Resource type (e.g., bgp_template)
        #[arg(value_name = "TYPE")]
        resource: String,
    },

    /// Create a new item from the desired state
    Create {
        #[arg(value_name = "TYPE")]
        resource: String,

        #[command(flatten)]
        desired: DesiredArgs,
    },

    /// Read one item by identifier
    Read {
        #[arg(value_name = "TYPE")]
        resource: String,

        /// Item identifier (`*hex` id, or name for name-keyed types)
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Bring an existing item to the desired state
    Update {
        #[arg(value_name = "TYPE")]
        resource: String,

        #[arg(value_name = "ID")]
        id: String,

        #[command(flatten)]
        desired: DesiredArgs,

        /// Treat the input as the complete desired state instead of
        /// changes on top of the current values
        #[arg(long)]
        replace: bool,

        /// Only show the changes that would be written
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete an item (succeeds if it is already gone)
    Delete {
        #[arg(value_name = "TYPE")]
        resource: String,

        #[arg(value_name = "ID")]
        id: String,
    },

    /// Adopt an existing item by id or natural key
    Import {
        #[arg(value_name = "TYPE")]
        resource: String,

        /// `*hex` id, or the value of the type's natural key
        #[arg(value_name = "TOKEN")]
        token: String,
    },
}

impl Commands {
    /// Whether the command talks to a device and therefore needs a
    /// complete connection configuration.
    pub fn needs_device(&self) -> bool {
        !matches!(self, Commands::Resources | Commands::Schema { .. })
    }
}
