//! CLI entry point for mosyle — a Mosyle device-management API client.
//!
//! Builds a client from the mode/credential flags, dispatches one of the
//! three device operations, and prints the API's JSON response
//! pretty-formatted to stdout.
//!
//! Exit codes:
//! - 0: success
//! - 1: runtime error (bad mode, auth rejection, API error, etc.)
//! - 2: argument validation error (clap handles this automatically)

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use mosyle::client::MosyleClient;
use mosyle::devices::{get_device, list_devices, update_device};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// API variant to target: "business" or "school".
    #[arg(long, default_value = "business")]
    mode: String,

    /// Mosyle integration access token. Prefer setting via the
    /// MOSYLE_ACCESS_TOKEN environment variable to avoid exposing the
    /// token in process listings and shell history.
    #[arg(long, env = "MOSYLE_ACCESS_TOKEN")]
    token: String,

    /// Admin account email. Required by the Business API variant, which
    /// authenticates every request from the body; ignored by the Manager
    /// (school) variant.
    #[arg(long, env = "MOSYLE_EMAIL", default_value = "")]
    email: String,

    /// Admin account password. Same scope as --email. Prefer the
    /// MOSYLE_PASSWORD environment variable.
    #[arg(long, env = "MOSYLE_PASSWORD", default_value = "")]
    password: String,

    /// Operating-system filter for the targeted devices
    /// ("macos", "ios", or "tvos").
    #[arg(long, default_value = "macos")]
    os: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List devices, optionally narrowed by additional filters.
    List {
        /// Extra filter entry as KEY=VALUE, repeatable. The value is
        /// parsed as JSON when possible (e.g. --filter 'tags=["Lab"]'),
        /// otherwise passed as a string.
        #[arg(long = "filter", value_name = "KEY=VALUE")]
        filters: Vec<String>,
    },

    /// Fetch a single device record by serial number.
    Get {
        /// Hardware serial number of the device.
        #[arg(long)]
        serial: String,
    },

    /// Update attributes of a device record.
    Update {
        /// Hardware serial number of the device to update.
        #[arg(long)]
        serial: String,

        /// Attribute to set as KEY=VALUE, repeatable; at least one is
        /// required. The value is parsed as JSON when possible,
        /// otherwise passed as a string (e.g. --set asset_tag=1234).
        #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
        sets: Vec<String>,
    },
}

/// Parses repeated KEY=VALUE flags into an opaque JSON mapping.
///
/// Values that parse as JSON are passed through typed (arrays, numbers,
/// booleans); anything else becomes a plain string. Entries without an
/// `=` are rejected.
fn parse_pairs(pairs: &[String]) -> Result<Map<String, Value>, String> {
    let mut map = Map::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=VALUE, got {pair:?}"))?;
        if key.is_empty() {
            return Err(format!("empty key in {pair:?}"));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        map.insert(key.to_string(), value);
    }
    Ok(map)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Cli::parse();

    let client = match MosyleClient::new(
        &args.token,
        &args.email,
        &args.password,
        None,
        &args.mode,
    ) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match &args.command {
        Command::List { filters } => {
            let filters = match parse_pairs(filters) {
                Ok(map) => map,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            let filters = (!filters.is_empty()).then_some(&filters);
            list_devices(&client, &args.os, filters).await
        }
        Command::Get { serial } => get_device(&client, &args.os, serial).await,
        Command::Update { serial, sets } => {
            let fields = match parse_pairs(sets) {
                Ok(map) => map,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return ExitCode::FAILURE;
                }
            };
            update_device(&client, &args.os, serial, &fields).await
        }
    };

    match result {
        Ok(response) => {
            // Responses are raw vendor JSON; pretty-print without
            // imposing any schema on them.
            match serde_json::to_string_pretty(&response) {
                Ok(text) => println!("{text}"),
                Err(_) => println!("{response}"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
