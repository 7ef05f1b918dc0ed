/// Version injected at compile time via BUDDY_DS_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("BUDDY_DS_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{bail, Context, Result};
use buddy_datasources::buddy::{BuddyClient, HttpOptions};
use buddy_datasources::config::{ProviderConfig, DEFAULT_API_URL};
use buddy_datasources::framework::{AttrPath, DataSource, ReadContext, ReadResponse, StateValue};
use buddy_datasources::{Provider, ReadRequest};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value as Json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Read Buddy workspace data the way the infrastructure host does
#[derive(Parser, Debug)]
#[command(name = "buddy-ds", version = VERSION, about, long_about = None)]
struct Args {
    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every data source type
    Types,
    /// Print the schema of a data source as JSON
    Schema {
        /// Data source type, e.g. buddy_project
        type_name: String,
    },
    /// Read a data source and print its state as JSON
    Read {
        /// Data source type, e.g. buddy_project
        type_name: String,
        /// JSON file with the configuration object, or an array of them
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    // RUST_LOG narrows the selected level per target
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(tracing_level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("buddy-ds {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("buddy-datasources").join("buddy-ds.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".buddy-datasources").join("buddy-ds.log");
    }
    PathBuf::from("buddy-ds.log")
}

fn build_provider() -> Result<Provider> {
    let config = ProviderConfig::load()?;
    config.validate()?;
    tracing::info!("Using API: {}", config.api_url);
    let client = BuddyClient::new(&config.api_url, &config.token, &config.http_options())?;
    Ok(Provider::new(Arc::new(client)))
}

/// Registry for commands that never reach the API
fn offline_provider() -> Result<Provider> {
    let client = BuddyClient::new(DEFAULT_API_URL, "", &HttpOptions::default())?;
    Ok(Provider::new(Arc::new(client)))
}

/// Decode the configuration file into one request per configuration object
fn load_requests(provider: &Provider, type_name: &str, path: &Path) -> Result<Vec<ReadRequest>> {
    let Some(ds) = provider.get(type_name) else {
        bail!("unknown data source type {:?}; run `buddy-ds types`", type_name);
    };
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let json: Json =
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
    let configs = match json {
        Json::Array(items) => items,
        other => vec![other],
    };

    let ty = ds.schema().object_type();
    configs
        .iter()
        .map(|config| {
            let config = StateValue::from_json(&ty, config, &AttrPath::default())
                .map_err(|diag| anyhow::anyhow!("{}", diag))?;
            Ok(ReadRequest {
                type_name: type_name.to_string(),
                config,
            })
        })
        .collect()
}

fn print_response(response: &ReadResponse) -> Result<bool> {
    for diag in response.diagnostics.iter() {
        eprintln!("{}", diag);
    }
    match &response.state {
        Some(state) => {
            println!("{}", serde_json::to_string_pretty(&state.to_json())?);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match args.command {
        Command::Types => {
            let provider = offline_provider()?;
            for name in provider.type_names() {
                println!("{}", name);
            }
        }
        Command::Schema { type_name } => {
            let provider = offline_provider()?;
            let Some(ds) = provider.get(&type_name) else {
                bail!("unknown data source type {:?}; run `buddy-ds types`", type_name);
            };
            println!("{}", serde_json::to_string_pretty(&ds.schema().to_json())?);
        }
        Command::Read { type_name, config } => {
            let provider = build_provider()?;
            let requests = load_requests(&provider, &type_name, &config)?;

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupt received, cancelling reads");
                    on_signal.cancel();
                }
            });

            let ctx = ReadContext::with_token(cancel);
            let responses = provider.read_many(&ctx, &requests).await;
            let mut ok = true;
            for response in &responses {
                ok &= print_response(response)?;
            }
            if !ok {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
