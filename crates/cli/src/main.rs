mod draft;

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use composer_api::CompositionClient;
use composer_tui::TuiConfig;
use composer_types::{CompositionPayload, ValidationPolicy};
use serde_json::{Map, Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::draft::load_draft;

/// Overrides where the terminal form writes its log.
const LOG_PATH_ENV: &str = "COMPOSER_LOG_PATH";

#[derive(Debug, Parser)]
#[command(name = "composer", version, about = "Compose service relations and submit them to the composition server")]
struct Cli {
    /// Server base URL [env: COMPOSER_BASE_URL, default: http://127.0.0.1:8080]
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = 30, global = true)]
    timeout: u64,

    /// Reject on_value relations without an expected value
    #[arg(long, global = true)]
    require_expected_value: bool,

    /// Composition draft (JSON, request body shape)
    #[arg(long, value_name = "FILE", global = true)]
    draft: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the draft and print the request that would be sent
    Preview,
    /// Validate and submit the draft, then print the server status
    Submit,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.is_none());

    let client = build_client(&cli)?;
    let policy = ValidationPolicy {
        require_expected_value: cli.require_expected_value,
    };
    let draft = cli.draft.as_deref().map(load_draft).transpose()?;

    // No subcommand => TUI
    let Some(command) = cli.command else {
        return composer_tui::run(TuiConfig { client, policy, draft }).await;
    };

    let payload = draft.context("this command needs --draft FILE")?;
    payload.validate(&policy).context("draft cannot be submitted")?;

    match command {
        Command::Preview => {
            let preview = preview_request(&client, &payload)?;
            println!("{}", serde_json::to_string_pretty(&preview)?);
        }
        Command::Submit => {
            info!(relations = payload.compositions.len(), "submitting draft");
            let response = client
                .save_composition(&payload)
                .await
                .with_context(|| format!("failed to submit composition to {}", client.save_composition_url()))?;
            println!("{}", response.status);
        }
    }
    Ok(())
}

fn build_client(cli: &Cli) -> Result<CompositionClient> {
    let timeout = Duration::from_secs(cli.timeout);
    let client = match cli.base_url.as_deref() {
        Some(base_url) => CompositionClient::new(base_url, timeout),
        None => CompositionClient::from_env(timeout),
    };
    client.context("invalid composition server configuration")
}

/// Describe the exact request `submit` would send.
fn preview_request(client: &CompositionClient, payload: &CompositionPayload) -> Result<Value> {
    let request = client.build_save_request(payload)?;
    let headers = request
        .headers()
        .iter()
        .map(|(name, value)| {
            let value = value.to_str().unwrap_or_default().to_string();
            (name.as_str().to_string(), Value::String(value))
        })
        .collect::<Map<String, Value>>();
    let body = request
        .body()
        .and_then(|body| body.as_bytes())
        .map(serde_json::from_slice::<Value>)
        .transpose()?
        .unwrap_or(Value::Null);

    Ok(json!({
        "method": request.method().as_str(),
        "url": request.url().as_str(),
        "headers": headers,
        "body": body,
    }))
}

/// Logs go to a file while the terminal form owns the screen, otherwise to
/// stderr. `RUST_LOG` overrides the default `info` filter.
fn init_tracing(interactive: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let _ = if interactive {
        match open_tui_log(log_file_path()) {
            Ok(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).try_init(),
            Err(error) => {
                // Still on the normal screen here; the form has not started
                eprintln!("composer: logging disabled: {error:#}");
                Ok(())
            }
        }
    } else {
        builder.with_writer(std::io::stderr).try_init()
    };
}

fn log_file_path() -> Option<PathBuf> {
    match std::env::var_os(LOG_PATH_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs_next::cache_dir().map(|dir| dir.join("composer").join("composer.log")),
    }
}

fn open_tui_log(path: Option<PathBuf>) -> Result<File> {
    let path = path.with_context(|| format!("no cache directory found; set {LOG_PATH_ENV}"))?;
    open_log_file(&path).with_context(|| format!("cannot open log file {}", path.display()))
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
