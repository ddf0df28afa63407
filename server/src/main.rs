//! Portfolio contact-form backend.
//!
//! Serves `POST /api/contact` and stores each submission in
//! `<data-dir>/messages.json`. The `messages` subcommand prints what has been
//! stored so far.

use std::io::Write;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_server::config::{DEFAULT_DATA_DIR, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT};
use folio_server::{build_router, AppState, CorruptStorePolicy, ServerConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio-server", about = "Portfolio contact-form backend")]
struct Cli {
    /// HTTP port to listen on.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind.
    #[arg(long, env = "FOLIO_BIND", default_value = "0.0.0.0")]
    bind: IpAddr,

    /// Directory holding messages.json (created on first submission).
    #[arg(long, env = "FOLIO_DATA_DIR", default_value = DEFAULT_DATA_DIR, global = true)]
    data_dir: PathBuf,

    /// How to treat a messages.json that cannot be parsed.
    #[arg(long, env = "FOLIO_ON_CORRUPT", value_enum, default_value_t = CorruptStorePolicy::Reset, global = true)]
    on_corrupt: CorruptStorePolicy,

    /// Reject submissions missing a name, email or message.
    #[arg(long, env = "FOLIO_REQUIRE_FIELDS")]
    require_fields: bool,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "FOLIO_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    max_body_bytes: usize,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Print stored messages as JSON.
    Messages {
        /// Print only the number of stored messages.
        #[arg(long)]
        count: bool,
    },
}

impl Cli {
    fn config(&self) -> ServerConfig {
        ServerConfig {
            bind: self.bind,
            port: self.port,
            data_dir: self.data_dir.clone(),
            on_corrupt: self.on_corrupt,
            require_fields: self.require_fields,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.addr();
    let port = config.port;
    let state = Arc::new(AppState::new(config));
    info!(
        store = %state.store.path().display(),
        on_corrupt = ?state.store.policy(),
        require_fields = state.config.require_fields,
        "message store configured"
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Backend server running at http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .context("server failed")
}

async fn print_messages(
    config: ServerConfig,
    count_only: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let store = config.open_store();
    let entries = store
        .read_all()
        .await
        .with_context(|| format!("failed to read {}", store.path().display()))?;
    if count_only {
        writeln!(out, "{}", entries.len())?;
    } else {
        let text = serde_json::to_string_pretty(&entries).context("failed to encode messages")?;
        writeln!(out, "{text}")?;
    }
    Ok(())
}

async fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let config = cli.config();
    match cli.command {
        None | Some(Command::Serve) => serve(config).await,
        Some(Command::Messages { count }) => print_messages(config, count, out).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    run(Cli::parse(), &mut std::io::stdout()).await
}
