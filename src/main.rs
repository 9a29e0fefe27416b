//! signalctl: CLI demo client for the signal service.
//!
//! Resolves free-text queries to canonical symbols and fetches trading
//! signals or lucky picks from the upstream service. A bounded, cancellable
//! health check runs at startup alongside the user's command.

mod config;

use std::process::ExitCode;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use common::{Error, HealthState, LuckyResponse, QueryKind, SearchResult, Signal};
use session::{InteractionState, Session};
use signal_client::{check_health, SignalRestClient};

/// Demo client for the signal service
#[derive(Parser)]
#[command(name = "signalctl", about = "Demo client for the signal service")]
struct Cli {
    /// Emit machine-readable JSON events instead of plain text.
    #[arg(long)]
    json: bool,

    /// Skip the startup health check.
    #[arg(long)]
    no_health_check: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check upstream health and exit.
    Health,
    /// Resolve a ticker or company name to a canonical symbol.
    Search {
        /// Free-text ticker or company name.
        query: String,
    },
    /// Resolve a query, then fetch the trading signal for it.
    Signal {
        /// Free-text ticker or company name.
        query: String,
    },
    /// Fetch a randomized batch of picks.
    Lucky,
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signalctl=info,signal_client=info,session=info".into()),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Upstream: {}", cfg.base_url);
    if !cfg.api_key.trim().is_empty() {
        info!("API key: configured");
    }

    let client = match SignalRestClient::new(&cfg) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let health_timeout = Duration::from_secs(cfg.timing.health_timeout_secs);

    // The startup health monitor runs alongside the command and is torn
    // down — aborting any in-flight request — when the command finishes
    // first. The one-shot `health` command probes in the foreground
    // instead.
    let cancel = CancellationToken::new();
    let monitor = if cli.no_health_check || matches!(cli.command, Command::Health) {
        None
    } else {
        Some(spawn_health_monitor(&client, health_timeout, &cancel))
    };

    let code = run_command(&cli.command, client, health_timeout, cli.json).await;

    cancel.cancel();
    if let Some(handle) = monitor {
        let _ = handle.await;
    }

    code
}

fn spawn_health_monitor(
    client: &SignalRestClient,
    timeout: Duration,
    cancel: &CancellationToken,
) -> JoinHandle<()> {
    let client = client.clone();
    let cancel = cancel.clone();
    tokio::spawn(async move {
        match check_health(&client, timeout, &cancel).await {
            Ok(health) => info!(
                "Upstream healthy: status={} version={}",
                health.status,
                health.version.as_deref().unwrap_or("-")
            ),
            Err(e) => warn!("Health check failed: {}", e),
        }
    })
}

async fn run_command(
    command: &Command,
    client: SignalRestClient,
    health_timeout: Duration,
    json: bool,
) -> ExitCode {
    match command {
        Command::Health => {
            let cancel = CancellationToken::new();
            match check_health(&client, health_timeout, &cancel).await {
                Ok(health) => {
                    render_health(&health, json);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    render_error(&e, json);
                    ExitCode::FAILURE
                }
            }
        }
        Command::Search { query } => {
            let mut session = Session::new(client);
            session.search(query).await;
            render_state(session.state(), json);
            exit_code_for(session.state())
        }
        Command::Signal { query } => {
            let mut session = Session::new(client);
            session.search(query).await;
            if matches!(session.state(), InteractionState::Resolved(_)) {
                session.fetch_signal().await;
            }
            render_state(session.state(), json);
            exit_code_for(session.state())
        }
        Command::Lucky => {
            let mut session = Session::new(client);
            session.fetch_lucky().await;
            render_state(session.state(), json);
            exit_code_for(session.state())
        }
    }
}

fn exit_code_for(state: &InteractionState) -> ExitCode {
    match state {
        InteractionState::Failed(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

// ── Output rendering ────────────────────────────────────────────────

fn render_state(state: &InteractionState, json: bool) {
    match state {
        InteractionState::Resolved(result) => render_search(result, json),
        InteractionState::ShowingSignal(signal) => render_signal(signal, json),
        InteractionState::ShowingLucky(lucky) => render_lucky(lucky, json),
        InteractionState::Failed(e) => render_error(e, json),
        _ => {}
    }
}

fn render_search(result: &SearchResult, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "ts": now_iso(),
                "kind": "search_result",
                "query": result.query,
                "normalized": result.normalized,
                "type": result.kind,
                "suggestions": result.suggestions,
            })
        );
        return;
    }

    match result.kind {
        QueryKind::Ticker => println!("{} resolved as ticker {}", result.query, result.normalized),
        QueryKind::Company => {
            println!("{} resolved as company {}", result.query, result.normalized);
            if !result.suggestions.is_empty() {
                println!("  suggestions: {}", result.suggestions.join(", "));
            }
        }
    }
}

fn render_signal(signal: &Signal, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "ts": now_iso(),
                "kind": "signal",
                "symbol": signal.symbol,
                "action": signal.action,
                "score": signal.score,
                "reasons": signal.reasons,
            })
        );
        return;
    }

    println!("{}  {}  (score {})", signal.symbol, signal.action, signal.score);
    for reason in &signal.reasons {
        println!("  - {}", reason);
    }
}

fn render_lucky(lucky: &LuckyResponse, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "ts": now_iso(),
                "kind": "lucky",
                "picks": lucky.picks,
                "note": lucky.note,
            })
        );
        return;
    }

    println!("Lucky picks:");
    for pick in &lucky.picks {
        println!("  {}  {}  (score {})", pick.symbol, pick.action, pick.score);
    }
    if !lucky.note.is_empty() {
        println!("note: {}", lucky.note);
    }
}

fn render_health(health: &HealthState, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "ts": now_iso(),
                "kind": "health",
                "status": health.status,
                "server_time": health.server_time,
                "version": health.version,
            })
        );
        return;
    }

    println!("status: {}", health.status);
    if let Some(ts) = &health.server_time {
        println!("server time: {}", ts);
    }
    if let Some(version) = &health.version {
        println!("version: {}", version);
    }
}

fn render_error(e: &Error, json: bool) {
    if json {
        println!(
            "{}",
            json!({
                "ts": now_iso(),
                "kind": "error",
                "error": e.to_string(),
                "status": e.status(),
            })
        );
        return;
    }

    eprintln!("error: {}", e);
}
