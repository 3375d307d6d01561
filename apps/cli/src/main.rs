mod args;
mod config;
mod paths;

use std::io;
use std::net::SocketAddr;

use app_api::{AnalyticsRequest, AppContext};
use clap::Parser;
use http_api::HttpState;
use insights_app::{AppPaths, AppState, ensure_app_data_dir};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::args::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config = config::load_or_create(args.config.as_deref()).map_err(io::Error::other)?;
    init_tracing(&config.config.log_filter);
    if config.created {
        tracing::info!(path = %config.file.display(), "created default config");
    }

    let data_dir = paths::resolve_data_dir().map_err(io::Error::other)?;
    let app_paths = AppPaths::new(data_dir);
    ensure_app_data_dir(&app_paths).map_err(|err| io::Error::other(err.to_string()))?;

    let app_state = AppState::new(config.config.app_config(app_paths.db_path));
    if let Err(err) = app_state.setup_db() {
        return Err(io::Error::other(format!("failed to initialize database: {}", err)).into());
    }

    let context = AppContext { app_state };
    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(shutdown.clone()));

    match args.command() {
        Command::Serve { port } => {
            serve(context, shutdown, port.unwrap_or(config.config.port)).await
        }
        Command::Report {
            range,
            tools,
            models,
            compact,
        } => {
            let req = AnalyticsRequest {
                time_range: range,
                tools,
                models,
            };
            let report = app_api::analytics(&context, req, shutdown)
                .await
                .map_err(|err| io::Error::other(err.to_string()))?;
            let json = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{json}");
            Ok(())
        }
    }
}

fn init_tracing(config_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config_filter))
        .unwrap_or_else(|_| config::DEFAULT_LOG_FILTER.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn serve(
    context: AppContext,
    shutdown: CancellationToken,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let router = http_api::router(HttpState::new(context, shutdown.clone()));

    let (listener, actual_port, used_fallback) = bind_port(port).await?;
    if used_fallback {
        tracing::warn!(
            configured = port,
            actual = actual_port,
            "configured port unavailable, using an ephemeral port"
        );
    }

    println!("Usage insights API is running at http://127.0.0.1:{actual_port}");
    println!("Press Ctrl+C to stop.");
    tracing::info!(port = actual_port, "server started");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn bind_port(port: u16) -> Result<(tokio::net::TcpListener, u16, bool), io::Error> {
    if port == 0 {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let actual_port = listener.local_addr()?.port();
        return Ok((listener, actual_port, false));
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => Ok((listener, port, false)),
        Err(_) => {
            let listener =
                tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
            let actual_port = listener.local_addr()?.port();
            Ok((listener, actual_port, true))
        }
    }
}

async fn cancel_on_ctrl_c(shutdown: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown requested");
        shutdown.cancel();
    }
}
