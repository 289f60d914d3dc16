mod api;
mod middleware;
mod render;
mod scheduler;

use std::process::ExitCode;
use std::sync::Arc;

use orderwatch_client::OrderClient;
use orderwatch_notify::SmtpMailer;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(orderwatch_core::load_log_level()));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "display server failed");
            ExitCode::FAILURE
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = orderwatch_core::load_app_config()?;
    let client = Arc::new(OrderClient::from_config(&config)?);

    let _scheduler = match config.notify_cron.as_deref() {
        Some(cron) => {
            let mailer = config
                .smtp
                .as_ref()
                .map(SmtpMailer::from_settings)
                .transpose()?
                .map(Arc::new);
            Some(
                scheduler::build_scheduler(cron, Arc::clone(&client), mailer, config.cadence)
                    .await?,
            )
        }
        None => {
            tracing::info!("ORDERWATCH_NOTIFY_CRON not set; scheduled notifications disabled");
            None
        }
    };

    let app = build_app(AppState { client });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(bind_addr = %config.bind_addr, "display server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
