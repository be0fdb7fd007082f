mod api;
mod middleware;
mod scheduler;

use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::CronAuth,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = pulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let profile = pulse_core::load_profile(&config.profile_path)?;
    let services = pulse_pipeline::build_services(&config, &profile)?;

    let _scheduler = scheduler::build_scheduler(
        services.clone(),
        config.cron_schedule.as_deref(),
        config.report_recipient.clone(),
    )
    .await?;

    let auth = CronAuth::from_config(config.cron_secret.as_deref(), config.env)?;
    let app = build_app(
        AppState {
            services,
            report_recipient: config.report_recipient.clone(),
        },
        auth,
    );

    tracing::info!(addr = %config.bind_addr, app = %profile.app_name, "pulse server listening");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
