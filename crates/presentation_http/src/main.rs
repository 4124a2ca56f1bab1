//! Parley HTTP server
//!
//! Main entry point: loads configuration, opens the credit store, builds the
//! provider roster, and serves the interview and credit endpoints.

use std::{sync::Arc, time::Duration};

use application::ports::CreditStorePort;
use application::{CreditMonitor, InterviewOrchestrator, ProviderRoster};
use infrastructure::adapters::{
    AetherAdapter, AthenaAdapter, EchoAdapter, NovaAdapter, OrionAdapter, TitanAdapter, VoxAdapter,
};
use infrastructure::config::AppConfig;
use infrastructure::persistence::{SqliteCreditStore, create_pool};
use presentation_http::{routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parley_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Parley v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    info!(
        environment = %config.environment,
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.path,
        "Configuration loaded"
    );

    // Credit store
    let pool = create_pool(&config.database)?;
    let store: Arc<dyn CreditStorePort> = Arc::new(SqliteCreditStore::new(Arc::new(pool)));

    // Provider roster, one adapter per codename
    let roster = ProviderRoster::new()
        .with_question_generator(Arc::new(OrionAdapter::new(config.providers.orion.clone())?))
        .with_question_generator(Arc::new(TitanAdapter::new(config.providers.titan.clone())?))
        .with_question_generator(Arc::new(NovaAdapter::new(config.providers.nova.clone())?))
        .with_evaluator(Arc::new(AthenaAdapter::new(config.providers.athena.clone())?))
        .with_speech_synthesizer(Arc::new(VoxAdapter::new(config.providers.vox.clone())?))
        .with_speech_synthesizer(Arc::new(AetherAdapter::new(
            config.providers.aether.clone(),
        )?))
        .with_transcriber(Arc::new(EchoAdapter::new(config.providers.echo.clone())?));

    let orchestrator = Arc::new(InterviewOrchestrator::new(Arc::clone(&store), roster));
    let monitor = Arc::new(CreditMonitor::new(Arc::clone(&store)));

    // Periodic credit check so exhausted providers re-enable without an
    // administrative call
    if config.monitor.enabled {
        let monitor = Arc::clone(&monitor);
        let interval = Duration::from_secs(config.monitor.interval_secs);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match monitor.check_credits().await {
                    Ok(report) => {
                        if !report.newly_exhausted.is_empty() {
                            warn!(
                                exhausted = report.newly_exhausted.len(),
                                "periodic credit check found exhausted providers"
                            );
                        }
                    }
                    Err(e) => warn!("periodic credit check failed: {}", e),
                }
            }
        });
    }

    let state = AppState {
        orchestrator,
        monitor,
    };
    let app = routes::create_router(state);

    let cors = routes::cors_layer(config.environment, &config.server);
    let app = app.layer(TraceLayer::new_for_http()).layer(cors);

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for SIGINT or SIGTERM and initiate graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {:?} for connections to close...", timeout);
    // Connection draining is handled by axum's graceful_shutdown
}
