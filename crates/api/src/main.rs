use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hedgefund_api::AppState;
use hedgefund_core::agent::registry::{AnalystId, AnalystRegistry};
use hedgefund_core::agent::remote::{RemoteAnalyst, RemoteBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = hedgefund_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let state = match RemoteBackend::from_settings(&settings) {
        Ok(backend) => {
            let mut registry = AnalystRegistry::new();
            for id in AnalystId::ALL {
                registry =
                    registry.with_agent(id, Arc::new(RemoteAnalyst::new(backend.clone(), id)));
            }
            AppState {
                registry,
                orchestrator: Some(Arc::new(backend)),
            }
        }
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "ANALYSIS_BACKEND_URL missing; starting API in degraded mode");
            AppState::degraded()
        }
    };

    let app = hedgefund_api::router(state, &settings.allowed_origins());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &hedgefund_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
