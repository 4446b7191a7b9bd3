mod api;
mod middleware;

use std::sync::Arc;

use anyhow::Context;
use centrefind_core::AppConfig;
use centrefind_select::{
    consolidate_with_report, load_all_sources, AreaClassifier, GazetteerGeocoder, Geocoder,
    TableAreaClassifier,
};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState, FacilityIndex, QueryDefaults};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = centrefind_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let state = load_state(&config)?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(bind_addr = %config.bind_addr, env = %config.env, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Read and consolidate every source once; requests share the result.
fn load_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let sources = centrefind_core::load_sources(&config.sources_path).with_context(|| {
        format!("loading sources file {}", config.sources_path.display())
    })?;
    let tables = load_all_sources(&sources)?;
    let (records, report) = consolidate_with_report(&tables, &sources.consolidation_policy())?;
    tracing::info!(
        facilities = records.len(),
        input_rows = report.input_rows,
        "facility index built"
    );

    let geocoder = match config.gazetteer_path.as_deref() {
        Some(path) => {
            let gazetteer = GazetteerGeocoder::load(path)?;
            tracing::info!(entries = gazetteer.len(), "gazetteer loaded");
            Some(Arc::new(gazetteer) as Arc<dyn Geocoder>)
        }
        None => None,
    };
    let classifier = match config.areas_path.as_deref() {
        Some(path) => Some(Arc::new(TableAreaClassifier::load(path)?) as Arc<dyn AreaClassifier>),
        None => None,
    };

    Ok(AppState {
        index: Arc::new(FacilityIndex { report, records }),
        defaults: QueryDefaults {
            k: config.default_k,
            min_separation_miles: config.min_separation_miles,
        },
        geocoder,
        classifier,
    })
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
