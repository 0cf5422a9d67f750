// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::availability_service::{AvailabilityService, SystemClock};
use crate::application::fleet_service::FleetService;
use crate::application::streaming_service::StreamingAvailabilityService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::json_repository::JsonFileRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(JsonFileRepository::open(&config.store.data_dir)?);

    // Create services (application layer)
    let fleet_service = FleetService::new(repository.clone());
    let availability_service = AvailabilityService::new(
        repository.clone(),
        Arc::new(SystemClock),
        config.availability.clone(),
    );
    let streaming_service = StreamingAvailabilityService::new(
        availability_service.clone(),
        availability_service.refresh_interval(),
    );

    // Create application state
    let state = Arc::new(AppState {
        fleet_service,
        availability_service,
        streaming_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/tractors", get(list_tractors).post(create_tractor))
        .route("/tractors/import", post(import_tractors))
        .route("/tractors/:id", put(update_tractor).delete(delete_tractor))
        .route("/tractors/:id/work-orders", get(tractor_work_orders))
        .route("/compositions", get(list_compositions).post(create_composition))
        .route("/compositions/import", post(import_compositions))
        .route(
            "/compositions/:id",
            put(update_composition).delete(delete_composition),
        )
        .route("/compositions/:id/work-orders", get(composition_work_orders))
        .route("/drivers", get(list_drivers).post(create_driver))
        .route("/drivers/import", post(import_drivers))
        .route("/drivers/:id", put(update_driver).delete(delete_driver))
        .route("/work-orders", get(list_work_orders).post(create_work_order))
        .route("/work-orders/statistics", get(work_order_statistics))
        .route(
            "/work-orders/:id",
            put(update_work_order).delete(delete_work_order),
        )
        .route("/backup", get(export_data).post(import_data))
        .route("/availability", get(get_availability))
        .route("/availability/stream", get(stream_availability))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = config.server.socket_addr()?;
    tracing::info!("Starting fleet-availability service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
