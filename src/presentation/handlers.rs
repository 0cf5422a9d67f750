// HTTP request handlers
use crate::domain::backup::FleetImport;
use crate::domain::fleet::{CompositionDraft, DriverDraft, TractorDraft, VehicleClass};
use crate::domain::work_order::WorkOrderDraft;
use crate::domain::work_order_query::WorkOrderQuery;
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type HandlerResult = Result<Response, ApiError>;

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    /// `DD-MM-YYYY`; today when absent
    pub date: Option<String>,
    pub class: Option<VehicleClass>,
    pub goal: Option<f64>,
}

#[derive(Deserialize)]
pub struct LiveQuery {
    pub class: Option<VehicleClass>,
    pub goal: Option<f64>,
}

async fn respond<T: Serialize>(status: StatusCode, data: &T, headers: &HeaderMap) -> HandlerResult {
    Ok(json_response(status, data, accepts_brotli(headers)).await?)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

// Tractors

pub async fn list_tractors(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let tractors = state.fleet_service.list_tractors().await?;
    respond(StatusCode::OK, &tractors, &headers).await
}

pub async fn create_tractor(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TractorDraft>, JsonRejection>,
) -> HandlerResult {
    let Json(draft) = payload?;
    let tractor = state.fleet_service.add_tractor(draft).await?;
    respond(StatusCode::CREATED, &tractor, &headers).await
}

pub async fn update_tractor(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TractorDraft>, JsonRejection>,
) -> HandlerResult {
    let Json(draft) = payload?;
    let tractor = state.fleet_service.update_tractor(&id, draft).await?;
    respond(StatusCode::OK, &tractor, &headers).await
}

pub async fn delete_tractor(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    state.fleet_service.delete_tractor(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn import_tractors(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: String,
) -> HandlerResult {
    let summary = state.fleet_service.import_tractors(&body).await;
    respond(StatusCode::OK, &summary, &headers).await
}

// Compositions

pub async fn list_compositions(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let compositions = state.fleet_service.list_compositions().await?;
    respond(StatusCode::OK, &compositions, &headers).await
}

pub async fn create_composition(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompositionDraft>, JsonRejection>,
) -> HandlerResult {
    let Json(draft) = payload?;
    let composition = state.fleet_service.add_composition(draft).await?;
    respond(StatusCode::CREATED, &composition, &headers).await
}

pub async fn update_composition(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CompositionDraft>, JsonRejection>,
) -> HandlerResult {
    let Json(draft) = payload?;
    let composition = state.fleet_service.update_composition(&id, draft).await?;
    respond(StatusCode::OK, &composition, &headers).await
}

pub async fn delete_composition(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    state.fleet_service.delete_composition(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn import_compositions(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: String,
) -> HandlerResult {
    let summary = state.fleet_service.import_compositions(&body).await;
    respond(StatusCode::OK, &summary, &headers).await
}

// Drivers

pub async fn list_drivers(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let drivers = state.fleet_service.list_drivers().await?;
    respond(StatusCode::OK, &drivers, &headers).await
}

pub async fn create_driver(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DriverDraft>, JsonRejection>,
) -> HandlerResult {
    let Json(draft) = payload?;
    let driver = state.fleet_service.add_driver(draft).await?;
    respond(StatusCode::CREATED, &driver, &headers).await
}

pub async fn update_driver(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DriverDraft>, JsonRejection>,
) -> HandlerResult {
    let Json(draft) = payload?;
    let driver = state.fleet_service.update_driver(&id, draft).await?;
    respond(StatusCode::OK, &driver, &headers).await
}

pub async fn delete_driver(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    state.fleet_service.delete_driver(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn import_drivers(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    body: String,
) -> HandlerResult {
    let summary = state.fleet_service.import_drivers(&body).await;
    respond(StatusCode::OK, &summary, &headers).await
}

// Work orders

/// Filtered by the query string; completed orders last, newest first
pub async fn list_work_orders(
    query: Result<Query<WorkOrderQuery>, QueryRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let Query(query) = query?;
    let work_orders = state.fleet_service.list_work_orders(&query).await?;
    respond(StatusCode::OK, &work_orders, &headers).await
}

pub async fn tractor_work_orders(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let work_orders = state
        .fleet_service
        .work_orders_for_vehicle(VehicleClass::Unit, &id)
        .await?;
    respond(StatusCode::OK, &work_orders, &headers).await
}

pub async fn composition_work_orders(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let work_orders = state
        .fleet_service
        .work_orders_for_vehicle(VehicleClass::Composition, &id)
        .await?;
    respond(StatusCode::OK, &work_orders, &headers).await
}

pub async fn create_work_order(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WorkOrderDraft>, JsonRejection>,
) -> HandlerResult {
    let Json(draft) = payload?;
    let work_order = state.fleet_service.add_work_order(draft).await?;
    respond(StatusCode::CREATED, &work_order, &headers).await
}

pub async fn update_work_order(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<WorkOrderDraft>, JsonRejection>,
) -> HandlerResult {
    let Json(draft) = payload?;
    let work_order = state.fleet_service.update_work_order(&id, draft).await?;
    respond(StatusCode::OK, &work_order, &headers).await
}

pub async fn delete_work_order(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    state.fleet_service.delete_work_order(&id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub async fn work_order_statistics(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let statistics = state.fleet_service.work_order_statistics().await?;
    respond(StatusCode::OK, &statistics, &headers).await
}

// Backup

pub async fn export_data(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let export = state.fleet_service.export_data().await?;
    respond(StatusCode::OK, &export, &headers).await
}

pub async fn import_data(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FleetImport>, JsonRejection>,
) -> HandlerResult {
    let Json(import) = payload?;
    state.fleet_service.import_data(import).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

// Availability

pub async fn get_availability(
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let Query(query) = query?;
    let class = query.class.unwrap_or(VehicleClass::Unit);
    let analysis = state
        .availability_service
        .analyze(query.date.as_deref(), class, query.goal)
        .await?;
    respond(StatusCode::OK, &analysis, &headers).await
}

/// Stream today's availability, refreshed on the configured interval
pub async fn stream_availability(
    query: Result<Query<LiveQuery>, QueryRejection>,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let Query(query) = query?;
    let class = query.class.unwrap_or(VehicleClass::Unit);
    tracing::debug!("Opening live {} availability stream", class);

    let rx = state.streaming_service.stream_availability(class, query.goal);
    Ok(stream_from_receiver(rx).into_response())
}
