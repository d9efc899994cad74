use crate::config::Config;
use crate::errors::AppError;
use crate::models::{Prospect, ProspectDto};
use crate::services::ProspectService;
use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;

pub const DELETED_MESSAGE: &str = "Prospect Pessoa Fisica foi deletado com sucesso.";

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Prospect operations, including the process-wide service queue.
    pub prospects: ProspectService,
}

fn body_or_bad_request(
    payload: Result<Json<ProspectDto>, JsonRejection>,
) -> Result<ProspectDto, AppError> {
    payload
        .map(|Json(dto)| dto)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

fn id_or_bad_request(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Health check endpoint.
///
/// Returns the service status, version and the current service queue size.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "prospect-api",
            "version": env!("CARGO_PKG_VERSION"),
            "serviceQueueSize": state.prospects.queue_len(),
        })),
    )
}

/// POST /prospect-pessoa-fisica
///
/// Registers a new prospect and appends it to the service queue.
#[utoipa::path(
    post,
    path = "/prospect-pessoa-fisica",
    tag = "prospect-pessoa-fisica",
    request_body = ProspectDto,
    responses(
        (status = 201, description = "Prospect created", body = Prospect),
        (status = 400, description = "Field validation errors keyed by field name"),
        (status = 409, description = "Conflito: CPF já está em uso!", body = String)
    )
)]
pub async fn create_prospect(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProspectDto>, JsonRejection>,
) -> Result<(StatusCode, Json<Prospect>), AppError> {
    tracing::info!("POST /prospect-pessoa-fisica");

    let dto = body_or_bad_request(payload)?;
    let saved = state.prospects.create(dto).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /prospect-pessoa-fisica/:id
///
/// Replaces every field of an existing prospect and queues it again.
#[utoipa::path(
    put,
    path = "/prospect-pessoa-fisica/{id}",
    tag = "prospect-pessoa-fisica",
    params(("id" = i64, Path, description = "Prospect id")),
    request_body = ProspectDto,
    responses(
        (status = 200, description = "Prospect updated", body = Prospect),
        (status = 400, description = "Field validation errors keyed by field name"),
        (status = 404, description = "Prospect Pessoa Física não encontrado.", body = String)
    )
)]
pub async fn update_prospect(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<ProspectDto>, JsonRejection>,
) -> Result<Json<Prospect>, AppError> {
    let id = id_or_bad_request(id)?;
    tracing::info!("PUT /prospect-pessoa-fisica/{}", id);

    let dto = body_or_bad_request(payload)?;
    let updated = state.prospects.update(id, dto).await?;

    Ok(Json(updated))
}

/// GET /prospect-pessoa-fisica/:id
#[utoipa::path(
    get,
    path = "/prospect-pessoa-fisica/{id}",
    tag = "prospect-pessoa-fisica",
    params(("id" = i64, Path, description = "Prospect id")),
    responses(
        (status = 200, description = "Prospect found", body = Prospect),
        (status = 404, description = "Prospect Pessoa Física não encontrado.", body = String)
    )
)]
pub async fn get_prospect(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Prospect>, AppError> {
    let id = id_or_bad_request(id)?;
    tracing::info!("GET /prospect-pessoa-fisica/{}", id);

    Ok(Json(state.prospects.get(id).await?))
}

/// DELETE /prospect-pessoa-fisica/:id
///
/// Deletes the stored record only; queued copies are kept.
#[utoipa::path(
    delete,
    path = "/prospect-pessoa-fisica/{id}",
    tag = "prospect-pessoa-fisica",
    params(("id" = i64, Path, description = "Prospect id")),
    responses(
        (status = 200, description = "Prospect Pessoa Fisica foi deletado com sucesso.", body = String),
        (status = 404, description = "Prospect Pessoa Física não encontrado.", body = String)
    )
)]
pub async fn delete_prospect(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<(StatusCode, &'static str), AppError> {
    let id = id_or_bad_request(id)?;
    tracing::info!("DELETE /prospect-pessoa-fisica/{}", id);

    state.prospects.delete(id).await?;

    Ok((StatusCode::OK, DELETED_MESSAGE))
}

/// GET /prospect-pessoa-fisica
#[utoipa::path(
    get,
    path = "/prospect-pessoa-fisica",
    tag = "prospect-pessoa-fisica",
    responses((status = 200, description = "Every stored prospect", body = [Prospect]))
)]
pub async fn list_prospects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Prospect>>, AppError> {
    tracing::info!("GET /prospect-pessoa-fisica");

    Ok(Json(state.prospects.list_all().await?))
}

/// GET /prospect-pessoa-fisica/service-queue
///
/// Lists the service queue from head to tail without consuming it.
#[utoipa::path(
    get,
    path = "/prospect-pessoa-fisica/service-queue",
    tag = "service-queue",
    responses((status = 200, description = "Queued prospects, head first", body = [Prospect]))
)]
pub async fn get_service_queue(State(state): State<Arc<AppState>>) -> Json<Vec<Prospect>> {
    let snapshot = state.prospects.queue_snapshot();
    tracing::info!(
        "GET /prospect-pessoa-fisica/service-queue - {} queued",
        snapshot.len()
    );

    Json(snapshot)
}

/// GET /prospect-pessoa-fisica/service-queue/next-prospect
///
/// Removes and returns the prospect at the head of the service queue.
#[utoipa::path(
    get,
    path = "/prospect-pessoa-fisica/service-queue/next-prospect",
    tag = "service-queue",
    responses(
        (status = 200, description = "Next prospect to attend", body = Prospect),
        (status = 404, description = "A fila de atendimento de prospects está vazia!", body = String)
    )
)]
pub async fn next_prospect(State(state): State<Arc<AppState>>) -> Result<Json<Prospect>, AppError> {
    let next = state.prospects.queue_next()?;
    tracing::info!(
        "GET /prospect-pessoa-fisica/service-queue/next-prospect - handing out {:?}",
        next.id
    );

    Ok(Json(next))
}
