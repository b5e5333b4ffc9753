use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
};
use shule_core::AppError;
use shule_models::{SchoolRecord, SessionId, UpdateProfileDto};
use shule_structure::{GradeCatalogEntry, RawIntent};

use crate::state::AppState;
use crate::validator::{JsonBody, ValidatedJson};

use super::model::{CatalogQuery, IntentResponse, SessionView};
use super::service::StructureService;

fn session_id(path: Result<Path<SessionId>, PathRejection>) -> Result<SessionId, AppError> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::bad_request(anyhow::anyhow!("Invalid session id")))
}

pub async fn get_catalog(
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> Result<Json<Vec<&'static GradeCatalogEntry>>, AppError> {
    let Query(query) = query
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;
    Ok(Json(StructureService::catalog(&query)))
}

pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let view = StructureService::create_session(&state.sessions).await;
    (StatusCode::CREATED, Json(view))
}

pub async fn load_session(
    State(state): State<AppState>,
    JsonBody(record): JsonBody<SchoolRecord>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let view = StructureService::load_session(&state.sessions, record).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_session(
    State(state): State<AppState>,
    path: Result<Path<SessionId>, PathRejection>,
) -> Result<Json<SessionView>, AppError> {
    let view = StructureService::get_session(&state.sessions, session_id(path)?).await?;
    Ok(Json(view))
}

pub async fn apply_intent(
    State(state): State<AppState>,
    path: Result<Path<SessionId>, PathRejection>,
    JsonBody(intent): JsonBody<RawIntent>,
) -> Result<Json<IntentResponse>, AppError> {
    let response = StructureService::apply_intent(&state.sessions, session_id(path)?, intent).await?;
    Ok(Json(response))
}

pub async fn update_profile(
    State(state): State<AppState>,
    path: Result<Path<SessionId>, PathRejection>,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<SessionView>, AppError> {
    let view = StructureService::update_profile(&state.sessions, session_id(path)?, dto).await?;
    Ok(Json(view))
}

pub async fn commit_session(
    State(state): State<AppState>,
    path: Result<Path<SessionId>, PathRejection>,
) -> Result<Json<SessionView>, AppError> {
    let view =
        StructureService::commit(&state.sessions, state.backend.as_ref(), session_id(path)?).await?;
    Ok(Json(view))
}

pub async fn delete_session(
    State(state): State<AppState>,
    path: Result<Path<SessionId>, PathRejection>,
) -> Result<StatusCode, AppError> {
    StructureService::delete_session(&state.sessions, session_id(path)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
