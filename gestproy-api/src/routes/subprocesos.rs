/// Subprocess endpoints (plain CRUD)
///
/// # Endpoints
///
/// - `GET /subprocesos/proceso/:proceso_id`
/// - `GET /subprocesos/:id`
/// - `POST /subprocesos`
/// - `PUT /subprocesos/:id`
/// - `DELETE /subprocesos/:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use gestproy_shared::models::subproceso::{CreateSubproceso, Subproceso, UpdateSubproceso};
use serde::{Deserialize, Serialize};

/// Create-subprocess request; `proceso_id` and `nombre` are required
#[derive(Debug, Deserialize)]
pub struct CreateSubprocesoRequest {
    pub proceso_id: Option<i64>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub responsable_id: Option<i64>,
    pub estado: Option<String>,
    pub horas_estimadas: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SubprocesoResponse {
    pub message: String,
    pub subproceso: Subproceso,
}

pub async fn list_by_proceso(
    State(state): State<AppState>,
    Path(proceso_id): Path<i64>,
) -> ApiResult<Json<Vec<Subproceso>>> {
    let subprocesos = Subproceso::list_by_proceso(&state.db, proceso_id).await?;

    Ok(Json(subprocesos))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Subproceso>> {
    let subproceso = Subproceso::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Subprocess not found".to_string()))?;

    Ok(Json(subproceso))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateSubprocesoRequest>,
) -> ApiResult<(StatusCode, Json<SubprocesoResponse>)> {
    let proceso_id = req
        .proceso_id
        .ok_or_else(|| ApiError::Validation("Field 'proceso_id' is required".to_string()))?;
    let nombre = req
        .nombre
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'nombre' is required".to_string()))?;

    let subproceso = Subproceso::create(
        &state.db,
        proceso_id,
        CreateSubproceso {
            nombre,
            descripcion: req.descripcion,
            responsable_id: req.responsable_id,
            estado: req.estado,
            horas_estimadas: req.horas_estimadas,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubprocesoResponse {
            message: "Subprocess created".to_string(),
            subproceso,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSubproceso>,
) -> ApiResult<Json<SubprocesoResponse>> {
    let subproceso = Subproceso::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Subprocess not found".to_string()))?;

    Ok(Json(SubprocesoResponse {
        message: "Subprocess updated".to_string(),
        subproceso,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let existed = Subproceso::delete(&state.db, id).await?;
    if !existed {
        return Err(ApiError::NotFound("Subprocess not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Subprocess deleted")))
}
