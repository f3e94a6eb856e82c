/// Technique assignment endpoints
///
/// # Endpoints
///
/// - `GET /subproceso-tecnicas/subproceso/:subproceso_id`
/// - `POST /subproceso-tecnicas`
/// - `PUT /subproceso-tecnicas/:id` - Notes only
/// - `DELETE /subproceso-tecnicas/:id`
///
/// A technique can be assigned to a subprocess at most once.

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
use gestproy_shared::models::subproceso_tecnica::{Asignacion, UpdateAsignacion};
use serde::{Deserialize, Serialize};

/// Assign-technique request; `subproceso_id` and `tecnica_id` are required
#[derive(Debug, Deserialize)]
pub struct CreateAsignacionRequest {
    pub subproceso_id: Option<i64>,
    pub tecnica_id: Option<i64>,
    pub notas: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AsignacionResponse {
    pub message: String,
    pub asignacion: Asignacion,
}

pub async fn list_by_subproceso(
    State(state): State<AppState>,
    Path(subproceso_id): Path<i64>,
) -> ApiResult<Json<Vec<Asignacion>>> {
    let asignaciones = Asignacion::list_by_subproceso(&state.db, subproceso_id).await?;

    Ok(Json(asignaciones))
}

/// Assigns a technique to a subprocess
///
/// # Errors
///
/// - `400`: Missing id field, or technique already assigned
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateAsignacionRequest>,
) -> ApiResult<(StatusCode, Json<AsignacionResponse>)> {
    let subproceso_id = req
        .subproceso_id
        .ok_or_else(|| ApiError::Validation("Field 'subproceso_id' is required".to_string()))?;
    let tecnica_id = req
        .tecnica_id
        .ok_or_else(|| ApiError::Validation("Field 'tecnica_id' is required".to_string()))?;

    if Asignacion::exists(&state.db, subproceso_id, tecnica_id).await? {
        return Err(ApiError::Conflict(
            "Technique is already assigned to this subprocess".to_string(),
        ));
    }

    let asignacion =
        Asignacion::create(&state.db, subproceso_id, tecnica_id, req.notas.as_deref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(AsignacionResponse {
            message: "Technique assigned".to_string(),
            asignacion,
        }),
    ))
}

/// Updates an assignment's notes
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateAsignacion>,
) -> ApiResult<Json<AsignacionResponse>> {
    let asignacion = match req.notas {
        Some(ref notas) => Asignacion::update_notas(&state.db, id, Some(notas))
            .await?
            .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?,
        None => Asignacion::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Assignment not found".to_string()))?,
    };

    Ok(Json(AsignacionResponse {
        message: "Assignment updated".to_string(),
        asignacion,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let existed = Asignacion::delete(&state.db, id).await?;
    if !existed {
        return Err(ApiError::NotFound("Assignment not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Assignment deleted")))
}
