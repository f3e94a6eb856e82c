/// Process endpoints (plain CRUD)
///
/// # Endpoints
///
/// - `GET /procesos/proyecto/:proyecto_id`
/// - `GET /procesos/:id`
/// - `POST /procesos`
/// - `PUT /procesos/:id`
/// - `DELETE /procesos/:id`

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
use gestproy_shared::models::proceso::{CreateProceso, Proceso, UpdateProceso};
use serde::{Deserialize, Serialize};

/// Create-process request; `proyecto_id` and `nombre` are required
#[derive(Debug, Deserialize)]
pub struct CreateProcesoRequest {
    pub proyecto_id: Option<i64>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub objetivo: Option<String>,
    pub responsable_id: Option<i64>,
    pub estado: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcesoResponse {
    pub message: String,
    pub proceso: Proceso,
}

pub async fn list_by_proyecto(
    State(state): State<AppState>,
    Path(proyecto_id): Path<i64>,
) -> ApiResult<Json<Vec<Proceso>>> {
    let procesos = Proceso::list_by_proyecto(&state.db, proyecto_id).await?;

    Ok(Json(procesos))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Proceso>> {
    let proceso = Proceso::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Process not found".to_string()))?;

    Ok(Json(proceso))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateProcesoRequest>,
) -> ApiResult<(StatusCode, Json<ProcesoResponse>)> {
    let proyecto_id = req
        .proyecto_id
        .ok_or_else(|| ApiError::Validation("Field 'proyecto_id' is required".to_string()))?;
    let nombre = req
        .nombre
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'nombre' is required".to_string()))?;

    let proceso = Proceso::create(
        &state.db,
        proyecto_id,
        CreateProceso {
            nombre,
            descripcion: req.descripcion,
            objetivo: req.objetivo,
            responsable_id: req.responsable_id,
            estado: req.estado,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProcesoResponse {
            message: "Process created".to_string(),
            proceso,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProceso>,
) -> ApiResult<Json<ProcesoResponse>> {
    let proceso = Proceso::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Process not found".to_string()))?;

    Ok(Json(ProcesoResponse {
        message: "Process updated".to_string(),
        proceso,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let existed = Proceso::delete(&state.db, id).await?;
    if !existed {
        return Err(ApiError::NotFound("Process not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Process deleted")))
}
