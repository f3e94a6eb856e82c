/// Project lifecycle endpoints
///
/// # Endpoints
///
/// - `GET /proyectos` - Projects the caller created or belongs to
/// - `GET /proyectos/:id` - Single project
/// - `POST /proyectos` - Create; provisions the caller as Product Owner
/// - `PUT /proyectos/:id` - Partial update
/// - `DELETE /proyectos/:id` - Creator only

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use gestproy_shared::{
    auth::middleware::AuthContext,
    models::proyecto::{CreateProyecto, Proyecto, UpdateProyecto},
};
use serde::{Deserialize, Serialize};

/// Create-project request; `nombre` and `prioridad` are required
#[derive(Debug, Deserialize)]
pub struct CreateProyectoRequest {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub estado: Option<String>,
    pub prioridad: Option<String>,
    pub fecha_inicio: Option<NaiveDate>,
    pub fecha_fin: Option<NaiveDate>,
}

/// Response envelope for create/update
#[derive(Debug, Serialize)]
pub struct ProyectoResponse {
    pub message: String,
    pub proyecto: Proyecto,
}

/// Lists the caller's projects: created ∪ member-of, no duplicates
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Proyecto>>> {
    let proyectos = Proyecto::list_for_user(&state.db, auth.user_id).await?;

    Ok(Json(proyectos))
}

/// Single project by id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Proyecto>> {
    let proyecto = Proyecto::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(proyecto))
}

/// Creates a project with the caller as creator and Product Owner
///
/// # Errors
///
/// - `400`: Missing `nombre` or `prioridad`
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProyectoRequest>,
) -> ApiResult<(StatusCode, Json<ProyectoResponse>)> {
    let nombre = req
        .nombre
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'nombre' is required".to_string()))?;
    let prioridad = req
        .prioridad
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'prioridad' is required".to_string()))?;

    let proyecto = Proyecto::create(
        &state.db,
        CreateProyecto {
            nombre,
            descripcion: req.descripcion,
            estado: req.estado,
            prioridad,
            fecha_inicio: req.fecha_inicio,
            fecha_fin: req.fecha_fin,
        },
        auth.user_id,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ProyectoResponse {
            message: "Project created".to_string(),
            proyecto,
        }),
    ))
}

/// Patches a project; unspecified fields are left untouched
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProyecto>,
) -> ApiResult<Json<ProyectoResponse>> {
    let proyecto = Proyecto::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(ProyectoResponse {
        message: "Project updated".to_string(),
        proyecto,
    }))
}

/// Deletes a project; only the creator may do this
///
/// # Errors
///
/// - `403`: Caller is not the creator
/// - `404`: Project absent
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    Proyecto::delete(&state.db, id, auth.user_id).await?;

    Ok(Json(MessageResponse::new("Project deleted")))
}
