/// Role catalog endpoints
///
/// # Endpoints
///
/// - `GET /roles?proyecto_id=` - Fixed roles, plus a project's custom roles
/// - `GET /roles/:id` - Single role
/// - `POST /roles` - Create a custom role
/// - `PUT /roles/:id` - Update a custom role (fixed roles are immutable)
/// - `DELETE /roles/:id` - Delete a custom role (fixed roles are undeletable)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use gestproy_shared::models::rol::{Rol, UpdateRol};
use serde::{Deserialize, Serialize};

/// Query parameters for role listing
#[derive(Debug, Deserialize)]
pub struct ListRolesQuery {
    pub proyecto_id: Option<i64>,
}

/// Create-role request; `proyecto_id` and `nombre` are required
#[derive(Debug, Deserialize)]
pub struct CreateRolRequest {
    pub proyecto_id: Option<i64>,
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
}

/// Response envelope for create/update
#[derive(Debug, Serialize)]
pub struct RolResponse {
    pub message: String,
    pub rol: Rol,
}

/// Lists roles visible to a project
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListRolesQuery>,
) -> ApiResult<Json<Vec<Rol>>> {
    let roles = Rol::list(&state.db, query.proyecto_id).await?;

    Ok(Json(roles))
}

/// Single role by id
pub async fn get_by_id(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<Rol>> {
    let rol = Rol::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;

    Ok(Json(rol))
}

/// Creates a custom role for a project
///
/// # Errors
///
/// - `400`: Missing `nombre` or `proyecto_id`
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRolRequest>,
) -> ApiResult<(StatusCode, Json<RolResponse>)> {
    let nombre = req
        .nombre
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'nombre' is required".to_string()))?;
    let proyecto_id = req
        .proyecto_id
        .ok_or_else(|| ApiError::Validation("Field 'proyecto_id' is required".to_string()))?;

    let rol = Rol::create(&state.db, proyecto_id, &nombre, req.descripcion.as_deref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RolResponse {
            message: "Role created".to_string(),
            rol,
        }),
    ))
}

/// Patches a custom role
///
/// # Errors
///
/// - `403`: Role is fixed
/// - `404`: Role absent
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateRol>,
) -> ApiResult<Json<RolResponse>> {
    let rol = Rol::update(&state.db, id, req).await?;

    Ok(Json(RolResponse {
        message: "Role updated".to_string(),
        rol,
    }))
}

/// Deletes a custom role
///
/// # Errors
///
/// - `403`: Role is fixed
/// - `404`: Role absent
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    Rol::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Role deleted")))
}
