/// Project membership endpoints
///
/// # Endpoints
///
/// - `GET /miembros/proyecto/:proyecto_id` - Members with joined user/role data
/// - `POST /miembros` - Assign a user to a project
/// - `PUT /miembros/:id` - Change a member's role
/// - `DELETE /miembros/:id` - Remove a member
///
/// Assignment and reassignment enforce the singleton rule for the fixed
/// "Product Owner" and "Technical Leader" roles: at most one holder per
/// project.

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
use gestproy_shared::{auth::middleware::AuthContext, models::miembro::Miembro};
use serde::{Deserialize, Serialize};

/// Assign-member request; all three ids are required
#[derive(Debug, Deserialize)]
pub struct CreateMiembroRequest {
    pub proyecto_id: Option<i64>,
    pub usuario_id: Option<i64>,
    pub rol_id: Option<i64>,
}

/// Update-member request; only the role can change
#[derive(Debug, Deserialize)]
pub struct UpdateMiembroRequest {
    pub rol_id: Option<i64>,
}

/// Response envelope for create/update
#[derive(Debug, Serialize)]
pub struct MiembroResponse {
    pub message: String,
    pub miembro: Miembro,
}

/// Lists a project's members with joined user and role display data
pub async fn list_by_proyecto(
    State(state): State<AppState>,
    Path(proyecto_id): Path<i64>,
) -> ApiResult<Json<Vec<Miembro>>> {
    let miembros = Miembro::list_by_proyecto(&state.db, proyecto_id).await?;

    Ok(Json(miembros))
}

/// Assigns a user to a project
///
/// # Errors
///
/// - `400`: Missing id field, duplicate membership, or singleton fixed role
///   already held in the project
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateMiembroRequest>,
) -> ApiResult<(StatusCode, Json<MiembroResponse>)> {
    let proyecto_id = req
        .proyecto_id
        .ok_or_else(|| ApiError::Validation("Field 'proyecto_id' is required".to_string()))?;
    let usuario_id = req
        .usuario_id
        .ok_or_else(|| ApiError::Validation("Field 'usuario_id' is required".to_string()))?;
    let rol_id = req
        .rol_id
        .ok_or_else(|| ApiError::Validation("Field 'rol_id' is required".to_string()))?;

    let miembro = Miembro::create(&state.db, proyecto_id, usuario_id, rol_id, auth.user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(MiembroResponse {
            message: "Member assigned".to_string(),
            miembro,
        }),
    ))
}

/// Changes a member's role
///
/// A request without `rol_id` is a no-op that returns the current record,
/// matching partial-update semantics.
///
/// # Errors
///
/// - `400`: Singleton fixed role already held by another member
/// - `404`: Membership absent
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateMiembroRequest>,
) -> ApiResult<Json<MiembroResponse>> {
    let miembro = match req.rol_id {
        Some(rol_id) => Miembro::update_rol(&state.db, id, rol_id).await?,
        None => Miembro::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Member not found".to_string()))?,
    };

    Ok(Json(MiembroResponse {
        message: "Member updated".to_string(),
        miembro,
    }))
}

/// Removes a member from a project
///
/// No guard against removing the project's last Product Owner; the project's
/// creator reference is unaffected.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    Miembro::delete(&state.db, id).await?;

    Ok(Json(MessageResponse::new("Member removed from project")))
}
