/// Account management endpoints
///
/// Accounts are mutated only by their own owner and are soft-deactivated
/// rather than deleted.
///
/// # Endpoints
///
/// - `GET /usuarios` - Active accounts
/// - `GET /usuarios/:id` - Single account
/// - `PUT /usuarios/:id` - Self-only partial update
/// - `DELETE /usuarios/:id` - Self-only deactivation

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::MessageResponse,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use gestproy_shared::{
    auth::{middleware::AuthContext, password},
    models::usuario::{UpdateUsuario, Usuario},
};
use serde::{Deserialize, Serialize};

/// Update-account request; only supplied fields are patched
#[derive(Debug, Deserialize)]
pub struct UpdateUsuarioRequest {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub correo: Option<String>,
    /// Plaintext; re-hashed before storage
    pub contrasena: Option<String>,
}

/// Response envelope for update
#[derive(Debug, Serialize)]
pub struct UsuarioResponse {
    pub message: String,
    pub usuario: Usuario,
}

/// Lists active accounts
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Usuario>>> {
    let usuarios = Usuario::list_active(&state.db).await?;

    Ok(Json(usuarios))
}

/// Single account by id
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Usuario>> {
    let usuario = Usuario::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(usuario))
}

/// Patches the caller's own account
///
/// # Errors
///
/// - `400`: Email already in use by another account
/// - `403`: Caller is not the account owner
/// - `404`: Account absent
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUsuarioRequest>,
) -> ApiResult<Json<UsuarioResponse>> {
    if auth.user_id != id {
        return Err(ApiError::Forbidden(
            "You may only update your own account".to_string(),
        ));
    }

    if let Some(ref correo) = req.correo {
        if Usuario::correo_taken(&state.db, correo, id).await? {
            return Err(ApiError::Conflict("Email is already in use".to_string()));
        }
    }

    let contrasena = match req.contrasena {
        Some(plaintext) => Some(password::hash_password(&plaintext)?),
        None => None,
    };

    let usuario = Usuario::update(
        &state.db,
        id,
        UpdateUsuario {
            nombre: req.nombre,
            apellido: req.apellido,
            correo: req.correo,
            contrasena,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UsuarioResponse {
        message: "User updated".to_string(),
        usuario,
    }))
}

/// Soft-deactivates the caller's own account
///
/// # Errors
///
/// - `403`: Caller is not the account owner
/// - `404`: Account absent
pub async fn deactivate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    if auth.user_id != id {
        return Err(ApiError::Forbidden(
            "You may only deactivate your own account".to_string(),
        ));
    }

    let existed = Usuario::deactivate(&state.db, id).await?;
    if !existed {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(MessageResponse::new("User deactivated")))
}
