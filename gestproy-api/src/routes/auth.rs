/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Register a new account, returns tokens
/// - `POST /auth/login` - Authenticate, returns tokens
/// - `POST /auth/refresh` - Exchange a refresh token for a new access token
/// - `GET /auth/me` - Current caller identity (requires token)
///
/// Access tokens live 24 hours, refresh tokens 30 days.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use gestproy_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::usuario::{CreateUsuario, Usuario},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
///
/// Fields are optional at the wire level so an absent field fails request
/// validation (400) instead of body deserialization.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// First name
    #[validate(required(message = "Field 'nombre' is required"))]
    pub nombre: Option<String>,

    /// Last name
    #[validate(required(message = "Field 'apellido' is required"))]
    pub apellido: Option<String>,

    /// Email address
    #[validate(
        required(message = "Field 'correo' is required"),
        email(message = "Invalid email format")
    )]
    pub correo: Option<String>,

    /// Password
    #[validate(
        required(message = "Field 'contrasena' is required"),
        length(min = 8, message = "Password must be at least 8 characters")
    )]
    pub contrasena: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub correo: Option<String>,
    pub contrasena: Option<String>,
}

/// Register/login response: caller identity plus token pair
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub usuario: Usuario,
    /// Access token (24h)
    pub access_token: String,
    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

fn validation_message(e: &validator::ValidationErrors) -> String {
    e.field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .filter_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Request validation failed".to_string())
}

/// Register a new account
///
/// # Errors
///
/// - `400`: Missing or malformed field, or email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()
        .map_err(|e| ApiError::Validation(validation_message(&e)))?;

    // Required-field validation passed; the unwraps below cannot trip
    let nombre = req.nombre.unwrap_or_default();
    let apellido = req.apellido.unwrap_or_default();
    let correo = req.correo.unwrap_or_default();
    let plaintext = req.contrasena.unwrap_or_default();

    if Usuario::find_by_correo(&state.db, &correo).await?.is_some() {
        return Err(ApiError::Conflict("Email is already registered".to_string()));
    }

    let contrasena = password::hash_password(&plaintext)?;

    let usuario = Usuario::create(
        &state.db,
        CreateUsuario {
            nombre,
            apellido,
            correo,
            contrasena,
        },
    )
    .await?;

    let access_token = jwt::create_token(
        &jwt::Claims::new(usuario.id, jwt::TokenType::Access),
        state.jwt_secret(),
    )?;
    let refresh_token = jwt::create_token(
        &jwt::Claims::new(usuario.id, jwt::TokenType::Refresh),
        state.jwt_secret(),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            usuario,
            access_token,
            refresh_token,
        }),
    ))
}

/// Login with email and password
///
/// # Errors
///
/// - `400`: Missing credentials
/// - `401`: Invalid credentials or deactivated account
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let correo = req
        .correo
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Email and password are required".to_string()))?;
    let contrasena = req
        .contrasena
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Email and password are required".to_string()))?;

    let usuario = Usuario::find_by_correo(&state.db, &correo)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&contrasena, &usuario.contrasena)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    if !usuario.activo {
        return Err(ApiError::Unauthorized("Account is deactivated".to_string()));
    }

    let access_token = jwt::create_token(
        &jwt::Claims::new(usuario.id, jwt::TokenType::Access),
        state.jwt_secret(),
    )?;
    let refresh_token = jwt::create_token(
        &jwt::Claims::new(usuario.id, jwt::TokenType::Refresh),
        state.jwt_secret(),
    )?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        usuario,
        access_token,
        refresh_token,
    }))
}

/// Exchange a refresh token for a new access token
///
/// # Errors
///
/// - `401`: Invalid or expired refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let refresh_token = req
        .refresh_token
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'refresh_token' is required".to_string()))?;

    let access_token = jwt::refresh_access_token(&refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Current caller identity
///
/// # Errors
///
/// - `404`: Token subject no longer exists
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Usuario>> {
    let usuario = Usuario::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(usuario))
}
