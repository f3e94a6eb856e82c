/// Technique catalog endpoints (plain CRUD, soft delete)
///
/// # Endpoints
///
/// - `GET /tecnicas?categoria=` - Active techniques, optional category filter
/// - `GET /tecnicas/todas` - Every technique including deactivated ones
/// - `GET /tecnicas/:id`
/// - `POST /tecnicas`
/// - `PUT /tecnicas/:id`
/// - `DELETE /tecnicas/:id` - Deactivates instead of deleting

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
use gestproy_shared::models::tecnica::{CreateTecnica, Tecnica, UpdateTecnica};
use serde::{Deserialize, Serialize};

/// Query parameters for technique listing
#[derive(Debug, Deserialize)]
pub struct ListTecnicasQuery {
    pub categoria: Option<String>,
}

/// Create-technique request; `nombre` and `categoria` are required
#[derive(Debug, Deserialize)]
pub struct CreateTecnicaRequest {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    pub activo: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct TecnicaResponse {
    pub message: String,
    pub tecnica: Tecnica,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListTecnicasQuery>,
) -> ApiResult<Json<Vec<Tecnica>>> {
    let tecnicas = Tecnica::list_active(&state.db, query.categoria.as_deref()).await?;

    Ok(Json(tecnicas))
}

pub async fn list_all(State(state): State<AppState>) -> ApiResult<Json<Vec<Tecnica>>> {
    let tecnicas = Tecnica::list_all(&state.db).await?;

    Ok(Json(tecnicas))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Tecnica>> {
    let tecnica = Tecnica::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Technique not found".to_string()))?;

    Ok(Json(tecnica))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateTecnicaRequest>,
) -> ApiResult<(StatusCode, Json<TecnicaResponse>)> {
    let nombre = req
        .nombre
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'nombre' is required".to_string()))?;
    let categoria = req
        .categoria
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'categoria' is required".to_string()))?;

    let tecnica = Tecnica::create(
        &state.db,
        CreateTecnica {
            nombre,
            descripcion: req.descripcion,
            categoria,
            activo: req.activo,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(TecnicaResponse {
            message: "Technique created".to_string(),
            tecnica,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTecnica>,
) -> ApiResult<Json<TecnicaResponse>> {
    let tecnica = Tecnica::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Technique not found".to_string()))?;

    Ok(Json(TecnicaResponse {
        message: "Technique updated".to_string(),
        tecnica,
    }))
}

/// Soft-deactivates a technique; existing assignments keep their reference
pub async fn deactivate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let existed = Tecnica::deactivate(&state.db, id).await?;
    if !existed {
        return Err(ApiError::NotFound("Technique not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Technique deactivated")))
}
