/// Stakeholder endpoints (plain CRUD)
///
/// # Endpoints
///
/// - `GET /stakeholders/proyecto/:proyecto_id`
/// - `GET /stakeholders/:id`
/// - `POST /stakeholders`
/// - `PUT /stakeholders/:id`
/// - `DELETE /stakeholders/:id`

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
use gestproy_shared::models::stakeholder::{CreateStakeholder, Stakeholder, UpdateStakeholder};
use serde::{Deserialize, Serialize};

/// Create-stakeholder request; `proyecto_id`, `nombre_completo`, `tipo`, and
/// `nivel_influencia_interes` are required
#[derive(Debug, Deserialize)]
pub struct CreateStakeholderRequest {
    pub proyecto_id: Option<i64>,
    pub nombre_completo: Option<String>,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub organizacion: Option<String>,
    pub cargo: Option<String>,
    pub tipo: Option<String>,
    pub nivel_influencia_interes: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StakeholderResponse {
    pub message: String,
    pub stakeholder: Stakeholder,
}

pub async fn list_by_proyecto(
    State(state): State<AppState>,
    Path(proyecto_id): Path<i64>,
) -> ApiResult<Json<Vec<Stakeholder>>> {
    let stakeholders = Stakeholder::list_by_proyecto(&state.db, proyecto_id).await?;

    Ok(Json(stakeholders))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Stakeholder>> {
    let stakeholder = Stakeholder::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Stakeholder not found".to_string()))?;

    Ok(Json(stakeholder))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateStakeholderRequest>,
) -> ApiResult<(StatusCode, Json<StakeholderResponse>)> {
    let proyecto_id = req
        .proyecto_id
        .ok_or_else(|| ApiError::Validation("Field 'proyecto_id' is required".to_string()))?;
    let nombre_completo = req
        .nombre_completo
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'nombre_completo' is required".to_string()))?;
    let tipo = req
        .tipo
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Field 'tipo' is required".to_string()))?;
    let nivel_influencia_interes = req.nivel_influencia_interes.filter(|s| !s.is_empty()).ok_or_else(|| {
        ApiError::Validation("Field 'nivel_influencia_interes' is required".to_string())
    })?;

    let stakeholder = Stakeholder::create(
        &state.db,
        proyecto_id,
        CreateStakeholder {
            nombre_completo,
            correo: req.correo,
            telefono: req.telefono,
            organizacion: req.organizacion,
            cargo: req.cargo,
            tipo,
            nivel_influencia_interes,
            notas: req.notas,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(StakeholderResponse {
            message: "Stakeholder created".to_string(),
            stakeholder,
        }),
    ))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStakeholder>,
) -> ApiResult<Json<StakeholderResponse>> {
    let stakeholder = Stakeholder::update(&state.db, id, req)
        .await?
        .ok_or_else(|| ApiError::NotFound("Stakeholder not found".to_string()))?;

    Ok(Json(StakeholderResponse {
        message: "Stakeholder updated".to_string(),
        stakeholder,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<MessageResponse>> {
    let existed = Stakeholder::delete(&state.db, id).await?;
    if !existed {
        return Err(ApiError::NotFound("Stakeholder not found".to_string()));
    }

    Ok(Json(MessageResponse::new("Stakeholder deleted")))
}
