/// Project stakeholders
///
/// Contact records with an influence/interest classification. Plain CRUD.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::double_option;

/// A stakeholder record
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Stakeholder {
    pub id: i64,
    pub proyecto_id: i64,
    pub nombre_completo: String,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub organizacion: Option<String>,
    pub cargo: Option<String>,
    pub tipo: String,
    pub nivel_influencia_interes: String,
    pub notas: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
}

/// Input for creating a stakeholder
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStakeholder {
    pub nombre_completo: String,
    pub correo: Option<String>,
    pub telefono: Option<String>,
    pub organizacion: Option<String>,
    pub cargo: Option<String>,
    pub tipo: String,
    pub nivel_influencia_interes: String,
    pub notas: Option<String>,
}

/// Input for updating a stakeholder; only supplied fields are patched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStakeholder {
    pub nombre_completo: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub correo: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub telefono: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub organizacion: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub cargo: Option<Option<String>>,

    pub tipo: Option<String>,

    pub nivel_influencia_interes: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub notas: Option<Option<String>>,
}

const STAKEHOLDER_COLUMNS: &str = "id, proyecto_id, nombre_completo, correo, telefono, \
                                   organizacion, cargo, tipo, nivel_influencia_interes, notas, \
                                   fecha_creacion";

impl Stakeholder {
    pub async fn list_by_proyecto(
        pool: &PgPool,
        proyecto_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Stakeholder>(&format!(
            "SELECT {} FROM stakeholders WHERE proyecto_id = $1 ORDER BY id",
            STAKEHOLDER_COLUMNS
        ))
        .bind(proyecto_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Stakeholder>(&format!(
            "SELECT {} FROM stakeholders WHERE id = $1",
            STAKEHOLDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &PgPool,
        proyecto_id: i64,
        data: CreateStakeholder,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Stakeholder>(&format!(
            r#"
            INSERT INTO stakeholders
                (proyecto_id, nombre_completo, correo, telefono, organizacion, cargo,
                 tipo, nivel_influencia_interes, notas)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            STAKEHOLDER_COLUMNS
        ))
        .bind(proyecto_id)
        .bind(data.nombre_completo)
        .bind(data.correo)
        .bind(data.telefono)
        .bind(data.organizacion)
        .bind(data.cargo)
        .bind(data.tipo)
        .bind(data.nivel_influencia_interes)
        .bind(data.notas)
        .fetch_one(pool)
        .await
    }

    /// Patches a stakeholder; returns `None` if it does not exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateStakeholder,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.nombre_completo.is_some() {
            bind_count += 1;
            sets.push(format!("nombre_completo = ${}", bind_count));
        }
        if data.correo.is_some() {
            bind_count += 1;
            sets.push(format!("correo = ${}", bind_count));
        }
        if data.telefono.is_some() {
            bind_count += 1;
            sets.push(format!("telefono = ${}", bind_count));
        }
        if data.organizacion.is_some() {
            bind_count += 1;
            sets.push(format!("organizacion = ${}", bind_count));
        }
        if data.cargo.is_some() {
            bind_count += 1;
            sets.push(format!("cargo = ${}", bind_count));
        }
        if data.tipo.is_some() {
            bind_count += 1;
            sets.push(format!("tipo = ${}", bind_count));
        }
        if data.nivel_influencia_interes.is_some() {
            bind_count += 1;
            sets.push(format!("nivel_influencia_interes = ${}", bind_count));
        }
        if data.notas.is_some() {
            bind_count += 1;
            sets.push(format!("notas = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let query = format!(
            "UPDATE stakeholders SET {} WHERE id = $1 RETURNING {}",
            sets.join(", "),
            STAKEHOLDER_COLUMNS
        );

        let mut q = sqlx::query_as::<_, Stakeholder>(&query).bind(id);

        if let Some(nombre_completo) = data.nombre_completo {
            q = q.bind(nombre_completo);
        }
        if let Some(correo) = data.correo {
            q = q.bind(correo);
        }
        if let Some(telefono) = data.telefono {
            q = q.bind(telefono);
        }
        if let Some(organizacion) = data.organizacion {
            q = q.bind(organizacion);
        }
        if let Some(cargo) = data.cargo {
            q = q.bind(cargo);
        }
        if let Some(tipo) = data.tipo {
            q = q.bind(tipo);
        }
        if let Some(nivel) = data.nivel_influencia_interes {
            q = q.bind(nivel);
        }
        if let Some(notas) = data.notas {
            q = q.bind(notas);
        }

        q.fetch_optional(pool).await
    }

    /// Returns true if the stakeholder existed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stakeholders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
