/// Reusable technique catalog
///
/// Techniques are shared across projects and attached to subprocesses. Like
/// user accounts they are soft-deactivated, never hard-deleted, so existing
/// assignments keep pointing at a real row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::double_option;

/// A technique
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Tecnica {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria: String,
    pub activo: bool,
    pub fecha_creacion: DateTime<Utc>,
}

/// Input for creating a technique
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTecnica {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria: String,
    /// Defaults to active
    pub activo: Option<bool>,
}

/// Input for updating a technique; only supplied fields are patched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTecnica {
    pub nombre: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub descripcion: Option<Option<String>>,

    pub categoria: Option<String>,

    pub activo: Option<bool>,
}

const TECNICA_COLUMNS: &str = "id, nombre, descripcion, categoria, activo, fecha_creacion";

impl Tecnica {
    /// Lists active techniques, optionally filtered by category
    pub async fn list_active(
        pool: &PgPool,
        categoria: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        match categoria {
            Some(categoria) => {
                sqlx::query_as::<_, Tecnica>(&format!(
                    "SELECT {} FROM tecnicas WHERE activo = TRUE AND categoria = $1 ORDER BY id",
                    TECNICA_COLUMNS
                ))
                .bind(categoria)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Tecnica>(&format!(
                    "SELECT {} FROM tecnicas WHERE activo = TRUE ORDER BY id",
                    TECNICA_COLUMNS
                ))
                .fetch_all(pool)
                .await
            }
        }
    }

    /// Lists every technique, including deactivated ones
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tecnica>(&format!(
            "SELECT {} FROM tecnicas ORDER BY id",
            TECNICA_COLUMNS
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tecnica>(&format!(
            "SELECT {} FROM tecnicas WHERE id = $1",
            TECNICA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(pool: &PgPool, data: CreateTecnica) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Tecnica>(&format!(
            r#"
            INSERT INTO tecnicas (nombre, descripcion, categoria, activo)
            VALUES ($1, $2, $3, COALESCE($4, TRUE))
            RETURNING {}
            "#,
            TECNICA_COLUMNS
        ))
        .bind(data.nombre)
        .bind(data.descripcion)
        .bind(data.categoria)
        .bind(data.activo)
        .fetch_one(pool)
        .await
    }

    /// Patches a technique; returns `None` if it does not exist
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateTecnica,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sets: Vec<String> = Vec::new();
        let mut bind_count = 1;

        if data.nombre.is_some() {
            bind_count += 1;
            sets.push(format!("nombre = ${}", bind_count));
        }
        if data.descripcion.is_some() {
            bind_count += 1;
            sets.push(format!("descripcion = ${}", bind_count));
        }
        if data.categoria.is_some() {
            bind_count += 1;
            sets.push(format!("categoria = ${}", bind_count));
        }
        if data.activo.is_some() {
            bind_count += 1;
            sets.push(format!("activo = ${}", bind_count));
        }

        if sets.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let query = format!(
            "UPDATE tecnicas SET {} WHERE id = $1 RETURNING {}",
            sets.join(", "),
            TECNICA_COLUMNS
        );

        let mut q = sqlx::query_as::<_, Tecnica>(&query).bind(id);

        if let Some(nombre) = data.nombre {
            q = q.bind(nombre);
        }
        if let Some(descripcion) = data.descripcion {
            q = q.bind(descripcion);
        }
        if let Some(categoria) = data.categoria {
            q = q.bind(categoria);
        }
        if let Some(activo) = data.activo {
            q = q.bind(activo);
        }

        q.fetch_optional(pool).await
    }

    /// Soft-deactivates a technique; returns true if it existed
    pub async fn deactivate(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tecnicas SET activo = FALSE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
