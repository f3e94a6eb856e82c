/// Technique-to-subprocess assignments
///
/// Many-to-many link with optional notes; unique per (subproceso, tecnica),
/// enforced both here and by a store-level constraint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Technique display data joined onto an assignment
#[derive(Debug, Clone, Serialize)]
pub struct TecnicaResumen {
    pub id: i64,
    pub nombre: String,
    pub categoria: String,
}

/// A technique assignment with joined technique display data
#[derive(Debug, Clone, Serialize)]
pub struct Asignacion {
    pub id: i64,
    pub subproceso_id: i64,
    pub tecnica_id: i64,
    pub notas: Option<String>,
    pub fecha_asignacion: DateTime<Utc>,
    pub tecnica: TecnicaResumen,
}

#[derive(Debug, sqlx::FromRow)]
struct AsignacionRow {
    id: i64,
    subproceso_id: i64,
    tecnica_id: i64,
    notas: Option<String>,
    fecha_asignacion: DateTime<Utc>,
    tecnica_nombre: String,
    tecnica_categoria: String,
}

impl From<AsignacionRow> for Asignacion {
    fn from(row: AsignacionRow) -> Self {
        Asignacion {
            id: row.id,
            subproceso_id: row.subproceso_id,
            tecnica_id: row.tecnica_id,
            notas: row.notas,
            fecha_asignacion: row.fecha_asignacion,
            tecnica: TecnicaResumen {
                id: row.tecnica_id,
                nombre: row.tecnica_nombre,
                categoria: row.tecnica_categoria,
            },
        }
    }
}

/// Input for updating an assignment's notes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAsignacion {
    pub notas: Option<String>,
}

const ASIGNACION_JOIN: &str = r#"
    SELECT st.id, st.subproceso_id, st.tecnica_id, st.notas, st.fecha_asignacion,
           t.nombre AS tecnica_nombre, t.categoria AS tecnica_categoria
    FROM subproceso_tecnicas st
    JOIN tecnicas t ON st.tecnica_id = t.id
"#;

impl Asignacion {
    pub async fn list_by_subproceso(
        pool: &PgPool,
        subproceso_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AsignacionRow>(&format!(
            "{} WHERE st.subproceso_id = $1 ORDER BY st.id",
            ASIGNACION_JOIN
        ))
        .bind(subproceso_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Asignacion::from).collect())
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, AsignacionRow>(&format!("{} WHERE st.id = $1", ASIGNACION_JOIN))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Asignacion::from))
    }

    /// Checks whether a technique is already assigned to a subprocess
    pub async fn exists(
        pool: &PgPool,
        subproceso_id: i64,
        tecnica_id: i64,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM subproceso_tecnicas
                WHERE subproceso_id = $1 AND tecnica_id = $2
            )
            "#,
        )
        .bind(subproceso_id)
        .bind(tecnica_id)
        .fetch_one(pool)
        .await
    }

    pub async fn create(
        pool: &PgPool,
        subproceso_id: i64,
        tecnica_id: i64,
        notas: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO subproceso_tecnicas (subproceso_id, tecnica_id, notas)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(subproceso_id)
        .bind(tecnica_id)
        .bind(notas)
        .fetch_one(pool)
        .await?;

        let asignacion = Self::find_by_id(pool, id).await?;
        asignacion.ok_or(sqlx::Error::RowNotFound)
    }

    /// Updates the assignment's notes; returns `None` if it does not exist
    pub async fn update_notas(
        pool: &PgPool,
        id: i64,
        notas: Option<&str>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let updated: Option<i64> = sqlx::query_scalar(
            "UPDATE subproceso_tecnicas SET notas = $1 WHERE id = $2 RETURNING id",
        )
        .bind(notas)
        .bind(id)
        .fetch_optional(pool)
        .await?;

        match updated {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Returns true if the assignment existed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subproceso_tecnicas WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
