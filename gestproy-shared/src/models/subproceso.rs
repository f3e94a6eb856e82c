/// Subprocesses: work items nested under a process
///
/// Same shape as processes plus an estimated-hours field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::double_option;
use super::proceso::ResponsableResumen;

/// A subprocess with joined responsible-user display data
#[derive(Debug, Clone, Serialize)]
pub struct Subproceso {
    pub id: i64,
    pub proceso_id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub responsable_id: Option<i64>,
    pub estado: String,
    pub horas_estimadas: Option<f64>,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
    pub responsable: Option<ResponsableResumen>,
}

#[derive(Debug, sqlx::FromRow)]
struct SubprocesoRow {
    id: i64,
    proceso_id: i64,
    nombre: String,
    descripcion: Option<String>,
    responsable_id: Option<i64>,
    estado: String,
    horas_estimadas: Option<f64>,
    fecha_creacion: DateTime<Utc>,
    fecha_actualizacion: DateTime<Utc>,
    responsable_nombre: Option<String>,
    responsable_apellido: Option<String>,
}

impl From<SubprocesoRow> for Subproceso {
    fn from(row: SubprocesoRow) -> Self {
        let responsable = match (row.responsable_id, row.responsable_nombre, row.responsable_apellido)
        {
            (Some(id), Some(nombre), Some(apellido)) => Some(ResponsableResumen {
                id,
                nombre,
                apellido,
            }),
            _ => None,
        };

        Subproceso {
            id: row.id,
            proceso_id: row.proceso_id,
            nombre: row.nombre,
            descripcion: row.descripcion,
            responsable_id: row.responsable_id,
            estado: row.estado,
            horas_estimadas: row.horas_estimadas,
            fecha_creacion: row.fecha_creacion,
            fecha_actualizacion: row.fecha_actualizacion,
            responsable,
        }
    }
}

/// Input for creating a subprocess
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubproceso {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub responsable_id: Option<i64>,
    /// Defaults to "definido"
    pub estado: Option<String>,
    pub horas_estimadas: Option<f64>,
}

/// Input for updating a subprocess; only supplied fields are patched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubproceso {
    pub nombre: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub descripcion: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub responsable_id: Option<Option<i64>>,

    pub estado: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub horas_estimadas: Option<Option<f64>>,
}

const SUBPROCESO_JOIN: &str = r#"
    SELECT s.id, s.proceso_id, s.nombre, s.descripcion, s.responsable_id,
           s.estado, s.horas_estimadas, s.fecha_creacion, s.fecha_actualizacion,
           u.nombre AS responsable_nombre, u.apellido AS responsable_apellido
    FROM subprocesos s
    LEFT JOIN usuarios u ON s.responsable_id = u.id
"#;

impl Subproceso {
    pub async fn list_by_proceso(pool: &PgPool, proceso_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, SubprocesoRow>(&format!(
            "{} WHERE s.proceso_id = $1 ORDER BY s.id",
            SUBPROCESO_JOIN
        ))
        .bind(proceso_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Subproceso::from).collect())
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let row =
            sqlx::query_as::<_, SubprocesoRow>(&format!("{} WHERE s.id = $1", SUBPROCESO_JOIN))
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(row.map(Subproceso::from))
    }

    pub async fn create(
        pool: &PgPool,
        proceso_id: i64,
        data: CreateSubproceso,
    ) -> Result<Self, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO subprocesos (proceso_id, nombre, descripcion, responsable_id, estado, horas_estimadas)
            VALUES ($1, $2, $3, $4, COALESCE($5, 'definido'), $6)
            RETURNING id
            "#,
        )
        .bind(proceso_id)
        .bind(data.nombre)
        .bind(data.descripcion)
        .bind(data.responsable_id)
        .bind(data.estado)
        .bind(data.horas_estimadas)
        .fetch_one(pool)
        .await?;

        let subproceso = Self::find_by_id(pool, id).await?;
        subproceso.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateSubproceso,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sets = vec!["fecha_actualizacion = NOW()".to_string()];
        let mut bind_count = 1;

        if data.nombre.is_some() {
            bind_count += 1;
            sets.push(format!("nombre = ${}", bind_count));
        }
        if data.descripcion.is_some() {
            bind_count += 1;
            sets.push(format!("descripcion = ${}", bind_count));
        }
        if data.responsable_id.is_some() {
            bind_count += 1;
            sets.push(format!("responsable_id = ${}", bind_count));
        }
        if data.estado.is_some() {
            bind_count += 1;
            sets.push(format!("estado = ${}", bind_count));
        }
        if data.horas_estimadas.is_some() {
            bind_count += 1;
            sets.push(format!("horas_estimadas = ${}", bind_count));
        }

        let query = format!(
            "UPDATE subprocesos SET {} WHERE id = $1 RETURNING id",
            sets.join(", ")
        );

        let mut q = sqlx::query_scalar::<_, i64>(&query).bind(id);

        if let Some(nombre) = data.nombre {
            q = q.bind(nombre);
        }
        if let Some(descripcion) = data.descripcion {
            q = q.bind(descripcion);
        }
        if let Some(responsable_id) = data.responsable_id {
            q = q.bind(responsable_id);
        }
        if let Some(estado) = data.estado {
            q = q.bind(estado);
        }
        if let Some(horas_estimadas) = data.horas_estimadas {
            q = q.bind(horas_estimadas);
        }

        match q.fetch_optional(pool).await? {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Returns true if the subprocess existed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subprocesos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
