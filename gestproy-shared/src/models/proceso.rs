/// Processes: top-level work items under a project
///
/// Plain CRUD; the only referential rule is that `proyecto_id` and the
/// optional `responsable_id` must exist, which the store's foreign keys
/// enforce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::double_option;

/// Responsible-user display data joined onto a work item
#[derive(Debug, Clone, Serialize)]
pub struct ResponsableResumen {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
}

/// A process with joined responsible-user display data
#[derive(Debug, Clone, Serialize)]
pub struct Proceso {
    pub id: i64,
    pub proyecto_id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub objetivo: Option<String>,
    pub responsable_id: Option<i64>,
    pub estado: String,
    pub fecha_creacion: DateTime<Utc>,
    pub fecha_actualizacion: DateTime<Utc>,
    pub responsable: Option<ResponsableResumen>,
}

#[derive(Debug, sqlx::FromRow)]
struct ProcesoRow {
    id: i64,
    proyecto_id: i64,
    nombre: String,
    descripcion: Option<String>,
    objetivo: Option<String>,
    responsable_id: Option<i64>,
    estado: String,
    fecha_creacion: DateTime<Utc>,
    fecha_actualizacion: DateTime<Utc>,
    responsable_nombre: Option<String>,
    responsable_apellido: Option<String>,
}

impl From<ProcesoRow> for Proceso {
    fn from(row: ProcesoRow) -> Self {
        let responsable = match (row.responsable_id, row.responsable_nombre, row.responsable_apellido)
        {
            (Some(id), Some(nombre), Some(apellido)) => Some(ResponsableResumen {
                id,
                nombre,
                apellido,
            }),
            _ => None,
        };

        Proceso {
            id: row.id,
            proyecto_id: row.proyecto_id,
            nombre: row.nombre,
            descripcion: row.descripcion,
            objetivo: row.objetivo,
            responsable_id: row.responsable_id,
            estado: row.estado,
            fecha_creacion: row.fecha_creacion,
            fecha_actualizacion: row.fecha_actualizacion,
            responsable,
        }
    }
}

/// Input for creating a process
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProceso {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub objetivo: Option<String>,
    pub responsable_id: Option<i64>,
    /// Defaults to "definido"
    pub estado: Option<String>,
}

/// Input for updating a process; only supplied fields are patched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProceso {
    pub nombre: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub descripcion: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub objetivo: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub responsable_id: Option<Option<i64>>,

    pub estado: Option<String>,
}

const PROCESO_JOIN: &str = r#"
    SELECT p.id, p.proyecto_id, p.nombre, p.descripcion, p.objetivo,
           p.responsable_id, p.estado, p.fecha_creacion, p.fecha_actualizacion,
           u.nombre AS responsable_nombre, u.apellido AS responsable_apellido
    FROM procesos p
    LEFT JOIN usuarios u ON p.responsable_id = u.id
"#;

impl Proceso {
    pub async fn list_by_proyecto(
        pool: &PgPool,
        proyecto_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, ProcesoRow>(&format!(
            "{} WHERE p.proyecto_id = $1 ORDER BY p.id",
            PROCESO_JOIN
        ))
        .bind(proyecto_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Proceso::from).collect())
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, ProcesoRow>(&format!("{} WHERE p.id = $1", PROCESO_JOIN))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Proceso::from))
    }

    pub async fn create(
        pool: &PgPool,
        proyecto_id: i64,
        data: CreateProceso,
    ) -> Result<Self, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO procesos (proyecto_id, nombre, descripcion, objetivo, responsable_id, estado)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'definido'))
            RETURNING id
            "#,
        )
        .bind(proyecto_id)
        .bind(data.nombre)
        .bind(data.descripcion)
        .bind(data.objetivo)
        .bind(data.responsable_id)
        .bind(data.estado)
        .fetch_one(pool)
        .await?;

        let proceso = Self::find_by_id(pool, id).await?;
        proceso.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateProceso,
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
        if data.objetivo.is_some() {
            bind_count += 1;
            sets.push(format!("objetivo = ${}", bind_count));
        }
        if data.responsable_id.is_some() {
            bind_count += 1;
            sets.push(format!("responsable_id = ${}", bind_count));
        }
        if data.estado.is_some() {
            bind_count += 1;
            sets.push(format!("estado = ${}", bind_count));
        }

        let query = format!(
            "UPDATE procesos SET {} WHERE id = $1 RETURNING id",
            sets.join(", ")
        );

        let mut q = sqlx::query_scalar::<_, i64>(&query).bind(id);

        if let Some(nombre) = data.nombre {
            q = q.bind(nombre);
        }
        if let Some(descripcion) = data.descripcion {
            q = q.bind(descripcion);
        }
        if let Some(objetivo) = data.objetivo {
            q = q.bind(objetivo);
        }
        if let Some(responsable_id) = data.responsable_id {
            q = q.bind(responsable_id);
        }
        if let Some(estado) = data.estado {
            q = q.bind(estado);
        }

        match q.fetch_optional(pool).await? {
            Some(id) => Self::find_by_id(pool, id).await,
            None => Ok(None),
        }
    }

    /// Returns true if the process existed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM procesos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responsable_absent_when_unassigned() {
        let row = ProcesoRow {
            id: 1,
            proyecto_id: 1,
            nombre: "Descubrimiento".to_string(),
            descripcion: None,
            objetivo: None,
            responsable_id: None,
            estado: "definido".to_string(),
            fecha_creacion: Utc::now(),
            fecha_actualizacion: Utc::now(),
            responsable_nombre: None,
            responsable_apellido: None,
        };

        let proceso = Proceso::from(row);
        assert!(proceso.responsable.is_none());
    }
}
