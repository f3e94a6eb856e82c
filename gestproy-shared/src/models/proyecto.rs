/// Project lifecycle: creation with owner provisioning, visibility, deletion
///
/// Creating a project also provisions the creator as its "Product Owner":
/// both writes share one transaction, so a failed owner assignment rolls the
/// project back instead of leaving it half-created. The one deliberate
/// exception is a missing "Product Owner" entry in the fixed-role catalog:
/// in that case the project is still created, just without the membership.
///
/// Deletion is restricted to the project's creator. Visibility is the union
/// of "projects I created" and "projects I am a member of".
///
/// # Schema
///
/// ```sql
/// CREATE TABLE proyectos (
///     id BIGSERIAL PRIMARY KEY,
///     nombre VARCHAR(200) NOT NULL,
///     descripcion TEXT,
///     estado VARCHAR(50) NOT NULL DEFAULT 'iniciado',
///     prioridad VARCHAR(50) NOT NULL,
///     fecha_inicio DATE,
///     fecha_fin DATE,
///     creado_por BIGINT NOT NULL REFERENCES usuarios(id),
///     fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     fecha_actualizacion TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::warn;

use super::double_option;
use super::miembro::Miembro;
use super::rol::{Rol, PRODUCT_OWNER};

/// Default state for newly created projects
pub const ESTADO_INICIADO: &str = "iniciado";

/// Error type for project operations
#[derive(Debug, thiserror::Error)]
pub enum ProyectoError {
    /// Project does not exist
    #[error("Project not found")]
    NotFound,

    /// Caller is not the project's creator
    #[error("Only the project creator may delete it")]
    NotCreator,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A project record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Proyecto {
    /// Project id
    pub id: i64,

    /// Project name
    pub nombre: String,

    /// Optional description
    pub descripcion: Option<String>,

    /// Free-form state string; "iniciado" on creation unless specified
    pub estado: String,

    /// Priority label (e.g., "alta", "media", "baja")
    pub prioridad: String,

    /// Optional planned start date
    pub fecha_inicio: Option<NaiveDate>,

    /// Optional planned end date
    pub fecha_fin: Option<NaiveDate>,

    /// Creating user; also the only user allowed to delete the project
    pub creado_por: i64,

    /// When the project was created
    pub fecha_creacion: DateTime<Utc>,

    /// When the project was last updated
    pub fecha_actualizacion: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProyecto {
    /// Project name
    pub nombre: String,

    /// Optional description
    pub descripcion: Option<String>,

    /// Initial state; defaults to "iniciado"
    pub estado: Option<String>,

    /// Priority
    pub prioridad: String,

    /// Optional start date
    pub fecha_inicio: Option<NaiveDate>,

    /// Optional end date
    pub fecha_fin: Option<NaiveDate>,
}

/// Input for updating a project
///
/// Only supplied fields are patched; `null` clears the nullable date fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProyecto {
    pub nombre: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub descripcion: Option<Option<String>>,

    pub estado: Option<String>,

    pub prioridad: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub fecha_inicio: Option<Option<NaiveDate>>,

    #[serde(default, deserialize_with = "double_option")]
    pub fecha_fin: Option<Option<NaiveDate>>,
}

const PROYECTO_COLUMNS: &str = "id, nombre, descripcion, estado, prioridad, fecha_inicio, \
                                fecha_fin, creado_por, fecha_creacion, fecha_actualizacion";

impl Proyecto {
    /// Creates a project and provisions its creator as Product Owner
    ///
    /// Both the project insert and the owner membership run in a single
    /// transaction. When the fixed "Product Owner" role is absent from the
    /// catalog the membership is skipped and the project is created anyway;
    /// any other failure rolls back the whole operation.
    pub async fn create(
        pool: &PgPool,
        data: CreateProyecto,
        creado_por: i64,
    ) -> Result<Self, ProyectoError> {
        let estado = data.estado.unwrap_or_else(|| ESTADO_INICIADO.to_string());

        let mut tx = pool.begin().await?;

        let proyecto = sqlx::query_as::<_, Proyecto>(&format!(
            r#"
            INSERT INTO proyectos (nombre, descripcion, estado, prioridad, fecha_inicio, fecha_fin, creado_por)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PROYECTO_COLUMNS
        ))
        .bind(&data.nombre)
        .bind(&data.descripcion)
        .bind(&estado)
        .bind(&data.prioridad)
        .bind(data.fecha_inicio)
        .bind(data.fecha_fin)
        .bind(creado_por)
        .fetch_one(&mut *tx)
        .await?;

        match Rol::find_fixed_by_name(&mut tx, PRODUCT_OWNER).await? {
            Some(rol_po) => {
                Miembro::insert_in_tx(&mut tx, proyecto.id, creado_por, rol_po.id, creado_por)
                    .await?;
            }
            None => {
                warn!(
                    proyecto_id = proyecto.id,
                    "Fixed role '{}' missing from catalog; project created without owner membership",
                    PRODUCT_OWNER
                );
            }
        }

        tx.commit().await?;

        Ok(proyecto)
    }

    /// Lists the distinct projects a user created or is a member of
    pub async fn list_for_user(pool: &PgPool, usuario_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Proyecto>(
            r#"
            SELECT DISTINCT p.id, p.nombre, p.descripcion, p.estado, p.prioridad,
                   p.fecha_inicio, p.fecha_fin, p.creado_por, p.fecha_creacion,
                   p.fecha_actualizacion
            FROM proyectos p
            LEFT JOIN miembros_proyecto mp ON p.id = mp.proyecto_id
            WHERE p.creado_por = $1 OR mp.usuario_id = $1
            ORDER BY p.id
            "#,
        )
        .bind(usuario_id)
        .fetch_all(pool)
        .await
    }

    /// Finds a project by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Proyecto>(&format!(
            "SELECT {} FROM proyectos WHERE id = $1",
            PROYECTO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Patches a project
    ///
    /// Returns the updated project, or `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateProyecto,
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
        if data.estado.is_some() {
            bind_count += 1;
            sets.push(format!("estado = ${}", bind_count));
        }
        if data.prioridad.is_some() {
            bind_count += 1;
            sets.push(format!("prioridad = ${}", bind_count));
        }
        if data.fecha_inicio.is_some() {
            bind_count += 1;
            sets.push(format!("fecha_inicio = ${}", bind_count));
        }
        if data.fecha_fin.is_some() {
            bind_count += 1;
            sets.push(format!("fecha_fin = ${}", bind_count));
        }

        let query = format!(
            "UPDATE proyectos SET {} WHERE id = $1 RETURNING {}",
            sets.join(", "),
            PROYECTO_COLUMNS
        );

        let mut q = sqlx::query_as::<_, Proyecto>(&query).bind(id);

        if let Some(nombre) = data.nombre {
            q = q.bind(nombre);
        }
        if let Some(descripcion) = data.descripcion {
            q = q.bind(descripcion);
        }
        if let Some(estado) = data.estado {
            q = q.bind(estado);
        }
        if let Some(prioridad) = data.prioridad {
            q = q.bind(prioridad);
        }
        if let Some(fecha_inicio) = data.fecha_inicio {
            q = q.bind(fecha_inicio);
        }
        if let Some(fecha_fin) = data.fecha_fin {
            q = q.bind(fecha_fin);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a project
    ///
    /// Memberships, processes, and the rest of the project's dependents are
    /// removed by the store's cascade.
    ///
    /// # Errors
    ///
    /// - `ProyectoError::NotFound` if the project does not exist
    /// - `ProyectoError::NotCreator` if the caller did not create it; the
    ///   project is left intact
    pub async fn delete(pool: &PgPool, id: i64, caller_id: i64) -> Result<(), ProyectoError> {
        let creado_por: Option<i64> =
            sqlx::query_scalar("SELECT creado_por FROM proyectos WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        let creado_por = creado_por.ok_or(ProyectoError::NotFound)?;

        if creado_por != caller_id {
            return Err(ProyectoError::NotCreator);
        }

        sqlx::query("DELETE FROM proyectos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
