/// Role catalog and fixed-role protection
///
/// Roles come in two kinds. *Fixed* roles (`es_fijo = true`, `proyecto_id`
/// NULL) form a global catalog shared by every project and can never be
/// modified or deleted through this interface. *Custom* roles belong to one
/// project and can be managed freely.
///
/// Two fixed roles are additionally *singleton* roles: "Product Owner" and
/// "Technical Leader" may each be held by at most one member per project.
/// That restriction is keyed on the role's exact name; other fixed roles, if
/// ever added to the catalog, carry no holder limit.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE roles (
///     id BIGSERIAL PRIMARY KEY,
///     proyecto_id BIGINT REFERENCES proyectos(id) ON DELETE CASCADE,
///     nombre VARCHAR(100) NOT NULL,
///     descripcion TEXT,
///     es_fijo BOOLEAN NOT NULL DEFAULT FALSE,
///     fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

/// Name of the fixed role assigned to a project's creator
pub const PRODUCT_OWNER: &str = "Product Owner";

/// Name of the second singleton fixed role
pub const TECHNICAL_LEADER: &str = "Technical Leader";

/// Error type for role operations
#[derive(Debug, thiserror::Error)]
pub enum RolError {
    /// Role does not exist
    #[error("Role not found")]
    NotFound,

    /// Attempted to modify or delete a fixed role
    #[error("Fixed roles cannot be modified or deleted")]
    FixedImmutable,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A role visible to a project
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rol {
    /// Role id
    pub id: i64,

    /// Owning project; NULL for global fixed roles
    pub proyecto_id: Option<i64>,

    /// Role name
    pub nombre: String,

    /// Optional description
    pub descripcion: Option<String>,

    /// Whether this is a protected fixed role
    pub es_fijo: bool,

    /// When the role was created
    pub fecha_creacion: DateTime<Utc>,
}

/// Input for updating a custom role
///
/// Only supplied fields are patched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRol {
    /// New name
    pub nombre: Option<String>,

    /// New description
    pub descripcion: Option<String>,
}

impl Rol {
    /// Whether this role is restricted to a single holder per project
    pub fn is_singleton(&self) -> bool {
        self.es_fijo && (self.nombre == PRODUCT_OWNER || self.nombre == TECHNICAL_LEADER)
    }

    /// Lists roles visible to a project
    ///
    /// Always returns the global fixed roles; when `proyecto_id` is given the
    /// project's custom roles are included as well.
    pub async fn list(pool: &PgPool, proyecto_id: Option<i64>) -> Result<Vec<Self>, sqlx::Error> {
        match proyecto_id {
            Some(proyecto_id) => {
                sqlx::query_as::<_, Rol>(
                    r#"
                    SELECT id, proyecto_id, nombre, descripcion, es_fijo, fecha_creacion
                    FROM roles
                    WHERE es_fijo = TRUE OR proyecto_id = $1
                    ORDER BY id
                    "#,
                )
                .bind(proyecto_id)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Rol>(
                    r#"
                    SELECT id, proyecto_id, nombre, descripcion, es_fijo, fecha_creacion
                    FROM roles
                    WHERE es_fijo = TRUE
                    ORDER BY id
                    "#,
                )
                .fetch_all(pool)
                .await
            }
        }
    }

    /// Finds a role by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Rol>(
            r#"
            SELECT id, proyecto_id, nombre, descripcion, es_fijo, fecha_creacion
            FROM roles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a fixed role by its exact name
    ///
    /// Used by project creation to resolve the "Product Owner" role. Runs on
    /// a transaction connection so it can participate in the creation's
    /// atomic boundary.
    pub async fn find_fixed_by_name(
        conn: &mut PgConnection,
        nombre: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Rol>(
            r#"
            SELECT id, proyecto_id, nombre, descripcion, es_fijo, fecha_creacion
            FROM roles
            WHERE nombre = $1 AND es_fijo = TRUE
            "#,
        )
        .bind(nombre)
        .fetch_optional(conn)
        .await
    }

    /// Creates a custom role for a project
    pub async fn create(
        pool: &PgPool,
        proyecto_id: i64,
        nombre: &str,
        descripcion: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Rol>(
            r#"
            INSERT INTO roles (proyecto_id, nombre, descripcion, es_fijo)
            VALUES ($1, $2, $3, FALSE)
            RETURNING id, proyecto_id, nombre, descripcion, es_fijo, fecha_creacion
            "#,
        )
        .bind(proyecto_id)
        .bind(nombre)
        .bind(descripcion)
        .fetch_one(pool)
        .await
    }

    /// Patches a custom role
    ///
    /// # Errors
    ///
    /// - `RolError::NotFound` if the role does not exist
    /// - `RolError::FixedImmutable` if the role is fixed; the stored row is
    ///   left unchanged
    pub async fn update(pool: &PgPool, id: i64, data: UpdateRol) -> Result<Self, RolError> {
        let rol = Self::find_by_id(pool, id).await?.ok_or(RolError::NotFound)?;

        if rol.es_fijo {
            return Err(RolError::FixedImmutable);
        }

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

        if sets.is_empty() {
            return Ok(rol);
        }

        let query = format!(
            "UPDATE roles SET {} WHERE id = $1 \
             RETURNING id, proyecto_id, nombre, descripcion, es_fijo, fecha_creacion",
            sets.join(", "),
        );

        let mut q = sqlx::query_as::<_, Rol>(&query).bind(id);

        if let Some(nombre) = data.nombre {
            q = q.bind(nombre);
        }
        if let Some(descripcion) = data.descripcion {
            q = q.bind(descripcion);
        }

        let rol = q.fetch_one(pool).await?;

        Ok(rol)
    }

    /// Deletes a custom role
    ///
    /// Existing memberships that referenced the role are removed by the
    /// store's cascade.
    ///
    /// # Errors
    ///
    /// - `RolError::NotFound` if the role does not exist
    /// - `RolError::FixedImmutable` if the role is fixed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), RolError> {
        let rol = Self::find_by_id(pool, id).await?.ok_or(RolError::NotFound)?;

        if rol.es_fijo {
            return Err(RolError::FixedImmutable);
        }

        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rol(nombre: &str, es_fijo: bool) -> Rol {
        Rol {
            id: 1,
            proyecto_id: if es_fijo { None } else { Some(1) },
            nombre: nombre.to_string(),
            descripcion: None,
            es_fijo,
            fecha_creacion: Utc::now(),
        }
    }

    #[test]
    fn test_singleton_roles() {
        assert!(rol(PRODUCT_OWNER, true).is_singleton());
        assert!(rol(TECHNICAL_LEADER, true).is_singleton());
    }

    #[test]
    fn test_custom_role_named_like_singleton_is_not_singleton() {
        // Only fixed roles are singleton; a custom role may reuse the name.
        assert!(!rol(PRODUCT_OWNER, false).is_singleton());
    }

    #[test]
    fn test_other_fixed_roles_are_unrestricted() {
        assert!(!rol("Scrum Master", true).is_singleton());
    }

    // SQL operations are covered by the integration tests in gestproy-api/tests/.
}
