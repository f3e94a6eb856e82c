/// User accounts
///
/// Accounts are soft-deactivated (`activo = false`), never hard-deleted, so
/// historical references from projects and memberships stay valid. Passwords
/// are stored as Argon2id hashes and never serialized into responses.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE usuarios (
///     id BIGSERIAL PRIMARY KEY,
///     nombre VARCHAR(100) NOT NULL,
///     apellido VARCHAR(100) NOT NULL,
///     correo VARCHAR(255) NOT NULL UNIQUE,
///     contrasena VARCHAR(255) NOT NULL,
///     activo BOOLEAN NOT NULL DEFAULT TRUE,
///     fecha_creacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     fecha_actualizacion TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// A user account
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Usuario {
    /// User id
    pub id: i64,

    /// First name
    pub nombre: String,

    /// Last name
    pub apellido: String,

    /// Email address; unique across all accounts
    pub correo: String,

    /// Argon2id password hash; never exposed over the API
    #[serde(skip_serializing)]
    pub contrasena: String,

    /// Whether the account is active; deactivated accounts cannot log in
    pub activo: bool,

    /// When the account was created
    pub fecha_creacion: DateTime<Utc>,

    /// When the account was last updated
    pub fecha_actualizacion: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUsuario {
    pub nombre: String,
    pub apellido: String,
    pub correo: String,
    /// Argon2id hash, not the plaintext password
    pub contrasena: String,
}

/// Input for updating a user
///
/// Only supplied fields are patched. `contrasena` must already be hashed by
/// the caller.
#[derive(Debug, Clone, Default)]
pub struct UpdateUsuario {
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub correo: Option<String>,
    pub contrasena: Option<String>,
}

const USUARIO_COLUMNS: &str =
    "id, nombre, apellido, correo, contrasena, activo, fecha_creacion, fecha_actualizacion";

impl Usuario {
    /// Creates a new user account
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already registered (unique constraint)
    /// or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUsuario) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Usuario>(&format!(
            r#"
            INSERT INTO usuarios (nombre, apellido, correo, contrasena)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            USUARIO_COLUMNS
        ))
        .bind(data.nombre)
        .bind(data.apellido)
        .bind(data.correo)
        .bind(data.contrasena)
        .fetch_one(pool)
        .await
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {} FROM usuarios WHERE id = $1",
            USUARIO_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by email address
    pub async fn find_by_correo(pool: &PgPool, correo: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {} FROM usuarios WHERE correo = $1",
            USUARIO_COLUMNS
        ))
        .bind(correo)
        .fetch_optional(pool)
        .await
    }

    /// Lists all active users
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {} FROM usuarios WHERE activo = TRUE ORDER BY id",
            USUARIO_COLUMNS
        ))
        .fetch_all(pool)
        .await
    }

    /// Checks whether an email is used by a different account
    ///
    /// `exclude_id` skips the account being updated.
    pub async fn correo_taken(
        pool: &PgPool,
        correo: &str,
        exclude_id: i64,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM usuarios WHERE correo = $1 AND id != $2)")
            .bind(correo)
            .bind(exclude_id)
            .fetch_one(pool)
            .await
    }

    /// Patches a user account
    ///
    /// Returns the updated user, or `None` if it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: UpdateUsuario,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sets = vec!["fecha_actualizacion = NOW()".to_string()];
        let mut bind_count = 1;

        if data.nombre.is_some() {
            bind_count += 1;
            sets.push(format!("nombre = ${}", bind_count));
        }
        if data.apellido.is_some() {
            bind_count += 1;
            sets.push(format!("apellido = ${}", bind_count));
        }
        if data.correo.is_some() {
            bind_count += 1;
            sets.push(format!("correo = ${}", bind_count));
        }
        if data.contrasena.is_some() {
            bind_count += 1;
            sets.push(format!("contrasena = ${}", bind_count));
        }

        let query = format!(
            "UPDATE usuarios SET {} WHERE id = $1 RETURNING {}",
            sets.join(", "),
            USUARIO_COLUMNS
        );

        let mut q = sqlx::query_as::<_, Usuario>(&query).bind(id);

        if let Some(nombre) = data.nombre {
            q = q.bind(nombre);
        }
        if let Some(apellido) = data.apellido {
            q = q.bind(apellido);
        }
        if let Some(correo) = data.correo {
            q = q.bind(correo);
        }
        if let Some(contrasena) = data.contrasena {
            q = q.bind(contrasena);
        }

        q.fetch_optional(pool).await
    }

    /// Soft-deactivates a user account
    ///
    /// Returns true if the account existed.
    pub async fn deactivate(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE usuarios SET activo = FALSE, fecha_actualizacion = NOW() WHERE id = $1",
        )
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
    fn test_password_hash_not_serialized() {
        let usuario = Usuario {
            id: 1,
            nombre: "Ana".to_string(),
            apellido: "Gomez".to_string(),
            correo: "ana@example.com".to_string(),
            contrasena: "$argon2id$secret".to_string(),
            activo: true,
            fecha_creacion: Utc::now(),
            fecha_actualizacion: Utc::now(),
        };

        let json = serde_json::to_string(&usuario).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("contrasena"));
        assert!(json.contains("ana@example.com"));
    }
}
