/// Project memberships and the singleton-fixed-role invariant
///
/// A membership assigns one user to one role within one project; each user
/// holds at most one membership per project. On top of that, the two
/// singleton fixed roles ("Product Owner", "Technical Leader") may each have
/// at most one holder per project, enforced on both assignment and role
/// reassignment.
///
/// Both checks run inside a transaction that first locks the project row, so
/// two concurrent assignments against the same project serialize instead of
/// racing past the check. The (proyecto, usuario) pair is additionally a
/// store-level unique constraint.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE miembros_proyecto (
///     id BIGSERIAL PRIMARY KEY,
///     proyecto_id BIGINT NOT NULL REFERENCES proyectos(id) ON DELETE CASCADE,
///     usuario_id BIGINT NOT NULL REFERENCES usuarios(id) ON DELETE CASCADE,
///     rol_id BIGINT NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
///     asignado_por BIGINT REFERENCES usuarios(id),
///     fecha_asignacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (proyecto_id, usuario_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgConnection, PgPool};

use super::rol::Rol;

/// Error type for membership operations
#[derive(Debug, thiserror::Error)]
pub enum MiembroError {
    /// Membership does not exist
    #[error("Member not found")]
    NotFound,

    /// Referenced project does not exist
    #[error("Project not found")]
    ProyectoNotFound,

    /// Referenced role does not exist
    #[error("Role not found")]
    RolNotFound,

    /// The user already holds a membership in this project
    #[error("User is already a member of this project")]
    AlreadyMember,

    /// The project already has a holder of this singleton fixed role
    #[error("Project already has a {0}")]
    SingletonRoleTaken(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// User display data joined onto a membership
#[derive(Debug, Clone, Serialize)]
pub struct UsuarioResumen {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    pub correo: String,
}

/// Role display data joined onto a membership
#[derive(Debug, Clone, Serialize)]
pub struct RolResumen {
    pub id: i64,
    pub nombre: String,
}

/// A membership with joined user and role display data
///
/// The joined fields reflect the referenced rows at read time, not a copy
/// captured when the membership was created.
#[derive(Debug, Clone, Serialize)]
pub struct Miembro {
    /// Membership id
    pub id: i64,

    /// Project
    pub proyecto_id: i64,

    /// Assigned user
    pub usuario_id: i64,

    /// Assigned role
    pub rol_id: i64,

    /// Who performed the assignment
    pub asignado_por: Option<i64>,

    /// When the assignment was made
    pub fecha_asignacion: DateTime<Utc>,

    /// Joined user display data
    pub usuario: UsuarioResumen,

    /// Joined role display data
    pub rol: RolResumen,
}

/// Flat row shape produced by the membership join query
#[derive(Debug, sqlx::FromRow)]
struct MiembroRow {
    id: i64,
    proyecto_id: i64,
    usuario_id: i64,
    rol_id: i64,
    asignado_por: Option<i64>,
    fecha_asignacion: DateTime<Utc>,
    usuario_nombre: String,
    usuario_apellido: String,
    usuario_correo: String,
    rol_nombre: String,
}

impl From<MiembroRow> for Miembro {
    fn from(row: MiembroRow) -> Self {
        Miembro {
            id: row.id,
            proyecto_id: row.proyecto_id,
            usuario_id: row.usuario_id,
            rol_id: row.rol_id,
            asignado_por: row.asignado_por,
            fecha_asignacion: row.fecha_asignacion,
            usuario: UsuarioResumen {
                id: row.usuario_id,
                nombre: row.usuario_nombre,
                apellido: row.usuario_apellido,
                correo: row.usuario_correo,
            },
            rol: RolResumen {
                id: row.rol_id,
                nombre: row.rol_nombre,
            },
        }
    }
}

const MIEMBRO_JOIN: &str = r#"
    SELECT mp.id, mp.proyecto_id, mp.usuario_id, mp.rol_id, mp.asignado_por,
           mp.fecha_asignacion,
           u.nombre AS usuario_nombre, u.apellido AS usuario_apellido,
           u.correo AS usuario_correo,
           r.nombre AS rol_nombre
    FROM miembros_proyecto mp
    JOIN usuarios u ON mp.usuario_id = u.id
    JOIN roles r ON mp.rol_id = r.id
"#;

impl Miembro {
    /// Lists all memberships of a project with joined user and role data
    pub async fn list_by_proyecto(
        pool: &PgPool,
        proyecto_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, MiembroRow>(&format!(
            "{} WHERE mp.proyecto_id = $1",
            MIEMBRO_JOIN
        ))
        .bind(proyecto_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Miembro::from).collect())
    }

    /// Finds a membership by id with joined user and role data
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, MiembroRow>(&format!("{} WHERE mp.id = $1", MIEMBRO_JOIN))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(Miembro::from))
    }

    /// Assigns a user to a project
    ///
    /// Runs the duplicate-member and singleton-role checks and the insert in
    /// one transaction, serialized per project by a row lock.
    ///
    /// # Errors
    ///
    /// - `MiembroError::ProyectoNotFound` / `RolNotFound` for absent references
    /// - `MiembroError::AlreadyMember` if the user already belongs to the project
    /// - `MiembroError::SingletonRoleTaken` if the role is a singleton fixed
    ///   role that already has a holder in the project
    pub async fn create(
        pool: &PgPool,
        proyecto_id: i64,
        usuario_id: i64,
        rol_id: i64,
        asignado_por: i64,
    ) -> Result<Self, MiembroError> {
        let mut tx = pool.begin().await?;

        lock_proyecto(&mut tx, proyecto_id).await?;

        let already_member: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM miembros_proyecto
                WHERE proyecto_id = $1 AND usuario_id = $2
            )
            "#,
        )
        .bind(proyecto_id)
        .bind(usuario_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_member {
            return Err(MiembroError::AlreadyMember);
        }

        check_singleton(&mut tx, proyecto_id, rol_id, None).await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO miembros_proyecto (proyecto_id, usuario_id, rol_id, asignado_por)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(proyecto_id)
        .bind(usuario_id)
        .bind(rol_id)
        .bind(asignado_por)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(MiembroError::NotFound)
    }

    /// Inserts a membership as part of an enclosing transaction
    ///
    /// Used by project creation to provision the creator's Product Owner
    /// membership inside the same atomic boundary as the project insert.
    pub async fn insert_in_tx(
        conn: &mut PgConnection,
        proyecto_id: i64,
        usuario_id: i64,
        rol_id: i64,
        asignado_por: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO miembros_proyecto (proyecto_id, usuario_id, rol_id, asignado_por)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(proyecto_id)
        .bind(usuario_id)
        .bind(rol_id)
        .bind(asignado_por)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Changes the role of an existing membership
    ///
    /// The singleton check excludes the membership being updated, so a member
    /// keeping their current singleton role is not a conflict.
    ///
    /// # Errors
    ///
    /// - `MiembroError::NotFound` if the membership does not exist
    /// - `MiembroError::RolNotFound` if the new role does not exist
    /// - `MiembroError::SingletonRoleTaken` if another member of the project
    ///   already holds the singleton role
    pub async fn update_rol(pool: &PgPool, id: i64, rol_id: i64) -> Result<Self, MiembroError> {
        let mut tx = pool.begin().await?;

        let proyecto_id: Option<i64> =
            sqlx::query_scalar("SELECT proyecto_id FROM miembros_proyecto WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let proyecto_id = proyecto_id.ok_or(MiembroError::NotFound)?;

        lock_proyecto(&mut tx, proyecto_id).await?;

        check_singleton(&mut tx, proyecto_id, rol_id, Some(id)).await?;

        sqlx::query("UPDATE miembros_proyecto SET rol_id = $1 WHERE id = $2")
            .bind(rol_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(MiembroError::NotFound)
    }

    /// Removes a member from a project
    ///
    /// Deletes unconditionally; removing a project's only Product Owner is
    /// allowed and leaves the project without that role holder.
    ///
    /// # Errors
    ///
    /// Returns `MiembroError::NotFound` if the membership does not exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<(), MiembroError> {
        let result = sqlx::query("DELETE FROM miembros_proyecto WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(MiembroError::NotFound);
        }

        Ok(())
    }

    /// Counts holders of a (project, role) pair
    pub async fn count_by_rol(
        pool: &PgPool,
        proyecto_id: i64,
        rol_id: i64,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM miembros_proyecto WHERE proyecto_id = $1 AND rol_id = $2",
        )
        .bind(proyecto_id)
        .bind(rol_id)
        .fetch_one(pool)
        .await
    }
}

/// Locks the project row for the duration of the transaction
///
/// Serializes concurrent membership writes against the same project.
async fn lock_proyecto(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    proyecto_id: i64,
) -> Result<(), MiembroError> {
    let locked: Option<i64> = sqlx::query_scalar("SELECT id FROM proyectos WHERE id = $1 FOR UPDATE")
        .bind(proyecto_id)
        .fetch_optional(&mut **tx)
        .await?;

    if locked.is_none() {
        return Err(MiembroError::ProyectoNotFound);
    }

    Ok(())
}

/// Rejects the assignment if `rol_id` is a singleton fixed role that already
/// has a holder in the project
///
/// `exclude_id` skips one membership (the one being reassigned). The check is
/// keyed on (proyecto, rol-id); only fixed roles named "Product Owner" or
/// "Technical Leader" are singleton at all.
async fn check_singleton(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    proyecto_id: i64,
    rol_id: i64,
    exclude_id: Option<i64>,
) -> Result<(), MiembroError> {
    let rol = sqlx::query_as::<_, Rol>(
        "SELECT id, proyecto_id, nombre, descripcion, es_fijo, fecha_creacion FROM roles WHERE id = $1",
    )
    .bind(rol_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(MiembroError::RolNotFound)?;

    if !rol.is_singleton() {
        return Ok(());
    }

    let taken: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM miembros_proyecto
            WHERE proyecto_id = $1 AND rol_id = $2 AND id != COALESCE($3, -1)
        )
        "#,
    )
    .bind(proyecto_id)
    .bind(rol_id)
    .bind(exclude_id)
    .fetch_one(&mut **tx)
    .await?;

    if taken {
        return Err(MiembroError::SingletonRoleTaken(rol.nombre));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miembro_row_conversion() {
        let row = MiembroRow {
            id: 10,
            proyecto_id: 1,
            usuario_id: 2,
            rol_id: 3,
            asignado_por: Some(2),
            fecha_asignacion: Utc::now(),
            usuario_nombre: "Ana".to_string(),
            usuario_apellido: "Gomez".to_string(),
            usuario_correo: "ana@example.com".to_string(),
            rol_nombre: "Product Owner".to_string(),
        };

        let miembro = Miembro::from(row);
        assert_eq!(miembro.usuario.id, miembro.usuario_id);
        assert_eq!(miembro.usuario.correo, "ana@example.com");
        assert_eq!(miembro.rol.id, miembro.rol_id);
        assert_eq!(miembro.rol.nombre, "Product Owner");
    }

    #[test]
    fn test_error_messages() {
        let err = MiembroError::SingletonRoleTaken("Product Owner".to_string());
        assert_eq!(err.to_string(), "Project already has a Product Owner");

        let err = MiembroError::AlreadyMember;
        assert!(err.to_string().contains("already a member"));
    }

    // Transactional behavior is covered by the integration tests in
    // gestproy-api/tests/.
}
