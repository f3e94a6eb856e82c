/// Database models for GestProy
///
/// Each model owns the SQL for its table. The three core modules carry the
/// business invariants:
///
/// - `rol`: role catalog, guardian of fixed-role immutability
/// - `miembro`: project memberships, singleton-fixed-role enforcement
/// - `proyecto`: project lifecycle, owner provisioning on creation
///
/// The rest are plain CRUD:
///
/// - `usuario`: accounts (soft-deactivated, never hard-deleted)
/// - `proceso` / `subproceso`: hierarchical work items
/// - `tecnica`: reusable technique catalog (soft-deactivated)
/// - `subproceso_tecnica`: technique-to-subprocess assignments
/// - `stakeholder`: project-scoped contact records

pub mod miembro;
pub mod proceso;
pub mod proyecto;
pub mod rol;
pub mod stakeholder;
pub mod subproceso;
pub mod subproceso_tecnica;
pub mod tecnica;
pub mod usuario;

use serde::{Deserialize, Deserializer};

/// Deserializes a field that distinguishes "absent" from "explicitly null".
///
/// Used on `Option<Option<T>>` update fields together with
/// `#[serde(default)]`: an absent key stays `None` (leave the column
/// untouched), `null` becomes `Some(None)` (clear the column), and a value
/// becomes `Some(Some(v))`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
