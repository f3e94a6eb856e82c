/// API route handlers
///
/// One module per resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, token refresh, current caller
/// - `usuarios`: Account management
/// - `proyectos`: Project lifecycle
/// - `roles`: Role catalog
/// - `miembros`: Project memberships
/// - `procesos` / `subprocesos`: Work breakdown
/// - `tecnicas` / `subproceso_tecnicas`: Technique catalog and assignments
/// - `stakeholders`: Stakeholder records

pub mod auth;
pub mod health;
pub mod miembros;
pub mod procesos;
pub mod proyectos;
pub mod roles;
pub mod stakeholders;
pub mod subproceso_tecnicas;
pub mod subprocesos;
pub mod tecnicas;
pub mod usuarios;

use serde::Serialize;

/// Response body for delete-style endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation message
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
