/// Authentication context for axum handlers
///
/// The API layer validates the Bearer token in a middleware layer and inserts
/// an [`AuthContext`] into the request extensions; handlers extract it with
/// axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use gestproy_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("caller: {}", auth.user_id)
/// }
/// ```

use serde::{Deserialize, Serialize};

/// Identity resolved from the presented bearer token
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id (JWT subject)
    pub user_id: i64,
}

impl AuthContext {
    /// Creates an auth context from validated JWT claims
    pub fn from_jwt(user_id: i64) -> Self {
        Self { user_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_jwt() {
        let auth = AuthContext::from_jwt(99);
        assert_eq!(auth.user_id, 99);
    }
}
