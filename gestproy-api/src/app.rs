/// Application state and router builder
///
/// Defines the shared application state and assembles the axum router with
/// all routes and middleware.
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// ├── /auth/                         # register, login, refresh (public); me (token)
/// ├── /usuarios                      # Account CRUD (token)
/// ├── /proyectos                     # Project lifecycle (token)
/// ├── /roles                         # Role catalog (token)
/// ├── /miembros                      # Project memberships (token)
/// ├── /procesos, /subprocesos        # Work breakdown (token)
/// ├── /tecnicas, /subproceso-tecnicas
/// └── /stakeholders
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use gestproy_shared::auth::{jwt, middleware::AuthContext};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor; `Arc`
/// keeps the clone cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public: health check and token issuance
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh));

    // Everything else sits behind the bearer-token gate
    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .route("/usuarios", get(routes::usuarios::list))
        .route(
            "/usuarios/:id",
            get(routes::usuarios::get_by_id)
                .put(routes::usuarios::update)
                .delete(routes::usuarios::deactivate),
        )
        .route(
            "/proyectos",
            get(routes::proyectos::list).post(routes::proyectos::create),
        )
        .route(
            "/proyectos/:id",
            get(routes::proyectos::get_by_id)
                .put(routes::proyectos::update)
                .delete(routes::proyectos::delete),
        )
        .route("/roles", get(routes::roles::list).post(routes::roles::create))
        .route(
            "/roles/:id",
            get(routes::roles::get_by_id)
                .put(routes::roles::update)
                .delete(routes::roles::delete),
        )
        .route(
            "/miembros/proyecto/:proyecto_id",
            get(routes::miembros::list_by_proyecto),
        )
        .route("/miembros", post(routes::miembros::create))
        .route(
            "/miembros/:id",
            put(routes::miembros::update).delete(routes::miembros::delete),
        )
        .route(
            "/procesos/proyecto/:proyecto_id",
            get(routes::procesos::list_by_proyecto),
        )
        .route("/procesos", post(routes::procesos::create))
        .route(
            "/procesos/:id",
            get(routes::procesos::get_by_id)
                .put(routes::procesos::update)
                .delete(routes::procesos::delete),
        )
        .route(
            "/subprocesos/proceso/:proceso_id",
            get(routes::subprocesos::list_by_proceso),
        )
        .route("/subprocesos", post(routes::subprocesos::create))
        .route(
            "/subprocesos/:id",
            get(routes::subprocesos::get_by_id)
                .put(routes::subprocesos::update)
                .delete(routes::subprocesos::delete),
        )
        .route(
            "/tecnicas",
            get(routes::tecnicas::list).post(routes::tecnicas::create),
        )
        .route("/tecnicas/todas", get(routes::tecnicas::list_all))
        .route(
            "/tecnicas/:id",
            get(routes::tecnicas::get_by_id)
                .put(routes::tecnicas::update)
                .delete(routes::tecnicas::deactivate),
        )
        .route(
            "/stakeholders/proyecto/:proyecto_id",
            get(routes::stakeholders::list_by_proyecto),
        )
        .route("/stakeholders", post(routes::stakeholders::create))
        .route(
            "/stakeholders/:id",
            get(routes::stakeholders::get_by_id)
                .put(routes::stakeholders::update)
                .delete(routes::stakeholders::delete),
        )
        .route(
            "/subproceso-tecnicas/subproceso/:subproceso_id",
            get(routes::subproceso_tecnicas::list_by_subproceso),
        )
        .route(
            "/subproceso-tecnicas",
            post(routes::subproceso_tecnicas::create),
        )
        .route(
            "/subproceso-tecnicas/:id",
            put(routes::subproceso_tecnicas::update)
                .delete(routes::subproceso_tecnicas::delete),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Validates the Bearer token from the Authorization header and injects an
/// [`AuthContext`] into the request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        crate::error::ApiError::Unauthorized("Expected Bearer token".to_string())
    })?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_jwt(claims.sub);

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
