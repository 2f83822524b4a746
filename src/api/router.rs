//! API Router with Swagger UI

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers::auth::AuthHandlerState;
use crate::api::handlers::users::UserHandlerState;
use crate::api::handlers::{auth, health, users};
use crate::api::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{auth_middleware, require_privileged, AuthState};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::register,
        auth::get_current_user,
        auth::change_password,
        // Users
        users::list_users,
        users::get_user,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Login, registration and session"),
        (name = "Users", description = "Account management (privileged roles only)")
    )
)]
struct ApiDoc;

/// Assemble the full application router.
///
/// Route groups:
/// - public: health, login, registration, Swagger UI, Prometheus scrape
/// - authenticated: current-account and password endpoints (behind the gate)
/// - privileged: account listing/detail (gate + role guard)
pub fn create_api_router(
    db: DatabaseConnection,
    jwt_config: JwtConfig,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState {
        jwt_config: jwt_config.clone(),
        db: db.clone(),
    };
    let auth_handler_state = AuthHandlerState {
        db: db.clone(),
        jwt_config,
    };
    let user_state = UserHandlerState { db };
    let metrics_state = MetricsState {
        handle: prometheus_handle,
    };

    let public = Router::new()
        .route("/api/v1/health", get(health::health_check))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/register", post(auth::register))
        .with_state(auth_handler_state.clone());

    let session = Router::new()
        .route("/api/v1/auth/me", get(auth::get_current_user))
        .route("/api/v1/auth/change-password", post(auth::change_password))
        .with_state(auth_handler_state)
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    // Guard layers run outermost-first: the gate resolves the account,
    // then the role guard checks it.
    let user_management = Router::new()
        .route("/api/v1/users", get(users::list_users))
        .route("/api/v1/users/{id}", get(users::get_user))
        .with_state(user_state)
        .layer(middleware::from_fn(require_privileged))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let observability = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(metrics_state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public)
        .merge(session)
        .merge(user_management)
        .merge(observability)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
