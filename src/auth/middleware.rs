//! Authentication middleware for Axum
//!
//! Every protected request passes through [`auth_middleware`]: the bearer
//! credential is parsed, verified and resolved to an account row before
//! the inner handler runs. Each rejection is terminal for the request and
//! carries one of the five [`AuthError`] kinds as a 401 `{ "msg": ... }`
//! body.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::json;

use super::jwt::{verify_token, AuthError, JwtConfig};
use crate::infrastructure::database::entities::user::{self, UserRole};

/// Authentication state containing JWT config and the account store
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub db: DatabaseConnection,
}

/// The resolved account attached to request extensions on success.
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub profile_image: Option<String>,
}

impl AuthenticatedUser {
    fn from_model(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            middle_name: model.middle_name,
            last_name: model.last_name,
            role: model.role,
            profile_image: model.profile_image,
        }
    }

    /// Operator roles: superuser, management admin, TPO admin.
    pub fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}

/// Bearer authentication middleware - requires a valid token naming an
/// existing account.
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    match authenticate(&auth_state, request.headers()).await {
        Ok(account) => {
            request.extensions_mut().insert(account);
            next.run(request).await
        }
        Err(kind) => rejection(kind),
    }
}

/// Walk the request through header parsing, token verification and
/// account resolution. One account-store read per request; no writes.
async fn authenticate(
    state: &AuthState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(auth_header) = auth_header else {
        return Err(AuthError::InvalidAuthFormat);
    };
    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return Err(AuthError::InvalidAuthFormat);
    };
    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let claims = verify_token(token, &state.jwt_config)?;

    let account = user::Entity::find_by_id(&claims.sub)
        .one(&state.db)
        .await
        .map_err(|_| AuthError::AuthenticationFailed)?;

    let Some(account) = account else {
        return Err(AuthError::UserNotFound);
    };

    Ok(AuthenticatedUser::from_model(account))
}

/// Role guard - must be layered after [`auth_middleware`]. Admits only
/// the three operator roles.
pub async fn require_privileged(request: Request<Body>, next: Next) -> Response {
    match request.extensions().get::<AuthenticatedUser>() {
        Some(account) if account.is_privileged() => next.run(request).await,
        Some(_) => (
            StatusCode::FORBIDDEN,
            Json(json!({ "msg": "Access denied." })),
        )
            .into_response(),
        None => rejection(AuthError::InvalidAuthFormat),
    }
}

/// Terminal 401 response for a gate rejection.
fn rejection(kind: AuthError) -> Response {
    metrics::counter!("auth_rejections_total", "kind" => kind.as_str()).increment(1);

    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "msg": kind.message() })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::{middleware, Extension, Router};
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use sea_orm::{ActiveModelTrait, Database, Set};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::jwt::{create_token, Claims};
    use crate::auth::password::hash_password;
    use crate::infrastructure::database::migrator::Migrator;
    use sea_orm_migration::MigratorTrait;

    fn test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "gate-test-secret".to_string(),
            expiration_hours: 24,
            issuer: "careerconnect".to_string(),
        }
    }

    async fn test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn insert_account(db: &DatabaseConnection, id: &str, email: &str) {
        let now = Utc::now();
        user::ActiveModel {
            id: Set(id.to_string()),
            first_name: Set("Asha".to_string()),
            middle_name: Set(" ".to_string()),
            last_name: Set("Verma".to_string()),
            email: Set(email.to_string()),
            password_hash: Set(hash_password("password123").unwrap()),
            role: Set(UserRole::Student),
            profile_image: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        }
        .insert(db)
        .await
        .unwrap();
    }

    async fn whoami(account: Extension<AuthenticatedUser>) -> String {
        account.email.clone()
    }

    fn protected_app(db: DatabaseConnection) -> Router {
        let auth_state = AuthState {
            jwt_config: test_jwt_config(),
            db,
        };
        Router::new()
            .route("/protected", get(whoami))
            .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
    }

    async fn body_msg(response: axum::http::Response<Body>) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        value["msg"].as_str().unwrap().to_string()
    }

    fn request(auth_header: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri("/protected");
        if let Some(value) = auth_header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let app = protected_app(test_db().await);

        let response = app.oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_msg(response).await,
            "Invalid authorization format. Please login again."
        );
    }

    #[tokio::test]
    async fn wrong_scheme_is_rejected() {
        let app = protected_app(test_db().await);

        let response = app.oneshot(request(Some("Token abc123"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_msg(response).await,
            "Invalid authorization format. Please login again."
        );
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let app = protected_app(test_db().await);

        let response = app.oneshot(request(Some("Bearer "))).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_msg(response).await, "Login Required!");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let db = test_db().await;
        insert_account(&db, "acc-1", "asha@campus.edu").await;
        let app = protected_app(db);

        let config = test_jwt_config();
        let now = Utc::now();
        let claims = Claims {
            sub: "acc-1".to_string(),
            email: "asha@campus.edu".to_string(),
            role: UserRole::Student,
            exp: (now - Duration::hours(1)).timestamp(),
            iat: (now - Duration::hours(2)).timestamp(),
            iss: config.issuer.clone(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let response = app
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_msg(response).await,
            "Session Expired! Please Login Again."
        );
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let app = protected_app(test_db().await);

        let response = app
            .oneshot(request(Some("Bearer not.a.token")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_msg(response).await,
            "Authentication failed. Please login again."
        );
    }

    #[tokio::test]
    async fn token_for_deleted_account_is_rejected() {
        let db = test_db().await;
        let app = protected_app(db);

        // validly signed, unexpired, but no such account in the store
        let token = create_token(
            "ghost-account",
            "ghost@campus.edu",
            UserRole::Student,
            &test_jwt_config(),
        )
        .unwrap();

        let response = app
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_msg(response).await,
            "User not found. Please login again."
        );
    }

    #[tokio::test]
    async fn valid_token_is_admitted() {
        let db = test_db().await;
        insert_account(&db, "acc-1", "asha@campus.edu").await;
        let app = protected_app(db);

        let token = create_token(
            "acc-1",
            "asha@campus.edu",
            UserRole::Student,
            &test_jwt_config(),
        )
        .unwrap();

        let response = app
            .oneshot(request(Some(&format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"asha@campus.edu");
    }

    #[tokio::test]
    async fn privileged_guard_rejects_students() {
        let db = test_db().await;
        insert_account(&db, "acc-1", "asha@campus.edu").await;

        let auth_state = AuthState {
            jwt_config: test_jwt_config(),
            db,
        };
        let app = Router::new()
            .route("/admin-only", get(|| async { "ok" }))
            .layer(middleware::from_fn(require_privileged))
            .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

        let token = create_token(
            "acc-1",
            "asha@campus.edu",
            UserRole::Student,
            &test_jwt_config(),
        )
        .unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin-only")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
