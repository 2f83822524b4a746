//! JWT Token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::infrastructure::database::entities::user::UserRole;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in hours
    pub expiration_hours: i64,
    /// Issuer claim
    pub issuer: String,
}

/// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: String,
    /// Account email
    pub email: String,
    /// Account role
    pub role: UserRole,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create new claims for an account
    pub fn new(user_id: &str, email: &str, role: UserRole, config: &JwtConfig) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(config.expiration_hours);

        Self {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        }
    }
}

/// Create a signed bearer token for an account
pub fn create_token(
    user_id: &str,
    email: &str,
    role: UserRole,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(user_id, email, role, config);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify and decode a bearer token.
///
/// Distinguishes an expired token from any other verification failure so
/// the gate can surface the dedicated session-expired message.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);
    // No clock-skew allowance: a token past its expiry is expired.
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::AuthenticationFailed,
    })
}

/// The five terminal rejection kinds of the request gate.
///
/// Returned (never thrown) so call sites handle each case and tests can
/// assert on the kind directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Header missing or not of the form `Bearer <token>`
    InvalidAuthFormat,
    /// Empty token after the scheme prefix
    MissingToken,
    /// Signature valid, expiry in the past
    TokenExpired,
    /// Signature invalid, token malformed, or unexpected verification error
    AuthenticationFailed,
    /// Token valid but the account no longer exists
    UserNotFound,
}

impl AuthError {
    /// Human-readable message returned to the client.
    pub fn message(&self) -> &'static str {
        match self {
            Self::InvalidAuthFormat => "Invalid authorization format. Please login again.",
            Self::MissingToken => "Login Required!",
            Self::TokenExpired => "Session Expired! Please Login Again.",
            Self::AuthenticationFailed => "Authentication failed. Please login again.",
            Self::UserNotFound => "User not found. Please login again.",
        }
    }

    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidAuthFormat => "invalid_auth_format",
            Self::MissingToken => "missing_token",
            Self::TokenExpired => "token_expired",
            Self::AuthenticationFailed => "authentication_failed",
            Self::UserNotFound => "user_not_found",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AuthError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "unit-test-secret".to_string(),
            expiration_hours: 24,
            issuer: "careerconnect".to_string(),
        }
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = test_config();
        let token =
            create_token("user-123", "student@campus.edu", UserRole::Student, &config).unwrap();

        let claims = verify_token(&token, &config).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.email, "student@campus.edu");
        assert_eq!(claims.role, UserRole::Student);
    }

    #[test]
    fn test_invalid_token() {
        let config = test_config();
        let result = verify_token("invalid-token", &config);
        assert_eq!(result.unwrap_err(), AuthError::AuthenticationFailed);
    }

    #[test]
    fn test_expired_token() {
        let config = test_config();
        let now = Utc::now();
        let claims = Claims {
            sub: "user-123".to_string(),
            email: "student@campus.edu".to_string(),
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

        assert_eq!(
            verify_token(&token, &config).unwrap_err(),
            AuthError::TokenExpired
        );
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let mut other = test_config();
        other.issuer = "someone-else".to_string();
        let token =
            create_token("user-123", "student@campus.edu", UserRole::Student, &other).unwrap();

        assert_eq!(
            verify_token(&token, &test_config()).unwrap_err(),
            AuthError::AuthenticationFailed
        );
    }
}
