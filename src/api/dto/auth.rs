//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::user::UserDto;

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "email": "tpoadmin@careerconnect.com",
    "password": "secret123"
}))]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Successful login response
///
/// The token goes into the `Authorization: Bearer <token>` header of every
/// subsequent request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    /// The authenticated account
    pub user: UserDto,
}

/// Student self-registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "first_name": "Asha",
    "last_name": "Verma",
    "email": "asha@campus.edu",
    "password": "secure_password_123"
}))]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(max = 50))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    /// Minimum 8 characters
    #[validate(length(min = 8))]
    pub password: String,
}

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    /// Current password, for confirmation
    #[validate(length(min = 1))]
    pub current_password: String,
    /// New password (minimum 8 characters)
    #[validate(length(min = 8))]
    pub new_password: String,
}
