//! Account DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::infrastructure::database::entities::user;

/// Account as exposed over the API. Never carries the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    /// Unique account identifier (UUID)
    pub id: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    /// `student`, `tpo_admin`, `management_admin` or `superuser`
    pub role: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<user::Model> for UserDto {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            middle_name: model.middle_name,
            last_name: model.last_name,
            email: model.email,
            role: model.role.as_str().to_string(),
            profile_image: model.profile_image,
            created_at: model.created_at,
            last_login_at: model.last_login_at,
        }
    }
}

/// Query parameters for the account listing.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct ListUsersParams {
    /// Page number (1-based). Default: 1
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page (1-100). Default: 20
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Substring match against name or email
    pub search: Option<String>,
    /// Filter by role tag
    pub role: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}
