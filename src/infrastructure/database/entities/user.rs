//! Account entity for database

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role
///
/// Closed enumeration: the three privileged operator roles plus the
/// self-registering student role. Stored as strings in the `role` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "tpo_admin")]
    TpoAdmin,
    #[sea_orm(string_value = "management_admin")]
    ManagementAdmin,
    #[sea_orm(string_value = "superuser")]
    Superuser,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Student
    }
}

impl UserRole {
    /// Operator roles provisioned at startup, as opposed to students.
    pub fn is_privileged(&self) -> bool {
        !matches!(self, Self::Student)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::TpoAdmin => "tpo_admin",
            Self::ManagementAdmin => "management_admin",
            Self::Superuser => "superuser",
        }
    }

    /// Parse an API-supplied role string.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Self::Student),
            "tpo_admin" => Some(Self::TpoAdmin),
            "management_admin" => Some(Self::ManagementAdmin),
            "superuser" => Some(Self::Superuser),
            _ => None,
        }
    }
}

/// Account model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub first_name: String,
    /// May hold a single-space placeholder when the account has no middle name.
    pub middle_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
