//! Startup provisioning of the privileged operator accounts.
//!
//! Runs once after migrations and before the HTTP listener binds. Each of
//! the three operator identities (superuser, management admin, TPO admin)
//! is upserted by email: created with a freshly hashed password when
//! absent, or refreshed in place when present — display fields only, the
//! stored password hash is never touched on update.
//!
//! The three upserts are fault-isolated: a failure on one identity is
//! logged as a warning and the remaining identities are still provisioned.
//! The routine never returns an error; startup proceeds regardless.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use thiserror::Error;
use tracing::{info, warn};

use crate::auth::password::hash_password;
use crate::config::BootstrapConfig;
use crate::infrastructure::database::entities::user::{self, UserRole};

/// Canonical avatar assigned to the superuser account.
pub const SUPER_ADMIN_PROFILE_IMAGE: &str =
    "https://res.cloudinary.com/careerconnect/image/upload/v1/defaults/superuser.png";

/// One of the three operator identities, with its canonical display fields.
struct PrivilegedIdentity<'a> {
    email: &'a str,
    password: &'a str,
    first_name: &'static str,
    middle_name: &'static str,
    last_name: &'static str,
    role: UserRole,
    profile_image: Option<&'static str>,
}

/// Outcome counts of one provisioning run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionReport {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

enum Outcome {
    Created,
    Updated,
}

#[derive(Debug, Error)]
enum ProvisionError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Ensure the three operator accounts exist and carry canonical metadata.
///
/// Idempotent: any number of runs yields the same end state. Unrelated
/// accounts are never touched.
pub async fn provision_default_accounts(
    db: &DatabaseConnection,
    config: &BootstrapConfig,
) -> ProvisionReport {
    let identities = [
        PrivilegedIdentity {
            email: &config.super_admin_email,
            password: &config.super_admin_password,
            first_name: "Super",
            middle_name: " ",
            last_name: "Admin",
            role: UserRole::Superuser,
            profile_image: Some(SUPER_ADMIN_PROFILE_IMAGE),
        },
        PrivilegedIdentity {
            email: &config.management_admin_email,
            password: &config.management_admin_password,
            first_name: "Management",
            middle_name: " ",
            last_name: "Admin",
            role: UserRole::ManagementAdmin,
            profile_image: None,
        },
        PrivilegedIdentity {
            email: &config.tpo_admin_email,
            password: &config.tpo_admin_password,
            first_name: "TPO",
            middle_name: " ",
            last_name: "Admin",
            role: UserRole::TpoAdmin,
            profile_image: None,
        },
    ];

    let mut report = ProvisionReport::default();
    for identity in &identities {
        match upsert_identity(db, identity).await {
            Ok(Outcome::Created) => {
                info!(
                    email = identity.email,
                    role = identity.role.as_str(),
                    "Provisioned default account"
                );
                report.created += 1;
            }
            Ok(Outcome::Updated) => {
                report.updated += 1;
            }
            Err(e) => {
                warn!(
                    email = identity.email,
                    role = identity.role.as_str(),
                    error = %e,
                    "Failed to provision default account"
                );
                report.failed += 1;
            }
        }
    }

    report
}

async fn upsert_identity(
    db: &DatabaseConnection,
    identity: &PrivilegedIdentity<'_>,
) -> Result<Outcome, ProvisionError> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(identity.email))
        .one(db)
        .await?;

    let now = Utc::now();
    match existing {
        None => {
            let password_hash = hash_password(identity.password)?;
            user::ActiveModel {
                id: Set(uuid::Uuid::new_v4().to_string()),
                first_name: Set(identity.first_name.to_string()),
                middle_name: Set(identity.middle_name.to_string()),
                last_name: Set(identity.last_name.to_string()),
                email: Set(identity.email.to_string()),
                password_hash: Set(password_hash),
                role: Set(identity.role),
                profile_image: Set(identity.profile_image.map(String::from)),
                created_at: Set(now),
                updated_at: Set(now),
                last_login_at: Set(None),
            }
            .insert(db)
            .await?;
            Ok(Outcome::Created)
        }
        Some(model) => {
            // Refresh display fields only; the password hash stays as the
            // operator last set it.
            let mut active: user::ActiveModel = model.into();
            active.first_name = Set(identity.first_name.to_string());
            active.middle_name = Set(identity.middle_name.to_string());
            active.last_name = Set(identity.last_name.to_string());
            active.role = Set(identity.role);
            if let Some(image) = identity.profile_image {
                active.profile_image = Set(Some(image.to_string()));
            }
            active.updated_at = Set(now);
            active.update(db).await?;
            Ok(Outcome::Updated)
        }
    }
}
