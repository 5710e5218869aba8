//! User account business logic and login.
//!
//! Accounts carry a role (`"admin"` or `"user"`) and a status (`"active"` or
//! `"inactive"`); both gate what the holder may do. Authentication compares
//! the stored clear-text password, matching the user table this schema
//! models (see DESIGN.md). A successful login yields a [`Session`].

use crate::{
    entities::{User, user},
    errors::{Error, Result},
    session::Session,
};
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*};
use tracing::{info, warn};

const STATUS_ACTIVE: &str = "active";
const ROLES: [&str; 2] = ["admin", "user"];
const STATUSES: [&str; 2] = ["active", "inactive"];

/// Input for creating a user account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name
    pub username: String,
    /// Clear-text password
    pub password: String,
    /// Display name
    pub display_name: String,
    /// `"admin"` or `"user"`
    pub role: String,
}

/// Input for updating an existing account's profile, role, or status.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub status: String,
}

/// Checks credentials against the user table and returns a session.
///
/// # Errors
/// `InvalidCredentials` for an unknown username or wrong password (the two
/// are indistinguishable to the caller); `AccountDisabled` when the
/// credentials match but the account is inactive.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Session> {
    let user = User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    let Some(user) = user else {
        warn!(username, "login attempt for unknown username");
        return Err(Error::InvalidCredentials);
    };

    // Clear-text comparison against the stored password.
    if user.password != password {
        warn!(username, "login attempt with wrong password");
        return Err(Error::InvalidCredentials);
    }

    if user.status != STATUS_ACTIVE {
        return Err(Error::AccountDisabled);
    }

    info!(username, user_id = user.id, role = %user.role, "login succeeded");
    Ok(Session::for_user(&user))
}

fn validate_role_and_status(role: &str, status: &str) -> Result<()> {
    if !ROLES.contains(&role) {
        return Err(Error::Validation {
            message: format!("unknown role '{role}'"),
        });
    }
    if !STATUSES.contains(&status) {
        return Err(Error::Validation {
            message: format!("unknown status '{status}'"),
        });
    }
    Ok(())
}

/// Creates a new account with active status. Admin only.
///
/// # Errors
/// `DuplicateUsername` when the login name is taken; `Validation` for empty
/// username/password or an unknown role.
pub async fn create_user(
    db: &DatabaseConnection,
    session: &Session,
    input: NewUser,
) -> Result<user::Model> {
    session.require_admin()?;

    if input.username.trim().is_empty() {
        return Err(Error::Validation {
            message: "username cannot be empty".to_string(),
        });
    }
    if input.password.is_empty() {
        return Err(Error::Validation {
            message: "password cannot be empty".to_string(),
        });
    }
    validate_role_and_status(&input.role, STATUS_ACTIVE)?;

    let model = user::ActiveModel {
        username: Set(input.username.trim().to_string()),
        password: Set(input.password),
        display_name: Set(input.display_name),
        role: Set(input.role),
        status: Set(STATUS_ACTIVE.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    match model.insert(db).await {
        Ok(created) => {
            info!(username = %created.username, role = %created.role, "created user");
            Ok(created)
        }
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(Error::DuplicateUsername {
                username: input.username.trim().to_string(),
            }),
            _ => Err(err.into()),
        },
    }
}

/// Rewrites an account's username, display name, role, and status.
/// The password is left as is. Admin only.
pub async fn update_user(
    db: &DatabaseConnection,
    session: &Session,
    user_id: i64,
    input: UserUpdate,
) -> Result<user::Model> {
    session.require_admin()?;
    validate_role_and_status(&input.role, &input.status)?;

    let existing = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(Error::UserNotFound { id: user_id })?;

    let mut active: user::ActiveModel = existing.into();
    active.username = Set(input.username.trim().to_string());
    active.display_name = Set(input.display_name);
    active.role = Set(input.role);
    active.status = Set(input.status);

    match active.update(db).await {
        Ok(updated) => Ok(updated),
        Err(err) => match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Err(Error::DuplicateUsername {
                username: input.username.trim().to_string(),
            }),
            _ => Err(err.into()),
        },
    }
}

/// Finds a user by its unique ID.
pub async fn get_user_by_id(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// All accounts, newest first.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_desc(user::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}
