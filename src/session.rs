//! Session context for authenticated actors.
//!
//! Every operation that needs to know who is acting takes an explicit
//! [`Session`] instead of consulting ambient state. A session is only ever
//! produced by [`crate::core::user::authenticate`], so holding one implies an
//! active account.

use crate::entities::user;
use crate::errors::{Error, Result};

/// Role string stored for administrator accounts.
pub const ROLE_ADMIN: &str = "admin";

/// An authenticated actor: identity plus privilege tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Id of the logged-in user
    pub user_id: i64,
    /// Login name
    pub username: String,
    /// Display name for presentation
    pub display_name: String,
    /// Privilege tier: `"admin"` or `"user"`
    pub role: String,
}

impl Session {
    /// Builds a session from a user row.
    #[must_use]
    pub fn for_user(user: &user::Model) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            role: user.role.clone(),
        }
    }

    /// Whether this session belongs to an administrator.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Fails with [`Error::AdminRequired`] unless this is an admin session.
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::AdminRequired)
        }
    }
}
