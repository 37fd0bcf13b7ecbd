use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::auth::Password;
use crate::domain::role::RoleSummary;
use crate::domain::types::{FullName, RoleId, UserEmail, UserId, Username};

/// User account as returned by `/users` and `/auth/me`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: UserEmail,
    pub username: Username,
    pub full_name: FullName,
    pub role_id: RoleId,
    pub role: Option<RoleSummary>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl User {
    /// Admin access is granted by the embedded role name.
    pub fn is_admin(&self) -> bool {
        self.role.as_ref().is_some_and(RoleSummary::is_admin)
    }
}

/// Validated payload for creating a user account.
#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub email: UserEmail,
    pub username: Username,
    pub full_name: FullName,
    pub password: Password,
    /// The API falls back to the `user` role when absent.
    pub role_id: Option<RoleId>,
}

/// Partial update of a user account; `None` fields are left untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateUser {
    pub email: Option<UserEmail>,
    pub username: Option<Username>,
    pub full_name: Option<FullName>,
    pub password: Option<Password>,
    pub role_id: Option<RoleId>,
    pub is_active: Option<bool>,
}

impl UpdateUser {
    /// Update touching only the activation flag.
    #[must_use]
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }
}
