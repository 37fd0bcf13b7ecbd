use serde::{Deserialize, Serialize};

use crate::domain::types::{FullName, RoleId, TypeConstraintError, UserEmail, UserId, Username};
use crate::domain::user::{
    NewUser as DomainNewUser, UpdateUser as DomainUpdateUser, User as DomainUser,
};
use crate::models::parse_timestamp;
use crate::models::role::RoleSummary;

#[derive(Debug, Clone, Deserialize)]
/// API model for [`crate::domain::user::User`].
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub role_id: String,
    pub role: Option<RoleSummary>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

fn default_active() -> bool {
    true
}

#[derive(Serialize)]
/// Request body of `POST /users`.
pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub full_name: &'a str,
    pub password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<&'a str>,
}

#[derive(Serialize, Default)]
/// Request body of `PUT /users/{id}`; only present fields are changed.
pub struct UpdateUser<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl TryFrom<User> for DomainUser {
    type Error = TypeConstraintError;

    fn try_from(user: User) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(user.id)?,
            email: UserEmail::new(user.email)?,
            username: Username::new(user.username)?,
            full_name: FullName::new(user.full_name)?,
            role_id: RoleId::new(user.role_id)?,
            role: user.role.map(TryInto::try_into).transpose()?,
            is_active: user.is_active,
            created_at: parse_timestamp(&user.created_at)?,
            updated_at: parse_timestamp(&user.updated_at)?,
        })
    }
}

impl<'a> From<&'a DomainNewUser> for NewUser<'a> {
    fn from(user: &'a DomainNewUser) -> Self {
        Self {
            email: user.email.as_str(),
            username: user.username.as_str(),
            full_name: user.full_name.as_str(),
            password: user.password.expose(),
            role_id: user.role_id.as_ref().map(RoleId::as_str),
        }
    }
}

impl<'a> From<&'a DomainUpdateUser> for UpdateUser<'a> {
    fn from(user: &'a DomainUpdateUser) -> Self {
        Self {
            email: user.email.as_ref().map(UserEmail::as_str),
            username: user.username.as_ref().map(Username::as_str),
            full_name: user.full_name.as_ref().map(FullName::as_str),
            password: user.password.as_ref().map(|p| p.expose()),
            role_id: user.role_id.as_ref().map(RoleId::as_str),
            is_active: user.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn from_user_into_domain() {
        let payload: User = serde_json::from_value(json!({
            "id": "u-1",
            "email": "Admin@Example.com",
            "username": "admin",
            "full_name": "Site Admin",
            "role_id": "admin",
            "role": {"id": "admin", "name": "admin"},
            "created_at": "2024-01-01T00:00:00",
            "updated_at": "2024-01-01T00:00:00"
        }))
        .unwrap();

        let user = DomainUser::try_from(payload).expect("valid user");
        assert_eq!(user.email.as_str(), "admin@example.com");
        assert!(user.is_active);
        assert!(user.is_admin());
    }

    #[test]
    fn toggle_payload_only_carries_flag() {
        let update = DomainUpdateUser::active(false);
        let body = serde_json::to_value(UpdateUser::from(&update)).unwrap();
        assert_eq!(body, json!({"is_active": false}));
    }
}
