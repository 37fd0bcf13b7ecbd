//! Forms for the user management screen.

use serde::Deserialize;
use validator::Validate;

use crate::domain::auth::Password;
use crate::domain::types::{FullName, RoleId, UserEmail, Username};
use crate::domain::user::{NewUser, UpdateUser};
use crate::forms::{FormError, optional_text};

#[derive(Debug, Clone, Deserialize, Validate)]
/// Form data for creating a user account.
pub struct CreateUserForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 1))]
    pub role_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
/// Form data for editing a user account. A blank password keeps the old one.
pub struct EditUserForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[serde(default)]
    pub password: Option<String>,
    #[validate(length(min = 1))]
    pub role_id: String,
}

impl TryFrom<&CreateUserForm> for NewUser {
    type Error = FormError;

    fn try_from(form: &CreateUserForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            email: UserEmail::new(form.email.as_str()).map_err(|_| FormError::InvalidEmail)?,
            username: Username::new(form.username.as_str()).map_err(|_| FormError::InvalidName)?,
            full_name: FullName::new(form.full_name.as_str())
                .map_err(|_| FormError::InvalidName)?,
            password: Password::new(form.password.as_str())
                .map_err(|_| FormError::InvalidPassword)?,
            role_id: Some(RoleId::new(form.role_id.as_str()).map_err(|_| FormError::InvalidRole)?),
        })
    }
}

impl TryFrom<&EditUserForm> for UpdateUser {
    type Error = FormError;

    fn try_from(form: &EditUserForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            email: Some(UserEmail::new(form.email.as_str()).map_err(|_| FormError::InvalidEmail)?),
            username: Some(
                Username::new(form.username.as_str()).map_err(|_| FormError::InvalidName)?,
            ),
            full_name: Some(
                FullName::new(form.full_name.as_str()).map_err(|_| FormError::InvalidName)?,
            ),
            password: optional_text(&form.password)
                .map(Password::new)
                .transpose()
                .map_err(|_| FormError::InvalidPassword)?,
            role_id: Some(RoleId::new(form.role_id.as_str()).map_err(|_| FormError::InvalidRole)?),
            is_active: None,
        })
    }
}
