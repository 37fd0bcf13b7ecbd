//! Login and self-registration forms.

use serde::Deserialize;
use validator::Validate;

use crate::domain::auth::{Credentials, Password, Registration};
use crate::domain::types::{FullName, UserEmail, Username};
use crate::forms::FormError;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 2))]
    pub full_name: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub confirm_password: String,
}

impl TryFrom<&LoginForm> for Credentials {
    type Error = FormError;

    fn try_from(form: &LoginForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            username: Username::new(form.username.as_str()).map_err(|_| FormError::InvalidName)?,
            password: form.password.clone(),
        })
    }
}

impl TryFrom<&RegisterForm> for Registration {
    type Error = FormError;

    fn try_from(form: &RegisterForm) -> Result<Self, Self::Error> {
        form.validate()?;

        Ok(Self {
            email: UserEmail::new(form.email.as_str()).map_err(|_| FormError::InvalidEmail)?,
            username: Username::new(form.username.as_str()).map_err(|_| FormError::InvalidName)?,
            full_name: FullName::new(form.full_name.as_str())
                .map_err(|_| FormError::InvalidName)?,
            password: Password::new(form.password.as_str())
                .map_err(|_| FormError::InvalidPassword)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_both_fields() {
        let form = LoginForm {
            username: "admin".into(),
            password: String::new(),
        };
        assert!(Credentials::try_from(&form).is_err());
    }

    #[test]
    fn registration_requires_matching_passwords() {
        let form = RegisterForm {
            email: "new@example.com".into(),
            username: "newbie".into(),
            full_name: "New User".into(),
            password: "secret1".into(),
            confirm_password: "secret2".into(),
        };
        assert!(matches!(
            Registration::try_from(&form),
            Err(FormError::Validation(_))
        ));

        let form = RegisterForm {
            confirm_password: "secret1".into(),
            ..form
        };
        let registration = Registration::try_from(&form).expect("valid form");
        assert_eq!(registration.username.as_str(), "newbie");
    }
}
