//! Credentials and tokens exchanged with the authentication endpoints.

use std::fmt::{Debug, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::types::{FullName, TypeConstraintError, UserEmail, Username};

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Plain-text password kept out of debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Password(String);

impl Password {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        if value.chars().count() < PASSWORD_MIN_LENGTH {
            return Err(TypeConstraintError::InvalidValue(format!(
                "password must be at least {PASSWORD_MIN_LENGTH} characters"
            )));
        }
        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Username/password pair submitted to `/auth/login`.
#[derive(Clone, Debug, PartialEq)]
pub struct Credentials {
    pub username: Username,
    pub password: String,
}

/// Self-service sign-up payload for `/auth/register`.
#[derive(Clone, Debug, PartialEq)]
pub struct Registration {
    pub email: UserEmail,
    pub username: Username,
    pub full_name: FullName,
    pub password: Password,
}

/// Token pair issued by the authentication endpoints.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl Debug for AuthTokens {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens").finish_non_exhaustive()
    }
}
