use serde::{Deserialize, Serialize};

use crate::domain::auth::{AuthTokens, Registration};

#[derive(Debug, Clone, Deserialize)]
/// Response of `/auth/login` and `/auth/register`.
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
/// Response of `/auth/refresh`.
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Serialize)]
/// Request body of `/auth/register`.
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub full_name: &'a str,
    pub password: &'a str,
}

impl From<AuthResponse> for AuthTokens {
    fn from(response: AuthResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        }
    }
}

impl<'a> From<&'a Registration> for RegisterRequest<'a> {
    fn from(registration: &'a Registration) -> Self {
        Self {
            email: registration.email.as_str(),
            username: registration.username.as_str(),
            full_name: registration.full_name.as_str(),
            password: registration.password.expose(),
        }
    }
}
