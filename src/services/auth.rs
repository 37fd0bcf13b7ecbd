//! Login, registration and session lifecycle.

use crate::domain::auth::{Credentials, Registration};
use crate::domain::user::User;
use crate::forms::auth::{LoginForm, RegisterForm};
use crate::repository::AuthApi;
use crate::services::{ServiceError, ServiceResult};
use crate::session::{CredentialProvider, SessionStore};

/// Exchanges the credentials for tokens and loads the signed-in account.
pub async fn login<R>(repo: &R, session: &SessionStore, form: &LoginForm) -> ServiceResult<User>
where
    R: AuthApi + ?Sized,
{
    let credentials = Credentials::try_from(form)?;

    let tokens = repo.login(&credentials).await.map_err(|err| {
        log::error!("Login failed for {}: {err}", credentials.username);
        ServiceError::from(err)
    })?;
    session.set_tokens(tokens);

    load_current_user(repo, session).await
}

/// Creates an account and signs it in.
pub async fn register<R>(
    repo: &R,
    session: &SessionStore,
    form: &RegisterForm,
) -> ServiceResult<User>
where
    R: AuthApi + ?Sized,
{
    let registration = Registration::try_from(form)?;

    let tokens = repo.register(&registration).await.map_err(|err| {
        log::error!("Registration failed for {}: {err}", registration.username);
        ServiceError::from(err)
    })?;
    session.set_tokens(tokens);

    load_current_user(repo, session).await
}

/// Notifies the API and forgets the session; the local state is cleared even
/// when the API call fails.
pub async fn logout<R>(repo: &R, session: &SessionStore)
where
    R: AuthApi + ?Sized,
{
    if session.has_tokens()
        && let Err(err) = repo.logout().await
    {
        log::warn!("Logout request failed: {err}");
    }
    session.clear();
}

/// Loads the account of a session that has tokens but no user yet.
///
/// Returns `Ok(None)` for anonymous sessions.
pub async fn restore_session<R>(repo: &R, session: &SessionStore) -> ServiceResult<Option<User>>
where
    R: AuthApi + ?Sized,
{
    if let Some(user) = session.user() {
        return Ok(Some(user));
    }
    if !session.has_tokens() {
        return Ok(None);
    }
    load_current_user(repo, session).await.map(Some)
}

async fn load_current_user<R>(repo: &R, session: &SessionStore) -> ServiceResult<User>
where
    R: AuthApi + ?Sized,
{
    match repo.current_user().await {
        Ok(user) => {
            log::info!("Signed in as {}", user.username);
            session.set_user(Some(user.clone()));
            Ok(user)
        }
        Err(err) => {
            log::error!("Failed to load the current user: {err}");
            session.clear();
            Err(ServiceError::from(err))
        }
    }
}
