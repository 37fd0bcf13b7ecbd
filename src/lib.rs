#[cfg(feature = "client")]
use std::sync::Arc;

#[cfg(feature = "client")]
use tokio_util::sync::CancellationToken;

#[cfg(feature = "client")]
use crate::console::Console;
#[cfg(feature = "client")]
use crate::models::config::ClientConfig;
#[cfg(feature = "client")]
use crate::repository::HttpRepository;
#[cfg(feature = "client")]
use crate::session::{CredentialProvider, SessionStore};

#[cfg(feature = "client")]
pub mod console;
#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod forms;
#[cfg(feature = "data")]
pub mod models;
#[cfg(feature = "client")]
pub mod notifications;
#[cfg(feature = "data")]
pub mod pagination;
#[cfg(feature = "client")]
pub mod query;
#[cfg(feature = "client")]
pub mod repository;
#[cfg(feature = "client")]
pub mod routes;
#[cfg(feature = "client")]
pub mod services;
#[cfg(feature = "client")]
pub mod session;

/// Wires the session, the API client and the notification feed, then hands
/// the terminal to the console until the user quits.
#[cfg(feature = "client")]
pub async fn run(config: ClientConfig) -> std::io::Result<()> {
    let session = Arc::new(SessionStore::new());
    let credentials: Arc<dyn CredentialProvider> = session.clone();

    let repo = HttpRepository::new(&config, credentials)
        .map_err(|e| std::io::Error::other(format!("Failed to build API client: {e}")))?;
    let repo = Arc::new(repo);

    // Resume a session when credentials were provided up front.
    if let (Ok(username), Ok(password)) =
        (std::env::var("APP_USERNAME"), std::env::var("APP_PASSWORD"))
    {
        let form = forms::auth::LoginForm { username, password };
        match services::auth::login(repo.as_ref(), &session, &form).await {
            Ok(user) => log::info!("Signed in as {}", user.username),
            Err(err) => log::warn!("Automatic sign-in failed: {err}"),
        }
    }
    if let Err(err) = services::auth::restore_session(repo.as_ref(), &session).await {
        log::warn!("Stored session is no longer valid: {err}");
    }

    let feed_cancel = CancellationToken::new();
    let notifications =
        notifications::spawn_mock_feed(config.notification_period(), feed_cancel.clone());

    let console = Console::new(config, repo, session);
    let result = console.run(notifications).await;

    feed_cancel.cancel();
    result
}
