//! Username-only "login": the current user lives in local storage under a
//! single key and nothing else is checked.

use tracing::info;

use agora_types::models::User;

use crate::api::ForumClient;
use crate::error::ClientError;
use crate::storage::LocalStorage;

pub const CURRENT_USER_KEY: &str = "currentUser";

pub fn current_user(storage: &LocalStorage) -> Result<Option<User>, ClientError> {
    match storage.get(CURRENT_USER_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Register `username`, or pick up the existing account when it is taken,
/// and remember the result as the current user.
pub async fn login(
    client: &ForumClient,
    storage: &LocalStorage,
    username: &str,
    avatar: Option<&str>,
) -> Result<User, ClientError> {
    let username = username.trim();
    let user = match client.register(username, avatar).await {
        Ok(user) => user,
        Err(e) if e.is_username_taken() => client
            .users()
            .await?
            .into_iter()
            .find(|u| u.username == username)
            .ok_or(e)?,
        Err(e) => return Err(e),
    };

    storage.set(CURRENT_USER_KEY, serde_json::to_string(&user)?)?;
    info!("Logged in as {}", user.username);
    Ok(user)
}

pub fn logout(storage: &LocalStorage) -> Result<(), ClientError> {
    storage.remove(CURRENT_USER_KEY)
}

/// The admin flag is only checked here, on the client.
pub fn require_admin(current: Option<&User>) -> Result<&User, ClientError> {
    match current {
        Some(user) if user.is_admin => Ok(user),
        Some(user) => Err(ClientError::Refused(format!("{} is not an admin", user.username))),
        None => Err(ClientError::Refused("Log in first".into())),
    }
}
