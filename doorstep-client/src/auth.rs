//! Session authentication
//!
//! The bearer token and user id live in the session store; the HTTP client
//! reads them from there on every request.

use shared::models::{LoginRequest, Profile, UserInfo};
use shared::storage_keys;

use crate::api::AccountApi;
use crate::error::{ClientError, ClientResult};
use crate::navigation::Navigation;
use crate::store::{SessionStore, SessionStoreExt};

/// Log in and persist the token, user id and profile
pub async fn login<A, S>(api: &A, store: &S, email: &str, password: &str) -> ClientResult<UserInfo>
where
    A: AccountApi + ?Sized,
    S: SessionStore + ?Sized,
{
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ClientError::not_allowed("Enter your email and password"));
    }

    let resp = api
        .login(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?;

    store.set_json(storage_keys::TOKEN, &resp.token)?;
    store.set_json(storage_keys::USER_ID, &resp.user.id)?;
    store.set_json(storage_keys::PROFILE, &Profile::from(&resp.user))?;
    tracing::info!(user_id = resp.user.id, "Logged in");
    Ok(resp.user)
}

/// Forget the session token and user
pub fn logout<S: SessionStore + ?Sized>(store: &S) -> ClientResult<()> {
    store.remove(storage_keys::TOKEN)?;
    store.remove(storage_keys::USER_ID)?;
    tracing::info!("Logged out");
    Ok(())
}

pub fn is_authenticated<S: SessionStore + ?Sized>(store: &S) -> bool {
    store
        .get_json::<String>(storage_keys::TOKEN)
        .is_some_and(|t| !t.is_empty())
}

pub fn current_user_id<S: SessionStore + ?Sized>(store: &S) -> Option<i64> {
    store.get_json(storage_keys::USER_ID)
}

/// React to a refused token: clear it and send the user to log in
pub fn handle_auth_expiry<S: SessionStore + ?Sized>(store: &S) -> Navigation {
    tracing::warn!("Session expired, redirecting to login");
    if let Err(e) = logout(store) {
        tracing::error!(error = %e, "Failed to clear expired session");
    }
    Navigation::Login
}

/// `Some(Navigation::Login)` when `error` is an auth expiry, after handling it
pub fn route_error<S: SessionStore + ?Sized>(store: &S, error: &ClientError) -> Option<Navigation> {
    error.is_auth_expired().then(|| handle_auth_expiry(store))
}
