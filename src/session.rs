//! The session gate for the remote storage variant
//!
//! Task operations are only available behind a signed-in identity: a
//! [`Client`](crate::client::Client) can only be built from the [`AuthSession`] this
//! module hands out, and that session only exists while the state is
//! [`AuthState::SignedIn`].
//!
//! Sign-in is a redirect-based handshake run by an external identity provider;
//! completion is observed asynchronously, never returned synchronously from the
//! button press.

use std::error::Error;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

/// The identity of the signed-in user, as exposed by the identity provider
#[derive(Clone, Debug, PartialEq)]
pub struct UserInfo {
    pub uid: String,
    pub display_name: Option<String>,
    pub photo_url: Option<Url>,
}

/// A completed sign-in: the user, plus the token that authenticates store requests
#[derive(Clone, Debug)]
pub struct AuthSession {
    pub user: UserInfo,
    pub access_token: String,
}

/// Where the session currently stands.
///
/// Valid transitions: `Loading` → `SignedOut` or `SignedIn` (initial resolution),
/// `SignedOut` → `SignedIn` (completed handshake), `SignedIn` → `SignedOut`
/// (sign-out). Nothing goes back to `Loading` short of a fresh [`Session::start`]
#[derive(Clone, Debug, PartialEq)]
pub enum AuthState {
    /// Identity resolution is pending. No store operation may be issued yet
    Loading,
    SignedOut,
    SignedIn(UserInfo),
}

impl Default for AuthState {
    fn default() -> Self {
        Self::Loading
    }
}

/// See [`Session::watch`]
pub type AuthStateReceiver = tokio::sync::watch::Receiver<AuthState>;

/// The external identity service this crate delegates authentication to
#[async_trait]
pub trait IdentityProvider {
    /// Resolve the identity cached from a previous visit, or the outcome of a redirect
    /// handshake that just completed. `None` means nobody is signed in
    async fn restore(&self) -> Result<Option<AuthSession>, Box<dyn Error + Send + Sync>>;

    /// Run the redirect-based sign-in handshake to completion
    async fn sign_in_with_redirect(&self) -> Result<AuthSession, Box<dyn Error + Send + Sync>>;

    /// Terminate the remote session
    async fn sign_out(&self) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Tracks the signed-in identity and gates task storage behind it
pub struct Session {
    provider: Box<dyn IdentityProvider + Send + Sync>,
    state: tokio::sync::watch::Sender<AuthState>,
    auth: Mutex<Option<AuthSession>>,
}

impl Session {
    /// Start a session in the [`AuthState::Loading`] state. Call [`Session::resolve`]
    /// next to leave it
    pub fn start(provider: Box<dyn IdentityProvider + Send + Sync>) -> Self {
        let (state, _) = tokio::sync::watch::channel(AuthState::default());
        Self {
            provider,
            state,
            auth: Mutex::new(None),
        }
    }

    /// Resolve the initial identity: `Loading` becomes either `SignedIn` or `SignedOut`.
    ///
    /// A provider failure lands on `SignedOut`, like any other rejection
    pub async fn resolve(&self) {
        match self.provider.restore().await {
            Ok(Some(auth)) => self.enter(auth),
            Ok(None) => self.leave(),
            Err(err) => {
                log::warn!("Unable to restore the previous session: {}", err);
                self.leave();
            },
        }
    }

    /// Run the sign-in handshake. On rejection the user simply stays signed out
    pub async fn sign_in(&self) {
        match self.provider.sign_in_with_redirect().await {
            Ok(auth) => self.enter(auth),
            Err(err) => {
                log::warn!("Sign-in failed: {}", err);
                self.leave();
            },
        }
    }

    /// Clear the remote session and the locally cached identity.
    ///
    /// The cached identity is dropped even when the provider call fails: a broken
    /// provider must not leave the session stuck signed in
    pub async fn sign_out(&self) {
        if let Err(err) = self.provider.sign_out().await {
            log::warn!("Sign-out rejected by the identity provider: {}", err);
        }
        self.leave();
    }

    /// The current state
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Observe state transitions
    pub fn watch(&self) -> AuthStateReceiver {
        self.state.subscribe()
    }

    /// The signed-in session, or `None`. This is what a remote store client is built from
    pub fn auth_session(&self) -> Option<AuthSession> {
        self.auth.lock().unwrap().clone()
    }

    fn enter(&self, auth: AuthSession) {
        *self.auth.lock().unwrap() = Some(auth.clone());
        self.state.send_replace(AuthState::SignedIn(auth.user));
    }

    fn leave(&self) {
        *self.auth.lock().unwrap() = None;
        self.state.send_replace(AuthState::SignedOut);
    }
}
