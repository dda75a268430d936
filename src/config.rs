//! Service-client configuration
//!
//! The remote service context is built by the caller and passed in explicitly;
//! this crate holds no module-level service handles.

use url::Url;

/// Where the remote document store lives.
///
/// Passed to [`Client::new`](crate::client::Client::new) together with the signed-in
/// [`AuthSession`](crate::session::AuthSession).
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    base_url: Url,
}

impl RemoteConfig {
    /// `base_url` is the root the `tasks` collection is resolved against, so it usually
    /// ends with a trailing slash (e.g. `https://example.com/api/`)
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
