//! Wires the full remote flow together: resolve the session, build a client for the
//! signed-in user, watch the live snapshots, and close everything on sign-out.
//!
//! Point it at a running document store:
//!     DATEBOOK_URL=https://example.com/api/ DATEBOOK_UID=me DATEBOOK_TOKEN=secret cargo run --example remote

use std::error::Error;

use async_trait::async_trait;
use chrono::Local;
use url::Url;

use datebook::client::Client;
use datebook::session::{AuthSession, AuthState, IdentityProvider, Session, UserInfo};
use datebook::{RemoteConfig, TaskListController};

/// A provider that trusts `DATEBOOK_UID` / `DATEBOOK_TOKEN` from the environment.
/// A real deployment wires the platform's redirect-based identity handshake here instead
struct EnvIdentityProvider;

#[async_trait]
impl IdentityProvider for EnvIdentityProvider {
    async fn restore(&self) -> Result<Option<AuthSession>, Box<dyn Error + Send + Sync>> {
        match (std::env::var("DATEBOOK_UID"), std::env::var("DATEBOOK_TOKEN")) {
            (Ok(uid), Ok(access_token)) => Ok(Some(AuthSession {
                user: UserInfo { uid, display_name: None, photo_url: None },
                access_token,
            })),
            _ => Ok(None),
        }
    }

    async fn sign_in_with_redirect(&self) -> Result<AuthSession, Box<dyn Error + Send + Sync>> {
        Err("set DATEBOOK_UID and DATEBOOK_TOKEN to sign in".into())
    }

    async fn sign_out(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let base_url: Url = std::env::var("DATEBOOK_URL")
        .expect("DATEBOOK_URL must point at the document store")
        .parse()
        .expect("DATEBOOK_URL must be a valid URL");
    let config = RemoteConfig::new(base_url);

    let session = Session::start(Box::new(EnvIdentityProvider));
    session.resolve().await;

    let auth = match session.state() {
        AuthState::SignedIn(user) => {
            println!("Hi, {}", user.display_name.as_deref().unwrap_or(&user.uid));
            session.auth_session().unwrap()
        },
        _ => {
            session.sign_in().await;
            match session.auth_session() {
                Some(auth) => auth,
                None => {
                    println!("Not signed in, nothing to show.");
                    return;
                },
            }
        },
    };

    let client = Client::new(&config, &auth);
    let today = Local::now().date_naive();
    let mut controller = TaskListController::new(client, today);

    // Wait for the first snapshot pushed by the live subscription
    while controller.is_loading() {
        if !controller.changed().await {
            log::error!("The store subscription ended before the first snapshot");
            return;
        }
    }

    println!("---- {} ----", controller.selected_date());
    datebook::utils::print_task_list(&controller.visible_tasks());
    println!("(marked days: {:?})", controller.marked_dates());

    // The subscription dies with the session
    controller.close();
    session.sign_out().await;
}
