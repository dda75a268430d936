//! Checks the session gate state machine against a scripted identity provider

use std::error::Error;

use async_trait::async_trait;

use datebook::session::{AuthSession, AuthState, IdentityProvider, Session, UserInfo};

/// A provider with a scripted outcome for each operation
struct ScriptedProvider {
    restored: Option<AuthSession>,
    restore_fails: bool,
    sign_in_fails: bool,
    sign_out_fails: bool,
}

impl ScriptedProvider {
    fn signed_out() -> Self {
        Self { restored: None, restore_fails: false, sign_in_fails: false, sign_out_fails: false }
    }

    fn with_cached_identity() -> Self {
        Self { restored: Some(some_auth_session()), ..Self::signed_out() }
    }
}

fn some_auth_session() -> AuthSession {
    AuthSession {
        user: UserInfo {
            uid: "user-1".to_string(),
            display_name: Some("Ada".to_string()),
            photo_url: None,
        },
        access_token: "token-1".to_string(),
    }
}

#[async_trait]
impl IdentityProvider for ScriptedProvider {
    async fn restore(&self) -> Result<Option<AuthSession>, Box<dyn Error + Send + Sync>> {
        if self.restore_fails {
            return Err("identity service unreachable".into());
        }
        Ok(self.restored.clone())
    }

    async fn sign_in_with_redirect(&self) -> Result<AuthSession, Box<dyn Error + Send + Sync>> {
        if self.sign_in_fails {
            return Err("handshake rejected".into());
        }
        Ok(some_auth_session())
    }

    async fn sign_out(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.sign_out_fails {
            return Err("identity service unreachable".into());
        }
        Ok(())
    }
}

#[tokio::test]
async fn a_fresh_session_loads_then_lands_signed_out() {
    let _ = env_logger::builder().is_test(true).try_init();

    let session = Session::start(Box::new(ScriptedProvider::signed_out()));
    assert_eq!(session.state(), AuthState::Loading);
    assert_eq!(session.auth_session().map(|auth| auth.user.uid), None);

    session.resolve().await;
    assert_eq!(session.state(), AuthState::SignedOut);
}

#[tokio::test]
async fn a_cached_identity_resolves_to_signed_in() {
    let _ = env_logger::builder().is_test(true).try_init();

    let session = Session::start(Box::new(ScriptedProvider::with_cached_identity()));
    session.resolve().await;

    match session.state() {
        AuthState::SignedIn(user) => assert_eq!(user.uid, "user-1"),
        other => panic!("expected SignedIn, got {:?}", other),
    }
    assert_eq!(session.auth_session().unwrap().access_token, "token-1");
}

#[tokio::test]
async fn a_failing_restore_lands_signed_out() {
    let _ = env_logger::builder().is_test(true).try_init();

    let provider = ScriptedProvider { restore_fails: true, ..ScriptedProvider::with_cached_identity() };
    let session = Session::start(Box::new(provider));
    session.resolve().await;

    assert_eq!(session.state(), AuthState::SignedOut);
    assert!(session.auth_session().is_none());
}

#[tokio::test]
async fn sign_in_completes_the_handshake() {
    let _ = env_logger::builder().is_test(true).try_init();

    let session = Session::start(Box::new(ScriptedProvider::signed_out()));
    session.resolve().await;
    session.sign_in().await;

    match session.state() {
        AuthState::SignedIn(user) => assert_eq!(user.display_name.as_deref(), Some("Ada")),
        other => panic!("expected SignedIn, got {:?}", other),
    }
}

#[tokio::test]
async fn a_rejected_sign_in_stays_signed_out() {
    let _ = env_logger::builder().is_test(true).try_init();

    let provider = ScriptedProvider { sign_in_fails: true, ..ScriptedProvider::signed_out() };
    let session = Session::start(Box::new(provider));
    session.resolve().await;
    session.sign_in().await;

    assert_eq!(session.state(), AuthState::SignedOut);
    assert!(session.auth_session().is_none());
}

#[tokio::test]
async fn sign_out_clears_the_cached_identity() {
    let _ = env_logger::builder().is_test(true).try_init();

    let session = Session::start(Box::new(ScriptedProvider::with_cached_identity()));
    session.resolve().await;
    assert!(session.auth_session().is_some());

    session.sign_out().await;
    assert_eq!(session.state(), AuthState::SignedOut);
    // No identity, no store client: task operations are unavailable until a new sign-in
    assert!(session.auth_session().is_none());
}

#[tokio::test]
async fn sign_out_clears_the_cached_identity_even_when_the_provider_fails() {
    let _ = env_logger::builder().is_test(true).try_init();

    let provider = ScriptedProvider { sign_out_fails: true, ..ScriptedProvider::with_cached_identity() };
    let session = Session::start(Box::new(provider));
    session.resolve().await;
    session.sign_out().await;

    assert_eq!(session.state(), AuthState::SignedOut);
    assert!(session.auth_session().is_none());
}

#[tokio::test]
async fn watchers_observe_every_transition() {
    let _ = env_logger::builder().is_test(true).try_init();

    let session = Session::start(Box::new(ScriptedProvider::with_cached_identity()));
    let mut states = session.watch();
    assert_eq!(*states.borrow_and_update(), AuthState::Loading);

    session.resolve().await;
    assert!(states.changed().await.is_ok());
    assert!(matches!(&*states.borrow_and_update(), AuthState::SignedIn(_)));

    session.sign_out().await;
    assert!(states.changed().await.is_ok());
    assert_eq!(*states.borrow_and_update(), AuthState::SignedOut);
}
