//! Authentication
//!
//! The UI only needs the current user, sign-in/sign-out and whether the
//! provider is still initializing. State changes are published on a watch
//! channel so views can gate on "user present".

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::store::lock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

impl User {
    /// Best available display name: name, then email, then "User"
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("User")
    }

    /// Avatar initials from the label
    pub fn initials(&self) -> String {
        self.label()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub initializing: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            initializing: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    #[error("sign-in rejected: {0}")]
    Rejected(String),

    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn state(&self) -> AuthState;

    fn watch(&self) -> watch::Receiver<AuthState>;

    /// Finish initializing, restoring a remembered session if there is one
    async fn restore(&self) -> Result<(), AuthError>;

    async fn sign_in(&self) -> Result<User, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;
}

/// In-process provider that signs in as a configured profile
pub struct LocalAuthProvider {
    profile: User,
    state: watch::Sender<AuthState>,
    remembered: Mutex<Option<User>>,
    reject_sign_in: AtomicBool,
}

impl LocalAuthProvider {
    pub fn new(profile: User) -> Self {
        Self {
            profile,
            state: watch::Sender::new(AuthState::default()),
            remembered: Mutex::new(None),
            reject_sign_in: AtomicBool::new(false),
        }
    }

    /// Session that `restore` brings back, as if from a previous visit
    pub fn remember(&self, user: Option<User>) {
        *lock(&self.remembered) = user;
    }

    pub fn set_reject_sign_in(&self, reject: bool) {
        self.reject_sign_in.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuthProvider for LocalAuthProvider {
    fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    async fn restore(&self) -> Result<(), AuthError> {
        let user = lock(&self.remembered).clone();
        self.state.send_modify(|state| {
            if state.user.is_none() {
                state.user = user;
            }
            state.initializing = false;
        });
        Ok(())
    }

    async fn sign_in(&self) -> Result<User, AuthError> {
        if self.reject_sign_in.load(Ordering::SeqCst) {
            log::warn!("[auth] sign-in rejected for {}", self.profile.uid);
            return Err(AuthError::Rejected("popup closed".to_string()));
        }
        let user = self.profile.clone();
        *lock(&self.remembered) = Some(user.clone());
        self.state.send_replace(AuthState {
            user: Some(user.clone()),
            initializing: false,
        });
        log::info!("[auth] signed in as {}", user.uid);
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *lock(&self.remembered) = None;
        self.state.send_modify(|state| {
            state.user = None;
            state.initializing = false;
        });
        log::info!("[auth] signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> User {
        User {
            uid: "u1".to_string(),
            display_name: Some("Ada Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn test_starts_initializing_without_user() {
        let auth = LocalAuthProvider::new(profile());
        assert_eq!(auth.state(), AuthState::default());

        auth.restore().await.unwrap();
        let state = auth.state();
        assert!(!state.initializing);
        assert!(state.user.is_none());
    }

    #[tokio::test]
    async fn test_restore_brings_back_remembered_session() {
        let auth = LocalAuthProvider::new(profile());
        auth.remember(Some(profile()));
        auth.restore().await.unwrap();
        assert_eq!(auth.state().user, Some(profile()));
    }

    #[tokio::test]
    async fn test_sign_in_and_out_publish_state() {
        let auth = LocalAuthProvider::new(profile());
        let mut rx = auth.watch();

        let user = auth.sign_in().await.unwrap();
        assert_eq!(user.uid, "u1");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().user, Some(profile()));

        auth.sign_out().await.unwrap();
        assert!(rx.borrow_and_update().user.is_none());
    }

    #[tokio::test]
    async fn test_rejected_sign_in_keeps_user_absent() {
        let auth = LocalAuthProvider::new(profile());
        auth.restore().await.unwrap();
        auth.set_reject_sign_in(true);

        assert!(matches!(auth.sign_in().await, Err(AuthError::Rejected(_))));
        assert!(auth.state().user.is_none());
    }

    #[test]
    fn test_user_label_and_initials() {
        assert_eq!(profile().label(), "Ada Lovelace");
        assert_eq!(profile().initials(), "AL");

        let anonymous = User {
            uid: "u2".to_string(),
            display_name: None,
            email: None,
            photo_url: None,
        };
        assert_eq!(anonymous.label(), "User");
        assert_eq!(anonymous.initials(), "U");
    }
}
