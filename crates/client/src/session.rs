//! Signed-in session state and session events.
//!
//! A [`Session`] holds the bearer token attached to every request and the
//! signed-in user. Changes are fanned out as [`SessionEvent`]s over a
//! `tokio::sync::broadcast` channel so a front end can react to a forced
//! logout.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use sitebook_core::roles::Role;
use sitebook_core::types::RecordId;
use tokio::sync::broadcast;

/// Default buffer capacity for the session event channel.
const DEFAULT_CAPACITY: usize = 16;

/// The user returned by the auth service on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(rename = "_id", alias = "id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "unknown_role")]
    pub role: Role,
}

fn unknown_role() -> Role {
    Role::Unknown
}

/// Something that happened to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { user_id: RecordId, role: Role },
    LoggedOut,
    /// The API rejected the token; the session was cleared.
    Expired,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<AuthUser>,
    /// Role restored alongside a token when no user record is held.
    role: Option<Role>,
}

/// Shared session, usually held as `Arc<Session>` by every service.
pub struct Session {
    state: RwLock<SessionState>,
    sender: broadcast::Sender<SessionEvent>,
}

impl Session {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CAPACITY);
        Self {
            state: RwLock::new(SessionState::default()),
            sender,
        }
    }

    /// Start with a token obtained elsewhere (e.g. from configuration).
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.write().token = Some(token.into());
        session
    }

    /// Restore a session persisted by an earlier sign-in: the token and the
    /// role the API reported for it.
    pub fn restore(token: impl Into<String>, role: Option<Role>) -> Self {
        let session = Self::with_token(token);
        session.write().role = role;
        session
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<AuthUser> {
        self.read().user.clone()
    }

    /// Role of the signed-in user, falling back to a restored role.
    /// [`Role::Unknown`] when neither is known.
    pub fn role(&self) -> Role {
        let state = self.read();
        match (&state.user, state.role) {
            (Some(user), _) => user.role,
            (None, Some(role)) => role,
            (None, None) => Role::Unknown,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn sign_in(&self, token: String, user: AuthUser) {
        let event = SessionEvent::LoggedIn {
            user_id: user.id.clone(),
            role: user.role,
        };
        {
            let mut state = self.write();
            state.token = Some(token);
            state.user = Some(user);
        }
        self.publish(event);
    }

    pub fn sign_out(&self) {
        self.clear();
        self.publish(SessionEvent::LoggedOut);
    }

    /// Clear the session after the API rejected the token.
    pub fn expire(&self) {
        let had_token = self.clear();
        if had_token {
            tracing::warn!("Session token rejected by API, signing out");
            self.publish(SessionEvent::Expired);
        }
    }

    fn clear(&self) -> bool {
        let mut state = self.write();
        state.user = None;
        state.role = None;
        state.token.take().is_some()
    }

    fn publish(&self, event: SessionEvent) {
        // Ignore the SendError: it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("role", &self.role())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: "u1".into(),
            name: Some("Asha".into()),
            email: None,
            role,
        }
    }

    #[test]
    fn sign_in_sets_token_and_publishes() {
        let session = Session::new();
        let mut rx = session.subscribe();
        session.sign_in("tok".into(), user(Role::Manager));

        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.role(), Role::Manager);
        assert_eq!(
            rx.try_recv().unwrap(),
            SessionEvent::LoggedIn {
                user_id: "u1".into(),
                role: Role::Manager
            }
        );
    }

    #[test]
    fn expire_clears_once() {
        let session = Session::with_token("tok");
        let mut rx = session.subscribe();
        session.expire();
        session.expire();

        assert!(!session.is_authenticated());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Expired);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sign_out_publishes_even_without_token() {
        let session = Session::new();
        let mut rx = session.subscribe();
        session.sign_out();
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::LoggedOut);
        assert_eq!(session.role(), Role::Unknown);
    }

    #[test]
    fn debug_hides_token() {
        let session = Session::with_token("super-secret");
        assert!(!format!("{session:?}").contains("super-secret"));
    }

    #[test]
    fn auth_user_defaults_unknown_role() {
        let user: AuthUser = serde_json::from_str(r#"{"_id":"u1"}"#).unwrap();
        assert_eq!(user.role, Role::Unknown);
    }

    #[test]
    fn auth_user_role_ignores_case() {
        let user: AuthUser = serde_json::from_str(r#"{"_id":"u1","role":"Admin"}"#).unwrap();
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn restored_role_lasts_until_expiry() {
        let session = Session::restore("tok", Some(Role::Supervisor));
        assert!(session.user().is_none());
        assert_eq!(session.role(), Role::Supervisor);

        session.expire();
        assert_eq!(session.role(), Role::Unknown);
    }
}
