//! Password re-entry gate for destructive actions.
//!
//! Editing or deleting a record first parks the action in a
//! [`PasswordGate`]. The action is only handed back once the user's password
//! has been verified by the auth service.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::RecordId;

/// Checks a password against the signed-in user's credentials.
#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    /// `Ok(false)` means the password is wrong; `Err` means the check itself
    /// could not be made.
    async fn verify_password(&self, password: &str) -> Result<bool, CoreError>;
}

/// An edit or delete that requires password confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtectedAction {
    Edit { entity: &'static str, id: RecordId },
    Delete { entity: &'static str, id: RecordId },
}

impl ProtectedAction {
    pub fn entity(&self) -> &'static str {
        match self {
            Self::Edit { entity, .. } | Self::Delete { entity, .. } => entity,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Edit { id, .. } | Self::Delete { id, .. } => id,
        }
    }

    /// Prompt text, e.g. `"Delete labourer 65f0a1"`.
    pub fn describe(&self) -> String {
        match self {
            Self::Edit { entity, id } => format!("Edit {entity} {id}"),
            Self::Delete { entity, id } => format!("Delete {entity} {id}"),
        }
    }
}

/// Holds at most one action awaiting password confirmation.
#[derive(Debug)]
pub struct PasswordGate<A> {
    pending: Option<A>,
    error: Option<String>,
}

impl<A> Default for PasswordGate<A> {
    fn default() -> Self {
        Self {
            pending: None,
            error: None,
        }
    }
}

impl<A> PasswordGate<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park an action, replacing (and returning) any previous one.
    pub fn request(&mut self, action: A) -> Option<A> {
        self.error = None;
        self.pending.replace(action)
    }

    pub fn pending(&self) -> Option<&A> {
        self.pending.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.pending.is_some()
    }

    /// Message from the last failed confirmation attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Drop the pending action without running it.
    pub fn cancel(&mut self) -> Option<A> {
        self.error = None;
        self.pending.take()
    }

    /// Verify `password` and release the pending action on success.
    ///
    /// On any failure the action stays pending so the user can retry, and
    /// [`error`](Self::error) describes what went wrong.
    pub async fn confirm<V>(&mut self, password: &str, verifier: &V) -> Result<A, CoreError>
    where
        V: PasswordVerifier + ?Sized,
    {
        if self.pending.is_none() {
            return Err(CoreError::Validation(
                "no action is awaiting confirmation".into(),
            ));
        }
        if password.trim().is_empty() {
            self.error = Some("Password is required".into());
            return Err(CoreError::Validation("password is required".into()));
        }

        match verifier.verify_password(password).await {
            Ok(true) => {
                self.error = None;
                self.pending
                    .take()
                    .ok_or_else(|| CoreError::Internal("pending action vanished".into()))
            }
            Ok(false) => {
                self.error = Some("Incorrect password".into());
                Err(CoreError::Unauthorized("incorrect password".into()))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}
