//! Viewer identity slot owned by the external auth collaborator.

use std::sync::{Arc, PoisonError, RwLock};

use crate::types::UserId;

/// Signed-in identity plus the opaque credential attached to requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Viewer identity.
    pub user: UserId,
    /// Opaque bearer credential.
    pub token: String,
}

/// Shared slot the auth layer signs in and out of.
///
/// Cloning yields another handle to the same slot, so engines and the
/// HTTP catalog observe sign-in state changes immediately.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    slot: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Creates an empty, signed-out store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `session` as the current viewer.
    pub fn sign_in(&self, session: Session) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Clears the current viewer.
    pub fn sign_out(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Current session, if signed in.
    pub fn current(&self) -> Option<Session> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current credential, if signed in.
    pub fn token(&self) -> Option<String> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
    }

    /// True when a viewer is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}
