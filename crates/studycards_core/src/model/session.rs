//! Authentication session value observed by the navigation gate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a registered user.
pub type UserId = Uuid;

/// Signed-in user identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

/// Current authentication state.
///
/// # Invariants
/// - While `loading` is true the value of `user` carries no meaning for
///   navigation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<Identity>,
    pub loading: bool,
}

impl Session {
    /// Session before the auth provider resolved its initial state.
    pub fn loading() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            user: Some(identity),
            loading: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }
}
