//! Session

use thiserror::Error;

use crate::ids::TypedId;

/// User row marker.
#[derive(Debug)]
pub struct UserRecord;

/// User id
pub type UserId = TypedId<UserRecord>;

/// The action needs a signed-in user.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("please sign in to continue")]
pub struct AuthenticationRequired;

/// Who is using the storefront.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<UserId>,
}

impl Session {
    /// Session with no signed-in user.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session for a signed-in user.
    pub fn authenticated(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    /// The signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthenticationRequired`] for anonymous sessions.
    pub fn require_user(&self) -> Result<&UserId, AuthenticationRequired> {
        self.user.as_ref().ok_or(AuthenticationRequired)
    }
}

impl From<Option<UserId>> for Session {
    fn from(user: Option<UserId>) -> Self {
        Self { user }
    }
}
