//! Session state for a logged-in actor

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::token::Role;

/// Session data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// The opaque bearer token
    pub token: String,

    /// The login identifier, typically an email
    pub username: String,

    /// The normalized role
    pub role: Role,

    /// Expiry in seconds since epoch, from the `exp` claim
    pub expires_at: Option<i64>,
}

impl Session {
    /// Create a new session
    pub fn new(token: String, username: String, role: Role, expires_at: Option<i64>) -> Self {
        Self {
            token,
            username,
            role,
            expires_at,
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }

    /// True for an administrator session
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// True for a technician session
    pub fn is_tecnico(&self) -> bool {
        self.role == Role::Tecnico
    }

    /// True for a client session
    pub fn is_cliente(&self) -> bool {
        self.role == Role::Cliente
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role, expires_at: Option<i64>) -> Session {
        Session::new("tok".into(), "ana@x.com".into(), role, expires_at)
    }

    #[test]
    fn exactly_one_flag_per_role() {
        for (role, flags) in [
            (Role::Admin, [true, false, false]),
            (Role::Tecnico, [false, true, false]),
            (Role::Cliente, [false, false, true]),
        ] {
            let s = session(role, None);
            assert_eq!([s.is_admin(), s.is_tecnico(), s.is_cliente()], flags);
        }
    }

    #[test]
    fn expiry_in_the_past_is_expired() {
        assert!(session(Role::Cliente, Some(0)).is_expired());
        assert!(!session(Role::Cliente, Some(i64::MAX)).is_expired());
        assert!(!session(Role::Cliente, None).is_expired());
    }
}
