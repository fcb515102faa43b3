//! Per-connection metadata tracked by the room registry.

use std::collections::BTreeSet;

use crate::domain::foundation::{AuthenticatedUser, ConnectionId, Timestamp, DEFAULT_ROLE};

use super::Room;

/// Who is behind a connection, as negotiated at connect time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub role: String,
}

impl Identity {
    /// Fallback identity for connections without a valid credential.
    pub fn anonymous(connection_id: &ConnectionId) -> Self {
        Self {
            user_id: format!("anonymous-{}", connection_id),
            role: DEFAULT_ROLE.to_string(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.starts_with("anonymous-")
    }
}

impl From<AuthenticatedUser> for Identity {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.id.to_string(),
            role: user.role,
        }
    }
}

/// A live connection and the rooms it has joined.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    pub identity: Identity,
    pub rooms: BTreeSet<Room>,
    pub connected_at: Timestamp,
}

impl Connection {
    pub fn new(id: ConnectionId, identity: Identity) -> Self {
        Self {
            id,
            identity,
            rooms: BTreeSet::new(),
            connected_at: Timestamp::now(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.identity.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    #[test]
    fn anonymous_identity_embeds_connection_id() {
        let id = ConnectionId::from_string("abc");
        let identity = Identity::anonymous(&id);

        assert_eq!(identity.user_id, "anonymous-abc");
        assert_eq!(identity.role, "viewer");
        assert!(identity.is_anonymous());
    }

    #[test]
    fn authenticated_user_becomes_identity() {
        let user = AuthenticatedUser::new(UserId::new("alice").unwrap(), "analyst");
        let identity = Identity::from(user);

        assert_eq!(identity.user_id, "alice");
        assert_eq!(identity.role, "analyst");
        assert!(!identity.is_anonymous());
    }

    #[test]
    fn new_connection_has_no_rooms() {
        let conn = Connection::new(ConnectionId::new(), Identity::anonymous(&ConnectionId::new()));
        assert!(conn.rooms.is_empty());
    }
}
