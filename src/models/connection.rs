use serde::{Deserialize, Serialize};

use super::{user::display_name, Id, UserSummary};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub connection_id: Id,
    pub connected_user_id: Id,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo: Option<String>,
    pub bio: Option<String>,
}

impl Connection {
    /// Builds the list entry from an echoed accept response
    pub fn accepted(connection: AcceptedConnection, user: ConnectedUser) -> Self {
        let ConnectedUser { user, bio } = user;
        Self {
            connection_id: connection.connection_id,
            connected_user_id: user.user_id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            photo: user.photo,
            bio,
        }
    }

    pub fn display_name(&self) -> String {
        display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            &self.username,
        )
    }
}

/// A pending request addressed to the viewer
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectionRequest {
    pub connection_id: Id,
    #[serde(default, alias = "sender_id")]
    pub user_id: Option<Id>,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo: Option<String>,
    pub bio: Option<String>,
}

impl ConnectionRequest {
    pub fn display_name(&self) -> String {
        display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            &self.username,
        )
    }
}

/// Whatever `/connections/accept/{id}` chose to echo back
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct AcceptResponse {
    #[serde(default)]
    pub connection: Option<AcceptedConnection>,
    #[serde(default)]
    pub user: Option<ConnectedUser>,
}

impl AcceptResponse {
    pub fn into_connection(self) -> Option<Connection> {
        match (self.connection, self.user) {
            (Some(connection), Some(user)) => Some(Connection::accepted(connection, user)),
            _ => None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AcceptedConnection {
    pub connection_id: Id,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectedUser {
    #[serde(flatten)]
    pub user: UserSummary,
    pub bio: Option<String>,
}
