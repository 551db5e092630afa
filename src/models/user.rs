use serde::{Deserialize, Serialize};

use super::Id;

/// Identity fields echoed back by login, register and user search
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserSummary {
    pub user_id: Id,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserSummary {
    pub fn id(&self) -> Id {
        self.user_id
    }

    /// "First Last" when a first name is known, otherwise the username
    pub fn display_name(&self) -> String {
        display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            &self.username,
        )
    }

    pub fn initial(&self) -> char {
        self.username
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('?')
    }
}

pub(crate) fn display_name(first: Option<&str>, last: Option<&str>, username: &str) -> String {
    match first.filter(|f| !f.is_empty()) {
        Some(first) => format!("{} {}", first, last.unwrap_or_default())
            .trim()
            .to_string(),
        None => username.to_string(),
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// Body returned by `/auth/login` and `/auth/register`
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AuthResponse {
    pub token: String,
    #[serde(flatten)]
    pub user: UserSummary,
}
