use log::info;

use crate::models::{Connection, ConnectionRequest, UserSummary};

/// Logs a table of users, sorted by username
pub fn display_users(users: &[UserSummary]) {
    if log::log_enabled!(log::Level::Info) {
        let mut users = users.to_vec();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        let rows: Vec<(String, String, String)> = users
            .iter()
            .map(|u| (u.user_id.to_string(), u.username.clone(), u.display_name()))
            .collect();
        display_table(("Id", "Username", "Name"), &rows);
    }
}

pub fn display_connections(connections: &[Connection]) {
    if log::log_enabled!(log::Level::Info) {
        let rows: Vec<(String, String, String)> = connections
            .iter()
            .map(|c| {
                (
                    c.connected_user_id.to_string(),
                    c.username.clone(),
                    c.display_name(),
                )
            })
            .collect();
        display_table(("UserId", "Username", "Name"), &rows);
    }
}

pub fn display_requests(requests: &[ConnectionRequest]) {
    if log::log_enabled!(log::Level::Info) {
        let rows: Vec<(String, String, String)> = requests
            .iter()
            .map(|r| {
                (
                    r.connection_id.to_string(),
                    r.username.clone(),
                    r.display_name(),
                )
            })
            .collect();
        display_table(("RequestId", "Username", "Name"), &rows);
    }
}

fn display_table(header: (&str, &str, &str), rows: &[(String, String, String)]) {
    if rows.is_empty() {
        info!("(none)");
        info!("");
        return;
    }

    let (mut id_width, mut name_width) = (header.0.len() + 2, header.1.len() + 2);
    for (id, username, _) in rows {
        id_width = id.len().max(id_width);
        name_width = username.len().max(name_width);
    }

    info!(
        "+-{:-<id_width$}-+-{:-<name_width$}-+-{}------- - -",
        format!(" {} ", header.0),
        format!(" {} ", header.1),
        format!(" {} ", header.2)
    );
    for (id, username, name) in rows {
        info!("| {:id_width$} | {:name_width$} | {}", id, username, name);
    }
    info!(
        "+-{}-+-{}-+------------ - -",
        "-".repeat(id_width),
        "-".repeat(name_width)
    );
    info!("");
}
