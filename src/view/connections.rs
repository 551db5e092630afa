use log::{debug, info, warn};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::{
    context::AppContext,
    error::{Error, Result},
    events::{ConnectionChange, ConnectionEvent},
    models::{Connection, ConnectionRequest, Id},
};

use super::{notify_failure, Mount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionsTab {
    #[default]
    Connections,
    Requests,
}

/// The viewer's connections and pending requests
#[derive(Debug)]
pub struct ConnectionsView {
    ctx: AppContext,
    mount: Mount,
    changes: broadcast::Receiver<ConnectionEvent>,
    connections: Vec<Connection>,
    requests: Vec<ConnectionRequest>,
    tab: ConnectionsTab,
    loading: bool,
}

impl ConnectionsView {
    pub fn new(ctx: AppContext) -> Self {
        let changes = ctx.events.subscribe();
        Self {
            ctx,
            mount: Mount::new(),
            changes,
            connections: Vec::new(),
            requests: Vec::new(),
            tab: ConnectionsTab::default(),
            loading: true,
        }
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }
    pub fn requests(&self) -> &[ConnectionRequest] {
        &self.requests
    }
    pub fn tab(&self) -> ConnectionsTab {
        self.tab
    }
    pub fn set_tab(&mut self, tab: ConnectionsTab) {
        self.tab = tab;
    }
    pub fn is_loading(&self) -> bool {
        self.loading
    }
    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    /// Fetches both lists at once
    pub async fn load(&mut self) -> Result<()> {
        let api = &self.ctx.api;
        let fetch = async { futures::try_join!(api.connections(), api.connection_requests()) };
        let result = self.mount.run(fetch).await;
        if matches!(result, Err(Error::Cancelled)) {
            return Err(Error::Cancelled);
        }
        self.loading = false;

        let (connections, requests) =
            notify_failure(&self.ctx.notifier, result, "Failed to load connections")?;
        debug!(
            "{} connections, {} pending requests",
            connections.len(),
            requests.len()
        );
        self.connections = connections;
        self.requests = requests;
        Ok(())
    }

    pub async fn accept(&mut self, connection_id: Id) -> Result<()> {
        let result = self
            .mount
            .run(self.ctx.api.accept_connection(connection_id))
            .await;
        let echoed = notify_failure(&self.ctx.notifier, result, "Failed to accept request")?;
        self.ctx.notifier.success("Connection accepted");
        info!("Accepted connection {}", connection_id);

        match echoed {
            Some(connection) => {
                self.connections.insert(0, connection);
                self.requests.retain(|r| r.connection_id != connection_id);
                self.tab = ConnectionsTab::Connections;
            }
            None => self.reload().await,
        }
        self.publish(ConnectionChange::Accepted(connection_id));
        Ok(())
    }

    pub async fn reject(&mut self, connection_id: Id) -> Result<()> {
        let result = self
            .mount
            .run(self.ctx.api.reject_connection(connection_id))
            .await;
        notify_failure(&self.ctx.notifier, result, "Failed to reject request")?;
        self.ctx.notifier.success("Request rejected");

        self.reload().await;
        self.publish(ConnectionChange::Rejected(connection_id));
        Ok(())
    }

    /// Removes an existing connection. The caller is expected to have confirmed.
    pub async fn remove(&mut self, user_id: Id) -> Result<()> {
        let result = self
            .mount
            .run(self.ctx.api.remove_connection(user_id))
            .await;
        notify_failure(&self.ctx.notifier, result, "Failed to remove connection")?;
        self.ctx.notifier.success("Connection removed");

        self.reload().await;
        self.publish(ConnectionChange::Removed(user_id));
        Ok(())
    }

    /// Refetches if another view changed connection data since the last call.
    ///
    /// Returns whether a refetch happened.
    pub async fn refresh_if_changed(&mut self) -> Result<bool> {
        let mut changed = false;
        loop {
            match self.changes.try_recv() {
                Ok(event) if event.origin == self.mount.id() => {}
                Ok(_) => changed = true,
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!("Missed {} connection events", skipped);
                    changed = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if changed {
            self.load().await?;
        }
        Ok(changed)
    }

    /// Waits for another view to change connection data, then refetches.
    pub async fn watch(&mut self) -> Result<ConnectionChange> {
        loop {
            let changes = &mut self.changes;
            let received = self
                .mount
                .run(async move { Ok(changes.recv().await) })
                .await?;
            match received {
                Ok(event) if event.origin == self.mount.id() => continue,
                Ok(event) => {
                    self.load().await?;
                    return Ok(event.change);
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return Err(Error::Cancelled),
            }
        }
    }

    async fn reload(&mut self) {
        // a failed refetch has already been reported as a notice
        if let Err(e) = self.load().await {
            warn!("Refetching connections failed: {}", e);
        }
    }

    fn publish(&self, change: ConnectionChange) {
        self.ctx.events.publish(self.mount.id(), change);
    }
}
