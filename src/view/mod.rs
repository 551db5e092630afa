//! View models: per-screen state bound to the API, with no rendering.

pub mod connections;
pub mod post_card;
pub mod profile;

pub use connections::{ConnectionsTab, ConnectionsView};
pub use post_card::{Feed, PostCard};
pub use profile::{EditProfile, ProfileTab};

use std::future::Future;

use log::debug;
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Error, Result},
    events::{Notifier, ViewId},
};

/// Lifetime of a mounted view. Dropping it unmounts.
#[derive(Debug)]
pub struct Mount {
    id: ViewId,
    token: CancellationToken,
}

/// Lets another task unmount a view it does not own
#[derive(Debug, Clone)]
pub struct MountHandle(CancellationToken);

impl MountHandle {
    pub fn unmount(&self) {
        self.0.cancel();
    }
}

impl Default for Mount {
    fn default() -> Self {
        Self::new()
    }
}

impl Mount {
    pub fn new() -> Self {
        Self {
            id: ViewId::next(),
            token: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn handle(&self) -> MountHandle {
        MountHandle(self.token.clone())
    }

    pub fn unmount(&self) {
        self.token.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Runs `operation` unless the view goes away first. A result that
    /// arrives after unmount is discarded as [`Error::Cancelled`].
    pub async fn run<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
        if self.token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(Error::Cancelled),
            result = operation => {
                if self.token.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                result
            }
        }
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Turns a failed action into a generic notice. Cancellation stays silent.
pub(crate) fn notify_failure<T>(notifier: &Notifier, result: Result<T>, message: &str) -> Result<T> {
    if let Err(e) = &result {
        if !matches!(e, Error::Cancelled) {
            debug!("{}: {}", message, e);
            notifier.error(message);
        }
    }
    result
}
