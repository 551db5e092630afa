//! Cross-view signalling: connection-change broadcasts and user-facing notices.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use log::{debug, error, info};
use tokio::sync::{broadcast, mpsc};

use crate::models::Id;

const EVENT_CAPACITY: usize = 64;

/// Identifies a mounted view so it can ignore its own broadcasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId(u64);

impl ViewId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionChange {
    Accepted(Id),
    Rejected(Id),
    Removed(Id),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionEvent {
    pub origin: ViewId,
    pub change: ConnectionChange,
}

/// Process-wide subject for "connection data changed"
#[derive(Debug, Clone)]
pub struct ConnectionEvents {
    sender: broadcast::Sender<ConnectionEvent>,
}

impl Default for ConnectionEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, origin: ViewId, change: ConnectionChange) {
        debug!("Connection change {:?}", change);
        // nobody listening is fine
        let _ = self.sender.send(ConnectionEvent { origin, change });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.sender.subscribe()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Sending half of the notice queue the front end drains
#[derive(Debug, Clone)]
pub struct Notifier {
    sender: Option<mpsc::UnboundedSender<Notice>>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender: Some(sender) }, receiver)
    }

    /// Notices only go to the log
    pub fn log_only() -> Self {
        Self { sender: None }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    fn push(&self, level: NoticeLevel, message: String) {
        match &self.sender {
            Some(sender) => {
                let _ = sender.send(Notice { level, message });
            }
            None => match level {
                NoticeLevel::Success => info!("{}", message),
                NoticeLevel::Error => error!("{}", message),
            },
        }
    }
}
