#![allow(dead_code)]

use std::sync::Arc;

use nexus_client::{
    events::{Notice, Notifier},
    storage::{TOKEN_KEY, USER_KEY},
    AppContext, MemoryStorage,
};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

pub fn user_json(id: i64, username: &str) -> Value {
    json!({
        "user_id": id,
        "username": username,
        "first_name": username.to_uppercase(),
        "last_name": null,
        "photo": null,
    })
}

pub struct TestApp {
    pub server: MockServer,
    pub storage: Arc<MemoryStorage>,
    pub ctx: AppContext,
    pub notices: UnboundedReceiver<Notice>,
}

impl TestApp {
    pub async fn anonymous() -> Self {
        Self::with_storage(MemoryStorage::new()).await
    }

    /// Storage already holds a session for user 1 (`ada`); bootstrap has run
    pub async fn signed_in() -> Self {
        let user = user_json(1, "ada").to_string();
        let storage = MemoryStorage::with(&[(TOKEN_KEY, TOKEN), (USER_KEY, user.as_str())]);
        let app = Self::with_storage(storage).await;
        app.ctx.session.bootstrap();
        app
    }

    async fn with_storage(storage: MemoryStorage) -> Self {
        let server = MockServer::start().await;
        let storage = Arc::new(storage);
        let (notifier, notices) = Notifier::channel();
        let ctx = AppContext::new(&Self::base(&server), storage.clone(), notifier).unwrap();
        Self {
            server,
            storage,
            ctx,
            notices,
        }
    }

    pub fn base(server: &MockServer) -> String {
        format!("{}/api", server.uri())
    }

    /// A second client over the same storage, as after a restart
    pub fn restart(&self) -> AppContext {
        AppContext::new(
            &Self::base(&self.server),
            self.storage.clone(),
            Notifier::log_only(),
        )
        .unwrap()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        let mut notices = Vec::new();
        while let Ok(notice) = self.notices.try_recv() {
            notices.push(notice);
        }
        notices
    }
}
