use std::sync::Arc;

use crate::{
    api::ApiClient,
    error::Result,
    events::{ConnectionEvents, Notifier},
    session::SessionStore,
    storage::Storage,
};

/// Everything a view is allowed to touch. Views never see storage directly.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub session: SessionStore,
    pub events: ConnectionEvents,
    pub notifier: Notifier,
}

impl AppContext {
    pub fn new(base_url: &str, storage: Arc<dyn Storage>, notifier: Notifier) -> Result<Self> {
        let api = ApiClient::new(base_url, storage.clone())?;
        let session = SessionStore::new(api.clone(), storage);
        Ok(Self {
            api,
            session,
            events: ConnectionEvents::new(),
            notifier,
        })
    }
}
