//! Who is using the client right now.
//!
//! [`SessionStore`] is the only writer of the persisted credential and user
//! record. The in-memory [`SessionState`] mirrors storage and is rehydrated
//! once, by [`SessionStore::bootstrap`].

use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::{
    api::ApiClient,
    error::Result,
    models::{AuthResponse, Credentials, Registration, UserSummary},
    storage::{Storage, TOKEN_KEY, USER_KEY},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    credential: String,
    user: UserSummary,
}

impl Session {
    pub fn credential(&self) -> &str {
        &self.credential
    }
    pub fn user(&self) -> &UserSummary {
        &self.user
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Storage has not been read yet
    #[default]
    Loading,
    Anonymous,
    Authenticated(Session),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
    pub fn user(&self) -> Option<&UserSummary> {
        match self {
            Self::Authenticated(session) => Some(&session.user),
            _ => None,
        }
    }
    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    api: ApiClient,
    storage: Arc<dyn Storage>,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionStore {
    pub fn new(api: ApiClient, storage: Arc<dyn Storage>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            api,
            storage,
            state: Arc::new(state),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<UserSummary> {
        self.state.borrow().user().cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Restores the persisted session. Only the first call reads storage.
    pub fn bootstrap(&self) -> SessionState {
        if !self.state.borrow().is_loading() {
            debug!("Session already bootstrapped");
            return self.state();
        }

        let restored = match self.read_persisted() {
            Some(session) => {
                info!("Restored session for {}", session.user.username);
                SessionState::Authenticated(session)
            }
            None => SessionState::Anonymous,
        };

        // login may have raced ahead of us; it already ended loading
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                *state = restored;
                true
            } else {
                false
            }
        });
        self.state()
    }

    fn read_persisted(&self) -> Option<Session> {
        let read = |key| match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not read `{}` from storage: {}", key, e);
                None
            }
        };

        let credential = read(TOKEN_KEY).filter(|t| !t.is_empty());
        let user = read(USER_KEY);
        match (credential, user) {
            (Some(credential), Some(user)) => match serde_json::from_str(&user) {
                Ok(user) => Some(Session { credential, user }),
                Err(e) => {
                    warn!("Ignoring unreadable stored user: {}", e);
                    None
                }
            },
            (Some(_), None) | (None, Some(_)) => {
                warn!("Ignoring partial stored session");
                None
            }
            (None, None) => None,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserSummary> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&credentials).await?;
        self.establish(response)
    }

    pub async fn register(&self, registration: &Registration) -> Result<UserSummary> {
        let response = self.api.register(registration).await?;
        self.establish(response)
    }

    fn establish(&self, response: AuthResponse) -> Result<UserSummary> {
        let AuthResponse { token, user } = response;
        let record = serde_json::to_string(&user)?;

        let previous = self.storage.get(TOKEN_KEY)?;
        self.storage.set(TOKEN_KEY, &token)?;
        if let Err(e) = self.storage.set(USER_KEY, &record) {
            // the failed write left the previous user record in place
            let restored = match &previous {
                Some(previous) => self.storage.set(TOKEN_KEY, previous),
                None => self.storage.remove(TOKEN_KEY),
            };
            if let Err(e) = restored {
                warn!("Could not roll back stored credential: {}", e);
            }
            return Err(e.into());
        }

        info!("Signed in as {}", user.username);
        self.state.send_replace(SessionState::Authenticated(Session {
            credential: token,
            user: user.clone(),
        }));
        Ok(user)
    }

    pub fn logout(&self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!("Could not remove `{}` from storage: {}", TOKEN_KEY, e);
            // a blank credential is never sent nor restored
            if let Err(e) = self.storage.set(TOKEN_KEY, "") {
                warn!("Could not blank `{}` in storage: {}", TOKEN_KEY, e);
            }
        }
        if let Err(e) = self.storage.remove(USER_KEY) {
            warn!("Could not remove `{}` from storage: {}", USER_KEY, e);
        }
        info!("Signed out");
        self.state.send_replace(SessionState::Anonymous);
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::storage::MemoryStorage;

    const USER: &str = r#"{"user_id":1,"username":"ada","first_name":"Ada","last_name":null,"photo":null}"#;

    fn store(storage: MemoryStorage) -> SessionStore {
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let api = ApiClient::new("http://127.0.0.1:9", storage.clone()).unwrap();
        SessionStore::new(api, storage)
    }

    #[test]
    fn starts_loading() {
        let store = store(MemoryStorage::new());
        assert!(store.state().is_loading());
    }

    #[test]
    fn bootstrap_restores_complete_session() {
        let store = store(MemoryStorage::with(&[(TOKEN_KEY, "tok"), (USER_KEY, USER)]));
        let state = store.bootstrap();
        assert!(!state.is_loading());
        let user = state.user().unwrap();
        assert_eq!(user.user_id, 1);
        assert_eq!(user.username, "ada");
        match state {
            SessionState::Authenticated(session) => assert_eq!(session.credential(), "tok"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn bootstrap_rejects_partial_session() {
        for entries in [[(TOKEN_KEY, "tok")], [(USER_KEY, USER)]] {
            let store = store(MemoryStorage::with(&entries));
            assert_eq!(store.bootstrap(), SessionState::Anonymous);
        }
    }

    #[test]
    fn bootstrap_rejects_garbled_user() {
        let store = store(MemoryStorage::with(&[(TOKEN_KEY, "tok"), (USER_KEY, "{")]));
        assert_eq!(store.bootstrap(), SessionState::Anonymous);
    }

    #[test]
    fn bootstrap_runs_once() {
        let storage = Arc::new(MemoryStorage::new());
        let api = ApiClient::new("http://127.0.0.1:9", storage.clone()).unwrap();
        let store = SessionStore::new(api, storage.clone());
        let mut updates = store.subscribe();

        assert_eq!(store.bootstrap(), SessionState::Anonymous);
        assert!(updates.has_changed().unwrap());
        updates.borrow_and_update();

        // later writes to storage are not picked up again
        storage.set(TOKEN_KEY, "tok").unwrap();
        storage.set(USER_KEY, USER).unwrap();
        assert_eq!(store.bootstrap(), SessionState::Anonymous);
        assert!(!updates.has_changed().unwrap());
    }

    #[test]
    fn logout_clears_everything() {
        let storage = Arc::new(MemoryStorage::with(&[(TOKEN_KEY, "tok"), (USER_KEY, USER)]));
        let api = ApiClient::new("http://127.0.0.1:9", storage.clone()).unwrap();
        let store = SessionStore::new(api, storage.clone());
        store.bootstrap();

        store.logout();
        assert_eq!(store.state(), SessionState::Anonymous);
        assert!(storage.is_empty());
    }

    /// Memory storage where writes or removals of some keys fail
    #[derive(Debug, Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        failing_set: Vec<&'static str>,
        failing_remove: Vec<&'static str>,
    }

    impl Storage for FlakyStorage {
        fn get(&self, key: &str) -> io::Result<Option<String>> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> io::Result<()> {
            if self.failing_set.contains(&key) {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> io::Result<()> {
            if self.failing_remove.contains(&key) {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.inner.remove(key)
        }
    }

    fn flaky_store(storage: FlakyStorage) -> (SessionStore, Arc<FlakyStorage>) {
        let storage = Arc::new(storage);
        let api = ApiClient::new("http://127.0.0.1:9", storage.clone()).unwrap();
        (SessionStore::new(api, storage.clone()), storage)
    }

    fn response(token: &str) -> AuthResponse {
        serde_json::from_value(serde_json::json!({
            "token": token,
            "user_id": 2,
            "username": "bob",
            "first_name": null,
            "last_name": null,
            "photo": null,
        }))
        .unwrap()
    }

    #[test]
    fn failed_user_write_restores_previous_credential() {
        let (store, storage) = flaky_store(FlakyStorage {
            inner: MemoryStorage::with(&[(TOKEN_KEY, "old"), (USER_KEY, USER)]),
            failing_set: vec![USER_KEY],
            ..Default::default()
        });
        let before = store.bootstrap();

        assert!(matches!(
            store.establish(response("new")),
            Err(crate::Error::Storage(_))
        ));
        assert_eq!(store.state(), before);
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("old"));
        assert_eq!(storage.get(USER_KEY).unwrap().as_deref(), Some(USER));
    }

    #[test]
    fn failed_user_write_without_previous_session_leaves_nothing() {
        let (store, storage) = flaky_store(FlakyStorage {
            failing_set: vec![USER_KEY],
            ..Default::default()
        });
        store.bootstrap();

        assert!(store.establish(response("new")).is_err());
        assert_eq!(store.state(), SessionState::Anonymous);
        assert!(storage.inner.is_empty());
    }

    #[test]
    fn logout_blanks_credential_it_cannot_remove() {
        let (store, storage) = flaky_store(FlakyStorage {
            inner: MemoryStorage::with(&[(TOKEN_KEY, "tok"), (USER_KEY, USER)]),
            failing_remove: vec![TOKEN_KEY],
            ..Default::default()
        });
        store.bootstrap();

        store.logout();
        assert_eq!(store.state(), SessionState::Anonymous);
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some(""));
        assert_eq!(storage.get(USER_KEY).unwrap(), None);

        // the next start sees no session
        let (restarted, _) = flaky_store(FlakyStorage {
            inner: MemoryStorage::with(&[(TOKEN_KEY, "")]),
            ..Default::default()
        });
        assert_eq!(restarted.bootstrap(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn failed_login_keeps_previous_session() {
        let storage = Arc::new(MemoryStorage::with(&[(TOKEN_KEY, "tok"), (USER_KEY, USER)]));
        // nothing listens on the discard port
        let api = ApiClient::new("http://127.0.0.1:9", storage.clone()).unwrap();
        let store = SessionStore::new(api, storage.clone());
        let before = store.bootstrap();

        assert!(store.login("bob@example.com", "pw").await.is_err());
        assert_eq!(store.state(), before);
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok"));
    }
}
