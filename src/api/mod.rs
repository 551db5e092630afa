pub mod auth;
pub mod connections;
pub mod posts;
pub mod users;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use http::Extensions;
use log::{debug, log_enabled, trace, warn};
use reqwest::{
    header::{self, HeaderValue},
    Client, Method, Request, Response,
};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware, Middleware, Next, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{
    error::{Error, Result},
    storage::{Storage, TOKEN_KEY},
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// HTTP client bound to one backend address.
///
/// Requests go out exactly once: there is no retry or timeout layer, so
/// failures reach the caller as [`Error::Transport`] or [`Error::Status`].
#[derive(Clone)]
pub struct ApiClient {
    client: ClientWithMiddleware,
    base: Arc<str>,
}

impl ApiClient {
    pub fn new(base_url: &str, storage: Arc<dyn Storage>) -> Result<Self> {
        // validate once so every joined path is well formed
        Url::parse(base_url)?;
        let client = ClientBuilder::new(Client::new())
            .with(BearerAuth::new(storage))
            .build();
        Ok(Self {
            client,
            base: base_url.trim_end_matches('/').into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    async fn send(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<Response> {
        debug!("{} {}", method, path);
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);
        debug!("{} {} failed with {}", method, path, status);
        Err(Error::Status { status, message })
    }

    async fn body(&self, path: &str, response: Response) -> Result<Vec<u8>> {
        let bytes = response.bytes().await?;
        if log_enabled!(log::Level::Trace) {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => trace!(
                    "{} => {}",
                    path,
                    serde_json::to_string_pretty(&value).unwrap_or_default()
                ),
                Err(_) => trace!("{} => {}", path, String::from_utf8_lossy(&bytes)),
            }
        }
        Ok(bytes.to_vec())
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T> {
        let response = self
            .send(method.clone(), path, self.request(method, path))
            .await?;
        let bytes = self.body(path, response).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn fetch_with<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(method.clone(), path).json(body);
        let response = self.send(method, path, builder).await?;
        let bytes = self.body(path, response).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Decodes the body when there is one that fits `T`, `None` otherwise
    pub(crate) async fn fetch_optional<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<Option<T>> {
        let response = self
            .send(method.clone(), path, self.request(method, path))
            .await?;
        let bytes = self.body(path, response).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(serde_json::from_slice(&bytes).ok())
    }

    /// Sends a request whose response body is ignored
    pub(crate) async fn execute(&self, method: Method, path: &str) -> Result<()> {
        self.send(method.clone(), path, self.request(method, path))
            .await?;
        Ok(())
    }

    pub(crate) async fn execute_with<B>(&self, method: Method, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let builder = self.request(method.clone(), path).json(body);
        self.send(method, path, builder).await?;
        Ok(())
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

/// Attaches `Authorization: Bearer <token>` whenever storage holds a credential
#[derive(Debug, Clone)]
pub struct BearerAuth {
    storage: Arc<dyn Storage>,
}

impl BearerAuth {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    fn credential(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Could not read stored credential: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl Middleware for BearerAuth {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        if let Some(token) = self.credential() {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(reqwest_middleware::Error::middleware)?;
            req.headers_mut().insert(header::AUTHORIZATION, value);
        }
        next.run(req, extensions).await
    }
}
