use reqwest::Method;

use crate::{
    error::Result,
    models::{AuthResponse, Credentials, Registration},
};

use super::ApiClient;

impl ApiClient {
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
        self.fetch_with(Method::POST, "/auth/login", credentials)
            .await
    }

    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse> {
        self.fetch_with(Method::POST, "/auth/register", registration)
            .await
    }
}
