use reqwest::Method;

use crate::{
    error::Result,
    models::{AcceptResponse, Connection, ConnectionRequest, Id},
};

use super::ApiClient;

impl ApiClient {
    pub async fn connections(&self) -> Result<Vec<Connection>> {
        self.fetch(Method::GET, "/connections/my-connections").await
    }

    pub async fn connection_requests(&self) -> Result<Vec<ConnectionRequest>> {
        self.fetch(Method::GET, "/connections/requests").await
    }

    /// `None` when the backend did not echo the new connection back
    pub async fn accept_connection(&self, connection_id: Id) -> Result<Option<Connection>> {
        let response: Option<AcceptResponse> = self
            .fetch_optional(Method::POST, &format!("/connections/accept/{}", connection_id))
            .await?;
        Ok(response.and_then(AcceptResponse::into_connection))
    }

    pub async fn reject_connection(&self, connection_id: Id) -> Result<()> {
        self.execute(
            Method::DELETE,
            &format!("/connections/reject/{}", connection_id),
        )
        .await
    }

    pub async fn remove_connection(&self, user_id: Id) -> Result<()> {
        self.execute(Method::DELETE, &format!("/connections/remove/{}", user_id))
            .await
    }
}
