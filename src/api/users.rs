use async_trait::async_trait;
use reqwest::Method;

use crate::{
    error::Result,
    models::{Certification, Education, Id, Profile, ProfileDetails, UserSummary},
    search::UserSearch,
};

use super::ApiClient;

impl ApiClient {
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>> {
        let path = format!("/users/search/{}", urlencoding::encode(query));
        self.fetch(Method::GET, &path).await
    }

    pub async fn user(&self, user_id: Id) -> Result<Profile> {
        self.fetch(Method::GET, &format!("/users/{}", user_id)).await
    }

    pub async fn update_profile(&self, details: &ProfileDetails) -> Result<()> {
        self.execute_with(Method::PUT, "/users/profile/update", details)
            .await
    }

    pub async fn update_education(&self, education: &Education) -> Result<()> {
        self.execute_with(Method::POST, "/users/education", education)
            .await
    }

    pub async fn add_certification(&self, certification: &Certification) -> Result<()> {
        self.execute_with(Method::POST, "/users/certifications", certification)
            .await
    }
}

#[async_trait]
impl UserSearch for ApiClient {
    async fn search(&self, query: &str) -> Result<Vec<UserSummary>> {
        self.search_users(query).await
    }
}
