use reqwest::Method;

use crate::{
    error::Result,
    models::{Id, LikeResponse},
};

use super::ApiClient;

impl ApiClient {
    /// Toggles the viewer's like, returning whether the post is now liked
    pub async fn like_post(&self, post_id: Id) -> Result<LikeResponse> {
        self.fetch(Method::POST, &format!("/posts/{}/like", post_id))
            .await
    }

    pub async fn save_to_watchlist(&self, post_id: Id) -> Result<()> {
        self.execute(Method::POST, &format!("/posts/{}/watchlist", post_id))
            .await
    }

    pub async fn delete_post(&self, post_id: Id) -> Result<()> {
        self.execute(Method::DELETE, &format!("/posts/{}", post_id))
            .await
    }
}
