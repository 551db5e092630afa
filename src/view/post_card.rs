use log::info;

use crate::{
    context::AppContext,
    error::{Error, Result},
    models::{Id, LikeResponse, Post},
};

use super::{notify_failure, Mount};

/// One post in a feed with the viewer's local like/save state
#[derive(Debug)]
pub struct PostCard {
    ctx: AppContext,
    mount: Mount,
    post: Post,
    liked: bool,
    like_count: u32,
    saved: bool,
}

impl PostCard {
    pub fn new(ctx: AppContext, post: Post) -> Self {
        Self {
            ctx,
            mount: Mount::new(),
            liked: post.viewer_liked(),
            like_count: post.like_count,
            saved: false,
            post,
        }
    }

    pub fn post(&self) -> &Post {
        &self.post
    }
    pub fn liked(&self) -> bool {
        self.liked
    }
    pub fn like_count(&self) -> u32 {
        self.like_count
    }
    pub fn saved(&self) -> bool {
        self.saved
    }
    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    /// Only the author sees the delete action
    pub fn can_delete(&self) -> bool {
        self.ctx
            .session
            .current_user()
            .is_some_and(|user| user.user_id == self.post.user_id)
    }

    /// Toggles the like. The displayed count follows whichever response is
    /// applied last, not the order the clicks happened in.
    pub async fn like(&mut self) -> Result<bool> {
        let result = self.mount.run(self.ctx.api.like_post(self.post.post_id)).await;
        let LikeResponse { liked } = notify_failure(&self.ctx.notifier, result, "Failed to like")?;

        self.liked = liked;
        self.like_count = if liked {
            self.like_count.saturating_add(1)
        } else {
            self.like_count.saturating_sub(1)
        };
        Ok(liked)
    }

    pub async fn save(&mut self) -> Result<()> {
        let result = self
            .mount
            .run(self.ctx.api.save_to_watchlist(self.post.post_id))
            .await;
        notify_failure(&self.ctx.notifier, result, "Failed to save")?;

        self.saved = true;
        self.ctx.notifier.success("Saved to watchlist");
        Ok(())
    }

    /// Deletes the post. The caller is expected to have confirmed with the viewer.
    pub async fn delete(&mut self) -> Result<()> {
        if !self.can_delete() {
            return Err(Error::Validation(
                "Only the author can delete this post".to_string(),
            ));
        }
        let result = self
            .mount
            .run(self.ctx.api.delete_post(self.post.post_id))
            .await;
        notify_failure(&self.ctx.notifier, result, "Failed to delete")?;

        info!("Deleted post {}", self.post.post_id);
        self.ctx.notifier.success("Post deleted");
        Ok(())
    }
}

/// An ordered list of post cards
#[derive(Debug)]
pub struct Feed {
    ctx: AppContext,
    cards: Vec<PostCard>,
}

impl Feed {
    pub fn new(ctx: AppContext, posts: Vec<Post>) -> Self {
        let cards = posts
            .into_iter()
            .map(|post| PostCard::new(ctx.clone(), post))
            .collect();
        Self { ctx, cards }
    }

    pub fn cards(&self) -> &[PostCard] {
        &self.cards
    }

    pub fn card_mut(&mut self, post_id: Id) -> Option<&mut PostCard> {
        self.cards.iter_mut().find(|c| c.post.post_id == post_id)
    }

    pub fn push(&mut self, post: Post) {
        self.cards.insert(0, PostCard::new(self.ctx.clone(), post));
    }

    /// Deletes through the card and drops it from the feed on success
    pub async fn delete(&mut self, post_id: Id) -> Result<()> {
        let card = self
            .card_mut(post_id)
            .ok_or_else(|| Error::Validation(format!("Post {} is not in this feed", post_id)))?;
        card.delete().await?;
        self.cards.retain(|c| c.post.post_id != post_id);
        Ok(())
    }
}
