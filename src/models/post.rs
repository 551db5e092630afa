use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError, DisplayFromStr, PickFirst};

use super::{user::display_name, Id};

#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Post {
    pub post_id: Id,
    pub user_id: Id,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub video: Option<String>,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub media_type: Option<MediaKind>,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub like_count: u32,
    /// Number of likes the viewer has on this post, zero or one
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub user_liked: u32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub comment_count: u32,
    #[serde_as(as = "DefaultOnError")]
    #[serde(default)]
    pub post_date: Option<DateTime<Utc>>,
    /// Comma separated
    pub tags: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Media<'a> {
    Image(&'a str),
    Video(&'a str),
}

impl Post {
    pub fn id(&self) -> Id {
        self.post_id
    }

    pub fn viewer_liked(&self) -> bool {
        self.user_liked > 0
    }

    pub fn display_name(&self) -> String {
        display_name(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            &self.username,
        )
    }

    pub fn tags(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The attached media, when its reference matches the declared kind
    pub fn media(&self) -> Option<Media<'_>> {
        match self.media_type? {
            MediaKind::Image => self.image.as_deref().map(Media::Image),
            MediaKind::Video => self.video.as_deref().map(Media::Video),
        }
    }

    pub fn time_ago(&self, now: DateTime<Utc>) -> Option<String> {
        self.post_date.map(|date| time_ago(date, now))
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeResponse {
    pub liked: bool,
}

/// Relative time with an "ago" suffix, rounded the way people say it
pub fn time_ago(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - date).num_seconds();
    if seconds < 0 {
        return "just now".to_string();
    }

    let minutes = (seconds as f64 / 60.0).round() as i64;
    let hours = (seconds as f64 / 3600.0).round() as i64;
    let days = (seconds as f64 / 86400.0).round() as i64;

    fn plural(n: i64, unit: &str) -> String {
        if n == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{n} {unit}s ago")
        }
    }

    match seconds {
        s if s < 30 => "less than a minute ago".to_string(),
        s if s < 45 * 60 => plural(minutes.max(1), "minute"),
        s if s < 90 * 60 => "about 1 hour ago".to_string(),
        s if s < 24 * 3600 => format!("about {}", plural(hours, "hour")),
        s if s < 42 * 3600 => plural(1, "day"),
        s if s < 30 * 86400 => plural(days, "day"),
        s if s < 365 * 86400 => plural((days / 30).max(1), "month"),
        _ => format!("about {}", plural((days / 365).max(1), "year")),
    }
}
