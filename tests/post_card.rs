use nexus_client::{
    events::NoticeLevel,
    models::Post,
    view::{Feed, PostCard},
    Error,
};
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

mod common;
use common::TestApp;

fn post(id: i64, author: i64, liked: bool, likes: u32) -> Post {
    serde_json::from_value(json!({
        "post_id": id,
        "user_id": author,
        "username": "ada",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "content": "Notes on the engine",
        "like_count": likes.to_string(),
        "user_liked": if liked { "1" } else { "0" },
        "comment_count": "2",
        "post_date": "2024-05-01T12:00:00.000Z",
        "tags": "math, engines",
    }))
    .unwrap()
}

#[tokio::test]
async fn like_applies_response_and_failed_unlike_changes_nothing() {
    let mut app = TestApp::signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/posts/7/like"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "liked": true })))
        .up_to_n_times(1)
        .mount(&app.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/posts/7/like"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.server)
        .await;

    let mut card = PostCard::new(app.ctx.clone(), post(7, 2, false, 5));
    assert!(!card.liked());
    assert_eq!(card.like_count(), 5);

    assert!(card.like().await.unwrap());
    assert!(card.liked());
    assert_eq!(card.like_count(), 6);
    assert!(app.drain_notices().is_empty());

    assert!(card.like().await.is_err());
    assert!(card.liked());
    assert_eq!(card.like_count(), 6);
    let notices = app.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "Failed to like");
}

#[tokio::test]
async fn unlike_decrements() {
    let app = TestApp::signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/posts/7/like"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "liked": false })))
        .mount(&app.server)
        .await;

    let mut card = PostCard::new(app.ctx.clone(), post(7, 2, true, 3));
    assert!(card.liked());
    assert!(!card.like().await.unwrap());
    assert_eq!(card.like_count(), 2);
}

#[tokio::test]
async fn save_marks_card_and_notifies() {
    let mut app = TestApp::signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/posts/7/watchlist"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.server)
        .await;

    let mut card = PostCard::new(app.ctx.clone(), post(7, 2, false, 0));
    card.save().await.unwrap();
    assert!(card.saved());
    assert_eq!(app.drain_notices()[0].message, "Saved to watchlist");
}

#[tokio::test]
async fn only_the_author_deletes() {
    let app = TestApp::signed_in().await;
    Mock::given(method("DELETE"))
        .and(path("/api/posts/8"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.server)
        .await;

    // user 1 is signed in
    let mut feed = Feed::new(app.ctx.clone(), vec![post(7, 2, false, 0), post(8, 1, false, 0)]);
    assert!(!feed.cards()[0].can_delete());
    assert!(feed.cards()[1].can_delete());

    assert!(matches!(feed.delete(7).await, Err(Error::Validation(_))));
    feed.delete(8).await.unwrap();
    let left: Vec<i64> = feed.cards().iter().map(|c| c.post().post_id).collect();
    assert_eq!(left, vec![7]);
}

#[tokio::test]
async fn unmounted_card_ignores_late_response() {
    let app = TestApp::signed_in().await;
    Mock::given(method("POST"))
        .and(path("/api/posts/7/like"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "liked": true })))
        .mount(&app.server)
        .await;

    let mut card = PostCard::new(app.ctx.clone(), post(7, 2, false, 5));
    card.mount().unmount();
    assert!(matches!(card.like().await, Err(Error::Cancelled)));
    assert!(!card.liked());
    assert_eq!(card.like_count(), 5);
}

#[test]
fn card_presentation() {
    let post = post(7, 2, false, 5);
    assert_eq!(post.display_name(), "Ada Lovelace");
    assert_eq!(post.tags(), vec!["math", "engines"]);
    assert_eq!(post.comment_count, 2);
    assert!(post.post_date.is_some());
}
