//! The same flows against the SQLite store.

use std::sync::Arc;

use integration_tests::payload;
use rf_core::{AppError, ForumService, LikeState, Repos, Resource, DELETED_REPLY_PLACEHOLDER};
use rf_db_sqlite::SqliteForumRepo;
use serde_json::json;

async fn sqlite_forum() -> ForumService {
    let store = SqliteForumRepo::new("sqlite::memory:").await.unwrap();
    store.add_user("user-dicoding", "dicoding").await.unwrap();
    store.add_user("user-budi", "budi").await.unwrap();
    ForumService::new(Repos::from_store(Arc::new(store)))
}

#[tokio::test]
async fn full_thread_lifecycle() {
    let forum = sqlite_forum().await;

    let thread = forum
        .add_thread(&payload(json!({ "title": "judul", "body": "isi", "owner": "user-dicoding" })))
        .await
        .unwrap();
    let thread_id = thread.id().to_string();

    let c1 = forum
        .add_comment(&payload(json!({ "threadId": thread_id, "content": "komentar", "owner": "user-budi" })))
        .await
        .unwrap();
    let c1 = c1.id().to_string();

    let r1 = forum
        .add_reply(&payload(json!({
            "threadId": thread_id,
            "commentId": c1,
            "content": "balasan",
            "owner": "user-dicoding",
        })))
        .await
        .unwrap();
    let r1 = r1.id().to_string();

    assert_eq!(
        forum.toggle_like("user-dicoding", &c1, &thread_id).await.unwrap(),
        LikeState::Liked
    );
    assert_eq!(
        forum.toggle_like("user-budi", &c1, &thread_id).await.unwrap(),
        LikeState::Liked
    );

    let err = forum.delete_reply(&r1, "user-budi").await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(Resource::Reply)));
    forum.delete_reply(&r1, "user-dicoding").await.unwrap();

    let view = forum.get_aggregated_thread(&thread_id).await.unwrap();
    assert_eq!(view.username, "dicoding");
    assert_eq!(view.comments.len(), 1);
    assert_eq!(view.comments[0].username, "budi");
    assert_eq!(view.comments[0].like_count, 2);
    assert_eq!(view.comments[0].replies.len(), 1);
    assert_eq!(view.comments[0].replies[0].content, DELETED_REPLY_PLACEHOLDER);
}

#[tokio::test]
async fn unknown_thread_is_not_found() {
    let forum = sqlite_forum().await;
    let err = forum.get_aggregated_thread("thread-123").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(Resource::Thread)));
}
