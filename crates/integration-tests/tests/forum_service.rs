//! End-to-end use cases over the in-memory store.

use integration_tests::{memory_forum, payload};
use rf_core::{
    AppError, ForumService, LikeState, Resource, ValidationReason, DELETED_COMMENT_PLACEHOLDER,
    DELETED_REPLY_PLACEHOLDER,
};
use serde_json::json;

async fn thread(forum: &ForumService) -> String {
    forum
        .add_thread(&payload(json!({
            "title": "sebuah thread",
            "body": "sebuah body thread",
            "owner": "user-dicoding",
        })))
        .await
        .unwrap()
        .id()
        .to_string()
}

async fn comment(forum: &ForumService, thread_id: &str, owner: &str, content: &str) -> String {
    forum
        .add_comment(&payload(json!({
            "threadId": thread_id,
            "content": content,
            "owner": owner,
        })))
        .await
        .unwrap()
        .id()
        .to_string()
}

async fn reply(
    forum: &ForumService,
    thread_id: &str,
    comment_id: &str,
    owner: &str,
    content: &str,
) -> String {
    forum
        .add_reply(&payload(json!({
            "threadId": thread_id,
            "commentId": comment_id,
            "content": content,
            "owner": owner,
        })))
        .await
        .unwrap()
        .id()
        .to_string()
}

#[tokio::test]
async fn liked_comment_with_one_deleted_reply() {
    let forum = memory_forum();
    let thread_id = thread(&forum).await;
    let c1 = comment(&forum, &thread_id, "user-budi", "komentar pertama").await;
    let r1 = reply(&forum, &thread_id, &c1, "user-dicoding", "balasan pertama").await;
    let r2 = reply(&forum, &thread_id, &c1, "user-sari", "balasan kedua").await;

    forum.toggle_like("user-dicoding", &c1, &thread_id).await.unwrap();
    forum.toggle_like("user-sari", &c1, &thread_id).await.unwrap();
    forum.delete_reply(&r2, "user-sari").await.unwrap();

    let view = forum.get_aggregated_thread(&thread_id).await.unwrap();
    assert_eq!(view.username, "dicoding");
    assert_eq!(view.comments.len(), 1);

    let c = &view.comments[0];
    assert_eq!(c.id, c1);
    assert_eq!(c.username, "budi");
    assert_eq!(c.like_count, 2);
    assert_eq!(c.content, "komentar pertama");

    let replies: Vec<(&str, &str)> = c
        .replies
        .iter()
        .map(|r| (r.id.as_str(), r.content.as_str()))
        .collect();
    assert_eq!(
        replies,
        vec![
            (r1.as_str(), "balasan pertama"),
            (r2.as_str(), DELETED_REPLY_PLACEHOLDER),
        ]
    );
}

#[tokio::test]
async fn deleted_comment_without_replies_or_likes() {
    let forum = memory_forum();
    let thread_id = thread(&forum).await;
    let c2 = comment(&forum, &thread_id, "user-budi", "akan dihapus").await;
    forum.delete_comment(&c2, "user-budi").await.unwrap();

    let view = forum.get_aggregated_thread(&thread_id).await.unwrap();
    let c = &view.comments[0];
    assert_eq!(c.content, DELETED_COMMENT_PLACEHOLDER);
    assert_eq!(c.like_count, 0);
    assert!(c.replies.is_empty());
}

#[tokio::test]
async fn only_the_owner_can_delete_a_comment() {
    let forum = memory_forum();
    let thread_id = thread(&forum).await;
    let c1 = comment(&forum, &thread_id, "user-budi", "punya budi").await;

    let err = forum.delete_comment(&c1, "user-sari").await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(Resource::Comment)));
    let view = forum.get_aggregated_thread(&thread_id).await.unwrap();
    assert_eq!(view.comments[0].content, "punya budi");

    forum.delete_comment(&c1, "user-budi").await.unwrap();
    let view = forum.get_aggregated_thread(&thread_id).await.unwrap();
    assert_eq!(view.comments[0].content, DELETED_COMMENT_PLACEHOLDER);

    // deleting again is a no-op success
    forum.delete_comment(&c1, "user-budi").await.unwrap();
}

#[tokio::test]
async fn only_the_owner_can_delete_a_reply() {
    let forum = memory_forum();
    let thread_id = thread(&forum).await;
    let c1 = comment(&forum, &thread_id, "user-budi", "komentar").await;
    let r1 = reply(&forum, &thread_id, &c1, "user-sari", "punya sari").await;

    let err = forum.delete_reply(&r1, "user-budi").await.unwrap_err();
    assert!(matches!(err, AppError::Authorization(Resource::Reply)));

    forum.delete_reply(&r1, "user-sari").await.unwrap();
    forum.delete_reply(&r1, "user-sari").await.unwrap();

    let view = forum.get_aggregated_thread(&thread_id).await.unwrap();
    let replies = &view.comments[0].replies;
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].id, r1);
    assert_eq!(replies[0].content, DELETED_REPLY_PLACEHOLDER);
}

#[tokio::test]
async fn like_toggles_back_and_forth() {
    let forum = memory_forum();
    let thread_id = thread(&forum).await;
    let c1 = comment(&forum, &thread_id, "user-budi", "suka?").await;

    let first = forum.toggle_like("user-sari", &c1, &thread_id).await.unwrap();
    assert_eq!(first, LikeState::Liked);
    let view = forum.get_aggregated_thread(&thread_id).await.unwrap();
    assert_eq!(view.comments[0].like_count, 1);

    let second = forum.toggle_like("user-sari", &c1, &thread_id).await.unwrap();
    assert_eq!(second, LikeState::Unliked);
    let view = forum.get_aggregated_thread(&thread_id).await.unwrap();
    assert_eq!(view.comments[0].like_count, 0);
}

#[tokio::test]
async fn missing_parents_are_not_found() {
    let forum = memory_forum();

    let err = forum.get_aggregated_thread("thread-nope").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(Resource::Thread)));

    let err = forum
        .add_comment(&payload(json!({ "threadId": "thread-nope", "content": "x", "owner": "user-budi" })))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(Resource::Thread)));

    let thread_id = thread(&forum).await;
    let err = forum
        .add_reply(&payload(json!({
            "threadId": thread_id,
            "commentId": "comment-nope",
            "content": "x",
            "owner": "user-budi",
        })))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(Resource::Comment)));

    let err = forum.delete_reply("reply-nope", "user-budi").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(Resource::Reply)));

    let err = forum
        .toggle_like("user-budi", "comment-nope", &thread_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(Resource::Comment)));
}

#[tokio::test]
async fn bad_payloads_are_rejected_before_writing() {
    let forum = memory_forum();
    let thread_id = thread(&forum).await;

    let err = forum
        .add_comment(&payload(json!({ "threadId": thread_id, "owner": "user-budi" })))
        .await
        .unwrap_err();
    match err {
        AppError::Validation(v) => {
            assert_eq!(v.entity, "NEW_COMMENT");
            assert_eq!(v.reason, ValidationReason::MissingRequiredField);
        }
        other => panic!("unexpected error {other:?}"),
    }

    let err = forum
        .add_thread(&payload(json!({ "title": 123, "body": "b", "owner": "user-budi" })))
        .await
        .unwrap_err();
    match err {
        AppError::Validation(v) => assert_eq!(v.reason, ValidationReason::WrongDataType),
        other => panic!("unexpected error {other:?}"),
    }

    let view = forum.get_aggregated_thread(&thread_id).await.unwrap();
    assert!(view.comments.is_empty());
}

#[tokio::test]
async fn unknown_owner_shows_owner_id_as_username() {
    let forum = memory_forum();
    let thread_id = thread(&forum).await;
    comment(&forum, &thread_id, "user-anon", "siapa aku").await;

    let view = forum.get_aggregated_thread(&thread_id).await.unwrap();
    assert_eq!(view.comments[0].username, "user-anon");
}
