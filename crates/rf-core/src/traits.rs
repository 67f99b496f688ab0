//! # Core Traits (Ports)
//!
//! Any storage or identity plugin must implement these traits to be used by
//! the binary. Store methods perform exactly one read or write each; the
//! policy built on top of them lives in the guards and use cases.

use async_trait::async_trait;

use crate::entities::{AddedComment, AddedReply, AddedThread, NewComment, NewReply, NewThread};
use crate::models::{CommentRow, LikeCount, ReplyRow, ThreadDetail};

/// Persistence contract for threads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepo: Send + Sync {
    async fn add_thread(&self, new_thread: NewThread) -> anyhow::Result<AddedThread>;
    /// Thread joined with its owner's username.
    async fn get_thread(&self, id: &str) -> anyhow::Result<Option<ThreadDetail>>;
    async fn thread_exists(&self, id: &str) -> anyhow::Result<bool>;
}

/// Persistence contract for comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepo: Send + Sync {
    async fn add_comment(&self, new_comment: NewComment) -> anyhow::Result<AddedComment>;
    /// All comments of a thread, oldest first, deleted ones included.
    async fn comments_by_thread(&self, thread_id: &str) -> anyhow::Result<Vec<CommentRow>>;
    async fn comment_exists(&self, id: &str) -> anyhow::Result<bool>;
    /// True only if a row matches both the id and the owner.
    async fn comment_owned_by(&self, id: &str, owner: &str) -> anyhow::Result<bool>;
    /// Sets `is_delete`; the row itself is kept.
    async fn soft_delete_comment(&self, id: &str) -> anyhow::Result<()>;
}

/// Persistence contract for replies.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ReplyRepo: Send + Sync {
    async fn add_reply(&self, new_reply: NewReply) -> anyhow::Result<AddedReply>;
    /// All replies under any comment of the thread, oldest first.
    async fn replies_by_thread(&self, thread_id: &str) -> anyhow::Result<Vec<ReplyRow>>;
    async fn reply_exists(&self, id: &str) -> anyhow::Result<bool>;
    async fn reply_owned_by(&self, id: &str, owner: &str) -> anyhow::Result<bool>;
    async fn soft_delete_reply(&self, id: &str) -> anyhow::Result<()>;
}

/// Persistence contract for the (comment, user) like set.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait LikeRepo: Send + Sync {
    async fn is_liked(&self, user_id: &str, comment_id: &str) -> anyhow::Result<bool>;
    /// Inserting an existing pair is a no-op.
    async fn like(&self, user_id: &str, comment_id: &str) -> anyhow::Result<()>;
    async fn unlike(&self, user_id: &str, comment_id: &str) -> anyhow::Result<()>;
    async fn like_counts_by_thread(&self, thread_id: &str) -> anyhow::Result<Vec<LikeCount>>;
}

/// Identity contract. Resolves a caller's bearer token to a user id.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Returns `None` when the token is malformed or not genuine.
    async fn authenticate(&self, token: &str) -> anyhow::Result<Option<String>>;
}
