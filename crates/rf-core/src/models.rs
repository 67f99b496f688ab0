//! # Domain Models
//!
//! Rows as the stores hand them back, plus the nested thread view assembled
//! from them on every read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Shown in place of a soft-deleted comment's content.
pub const DELETED_COMMENT_PLACEHOLDER: &str = "**komentar telah dihapus**";

/// Shown in place of a soft-deleted reply's content.
pub const DELETED_REPLY_PLACEHOLDER: &str = "**balasan telah dihapus**";

/// A thread joined with its owner's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadDetail {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: DateTime<Utc>,
    pub username: String,
}

/// A stored comment. `is_delete` is the only mutable column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRow {
    pub id: String,
    pub content: String,
    pub thread_id: String,
    pub owner: String,
    pub date: DateTime<Utc>,
    pub is_delete: bool,
    pub username: String,
}

/// A stored reply; always attached to a comment, never to another reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyRow {
    pub id: String,
    pub content: String,
    pub comment_id: String,
    pub owner: String,
    pub date: DateTime<Utc>,
    pub is_delete: bool,
    pub username: String,
}

/// Number of likes a single comment has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCount {
    pub comment_id: String,
    pub count: u64,
}

/// Result of toggling a (user, comment) like pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeState {
    Liked,
    Unliked,
}

/// A thread with every comment, reply and like count merged in.
///
/// Built fresh for each read and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedThread {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: DateTime<Utc>,
    pub username: String,
    pub comments: Vec<AggregatedComment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedComment {
    pub id: String,
    pub username: String,
    pub date: DateTime<Utc>,
    /// Raw content, or the placeholder once deleted
    pub content: String,
    pub like_count: u64,
    pub replies: Vec<AggregatedReply>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedReply {
    pub id: String,
    pub username: String,
    pub date: DateTime<Utc>,
    pub content: String,
}
