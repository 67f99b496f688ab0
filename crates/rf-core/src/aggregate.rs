//! # Thread Aggregation
//!
//! Builds the nested view of one thread from four independent reads:
//! the thread, its comments, its replies and its like counts. The merge is
//! done entirely in memory, so a view costs four round trips no matter how
//! many comments the thread has.
//!
//! Deletion never removes a node from the tree. A soft-deleted comment or
//! reply keeps its id, author, date, replies and like count; only its
//! content is swapped for a placeholder.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{AppError, Resource, Result};
use crate::likes::LikeToggle;
use crate::models::{
    AggregatedComment, AggregatedReply, AggregatedThread, CommentRow, ReplyRow, ThreadDetail,
    DELETED_COMMENT_PLACEHOLDER, DELETED_REPLY_PLACEHOLDER,
};
use crate::traits::{CommentRepo, ReplyRepo, ThreadRepo};

#[derive(Clone)]
pub struct ThreadAggregator {
    threads: Arc<dyn ThreadRepo>,
    comments: Arc<dyn CommentRepo>,
    replies: Arc<dyn ReplyRepo>,
    likes: LikeToggle,
}

impl ThreadAggregator {
    pub fn new(
        threads: Arc<dyn ThreadRepo>,
        comments: Arc<dyn CommentRepo>,
        replies: Arc<dyn ReplyRepo>,
        likes: LikeToggle,
    ) -> Self {
        Self { threads, comments, replies, likes }
    }

    /// Fetches and assembles a thread view.
    ///
    /// A missing thread short-circuits before any other read is issued.
    /// The reads are not wrapped in a transaction; a comment deleted between
    /// two of them may show up unmasked in this one view.
    pub async fn get_aggregated_thread(&self, thread_id: &str) -> Result<AggregatedThread> {
        let thread = self
            .threads
            .get_thread(thread_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Thread))?;

        let comments = self.comments.comments_by_thread(thread_id).await?;
        let replies = self.replies.replies_by_thread(thread_id).await?;
        let like_counts = self.likes.counts_by_thread(thread_id).await?;

        debug!(
            thread_id,
            comments = comments.len(),
            replies = replies.len(),
            "assembling thread view"
        );

        Ok(assemble(thread, comments, replies, &like_counts))
    }
}

/// Merges already-fetched collections into one view.
///
/// Comments and replies are stably sorted by date, so rows with equal
/// timestamps keep the order the store returned them in. Replies are
/// grouped by parent comment in a single pass; replies whose parent is not
/// among `comments` are dropped.
pub fn assemble(
    thread: ThreadDetail,
    mut comments: Vec<CommentRow>,
    mut replies: Vec<ReplyRow>,
    like_counts: &HashMap<String, u64>,
) -> AggregatedThread {
    comments.sort_by_key(|c| c.date);
    replies.sort_by_key(|r| r.date);

    let mut replies_by_comment: HashMap<String, Vec<AggregatedReply>> = HashMap::new();
    for reply in replies {
        replies_by_comment
            .entry(reply.comment_id.clone())
            .or_default()
            .push(mask_reply(reply));
    }

    let comments = comments
        .into_iter()
        .map(|comment| {
            let replies = replies_by_comment.remove(&comment.id).unwrap_or_default();
            let like_count = like_counts.get(&comment.id).copied().unwrap_or(0);
            let content = if comment.is_delete {
                DELETED_COMMENT_PLACEHOLDER.to_string()
            } else {
                comment.content
            };
            AggregatedComment {
                id: comment.id,
                username: comment.username,
                date: comment.date,
                content,
                like_count,
                replies,
            }
        })
        .collect();

    AggregatedThread {
        id: thread.id,
        title: thread.title,
        body: thread.body,
        date: thread.date,
        username: thread.username,
        comments,
    }
}

// Masking depends only on the reply's own flag, never on its parent's.
fn mask_reply(reply: ReplyRow) -> AggregatedReply {
    let content = if reply.is_delete {
        DELETED_REPLY_PLACEHOLDER.to_string()
    } else {
        reply.content
    };
    AggregatedReply {
        id: reply.id,
        username: reply.username,
        date: reply.date,
        content,
    }
}
