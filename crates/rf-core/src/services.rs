//! # Forum Service
//!
//! The use cases callers actually invoke. Each one runs its guards strictly
//! in order and stops at the first failure, then persists.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::aggregate::ThreadAggregator;
use crate::entities::{
    AddedComment, AddedReply, AddedThread, NewComment, NewReply, NewThread, Payload,
};
use crate::error::Result;
use crate::guards::Guards;
use crate::likes::LikeToggle;
use crate::models::{AggregatedThread, LikeState};
use crate::traits::{CommentRepo, LikeRepo, ReplyRepo, ThreadRepo};

/// Store handles a service is built from. One value per storage backend.
#[derive(Clone)]
pub struct Repos {
    pub threads: Arc<dyn ThreadRepo>,
    pub comments: Arc<dyn CommentRepo>,
    pub replies: Arc<dyn ReplyRepo>,
    pub likes: Arc<dyn LikeRepo>,
}

impl Repos {
    /// Uses one store value for all four ports.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ThreadRepo + CommentRepo + ReplyRepo + LikeRepo + 'static,
    {
        Self {
            threads: store.clone(),
            comments: store.clone(),
            replies: store.clone(),
            likes: store,
        }
    }
}

#[derive(Clone)]
pub struct ForumService {
    threads: Arc<dyn ThreadRepo>,
    comments: Arc<dyn CommentRepo>,
    replies: Arc<dyn ReplyRepo>,
    guards: Guards,
    likes: LikeToggle,
    aggregator: ThreadAggregator,
}

fn text<'a>(payload: &'a Payload, key: &str) -> &'a str {
    payload.get(key).and_then(Value::as_str).unwrap_or_default()
}

impl ForumService {
    pub fn new(repos: Repos) -> Self {
        let guards = Guards::new(
            repos.threads.clone(),
            repos.comments.clone(),
            repos.replies.clone(),
        );
        let likes = LikeToggle::new(repos.likes);
        let aggregator = ThreadAggregator::new(
            repos.threads.clone(),
            repos.comments.clone(),
            repos.replies.clone(),
            likes.clone(),
        );
        Self {
            threads: repos.threads,
            comments: repos.comments,
            replies: repos.replies,
            guards,
            likes,
            aggregator,
        }
    }

    /// Expects `title`, `body` and `owner`.
    pub async fn add_thread(&self, payload: &Payload) -> Result<AddedThread> {
        let new_thread = NewThread::from_payload(payload)?;
        let added = self.threads.add_thread(new_thread).await?;
        info!(thread_id = added.id(), owner = added.owner(), "thread added");
        Ok(added)
    }

    /// Expects `content`, `owner` and `threadId`. The thread is checked
    /// before the payload is validated.
    pub async fn add_comment(&self, payload: &Payload) -> Result<AddedComment> {
        self.guards.verify_thread_exists(text(payload, "threadId")).await?;

        let new_comment = NewComment::from_payload(payload)?;
        let added = self.comments.add_comment(new_comment).await?;
        info!(comment_id = added.id(), owner = added.owner(), "comment added");
        Ok(added)
    }

    /// Expects `content`, `owner`, `commentId` and `threadId`. The thread is
    /// checked first, then the comment, then the payload.
    pub async fn add_reply(&self, payload: &Payload) -> Result<AddedReply> {
        self.guards.verify_thread_exists(text(payload, "threadId")).await?;
        self.guards.verify_comment_exists(text(payload, "commentId")).await?;

        let new_reply = NewReply::from_payload(payload)?;
        let added = self.replies.add_reply(new_reply).await?;
        info!(reply_id = added.id(), owner = added.owner(), "reply added");
        Ok(added)
    }

    /// Soft-deletes a comment. Deleting an already deleted comment again
    /// succeeds and leaves it deleted.
    pub async fn delete_comment(&self, comment_id: &str, owner: &str) -> Result<()> {
        self.guards.verify_comment_exists(comment_id).await?;
        self.guards.verify_comment_owner(comment_id, owner).await?;

        self.comments.soft_delete_comment(comment_id).await?;
        info!(comment_id, owner, "comment deleted");
        Ok(())
    }

    pub async fn delete_reply(&self, reply_id: &str, owner: &str) -> Result<()> {
        self.guards.verify_reply_exists(reply_id).await?;
        self.guards.verify_reply_owner(reply_id, owner).await?;

        self.replies.soft_delete_reply(reply_id).await?;
        info!(reply_id, owner, "reply deleted");
        Ok(())
    }

    pub async fn toggle_like(
        &self,
        user_id: &str,
        comment_id: &str,
        thread_id: &str,
    ) -> Result<LikeState> {
        self.guards.verify_thread_exists(thread_id).await?;
        self.guards.verify_comment_exists(comment_id).await?;

        let state = self.likes.toggle(user_id, comment_id).await?;
        info!(user_id, comment_id, ?state, "like toggled");
        Ok(state)
    }

    pub async fn get_aggregated_thread(&self, thread_id: &str) -> Result<AggregatedThread> {
        self.aggregator.get_aggregated_thread(thread_id).await
    }
}
