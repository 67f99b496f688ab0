//! Existence and ownership guards.
//!
//! Each guard issues exactly one read against the store and turns a negative
//! answer into the matching error. Guards hold no state beyond the store
//! handles, so use cases compose them freely.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{AppError, Resource, Result};
use crate::traits::{CommentRepo, ReplyRepo, ThreadRepo};

#[derive(Clone)]
pub struct Guards {
    threads: Arc<dyn ThreadRepo>,
    comments: Arc<dyn CommentRepo>,
    replies: Arc<dyn ReplyRepo>,
}

impl Guards {
    pub fn new(
        threads: Arc<dyn ThreadRepo>,
        comments: Arc<dyn CommentRepo>,
        replies: Arc<dyn ReplyRepo>,
    ) -> Self {
        Self { threads, comments, replies }
    }

    pub async fn verify_thread_exists(&self, thread_id: &str) -> Result<()> {
        debug!(thread_id, "verifying thread exists");
        if self.threads.thread_exists(thread_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(Resource::Thread))
        }
    }

    pub async fn verify_comment_exists(&self, comment_id: &str) -> Result<()> {
        debug!(comment_id, "verifying comment exists");
        if self.comments.comment_exists(comment_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(Resource::Comment))
        }
    }

    pub async fn verify_reply_exists(&self, reply_id: &str) -> Result<()> {
        debug!(reply_id, "verifying reply exists");
        if self.replies.reply_exists(reply_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(Resource::Reply))
        }
    }

    /// Fails with `Authorization` when no comment matches both id and owner,
    /// which includes the case where the comment does not exist at all.
    pub async fn verify_comment_owner(&self, comment_id: &str, user_id: &str) -> Result<()> {
        if self.comments.comment_owned_by(comment_id, user_id).await? {
            Ok(())
        } else {
            warn!(comment_id, user_id, "comment ownership check failed");
            Err(AppError::Authorization(Resource::Comment))
        }
    }

    /// Same collapse of "missing" and "not yours" as [`Self::verify_comment_owner`].
    pub async fn verify_reply_owner(&self, reply_id: &str, user_id: &str) -> Result<()> {
        if self.replies.reply_owned_by(reply_id, user_id).await? {
            Ok(())
        } else {
            warn!(reply_id, user_id, "reply ownership check failed");
            Err(AppError::Authorization(Resource::Reply))
        }
    }
}
