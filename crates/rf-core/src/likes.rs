//! Like toggling and per-thread like counts.
//!
//! Likes are a set of (comment, user) pairs. Counts are never stored; they
//! are derived from the set on every read.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::models::LikeState;
use crate::traits::LikeRepo;

#[derive(Clone)]
pub struct LikeToggle {
    likes: Arc<dyn LikeRepo>,
}

impl LikeToggle {
    pub fn new(likes: Arc<dyn LikeRepo>) -> Self {
        Self { likes }
    }

    /// Flips the pair: liked becomes unliked and vice versa.
    ///
    /// The caller must already have verified that the thread and comment
    /// exist. Check and write are two separate store calls.
    pub async fn toggle(&self, user_id: &str, comment_id: &str) -> Result<LikeState> {
        if self.likes.is_liked(user_id, comment_id).await? {
            self.likes.unlike(user_id, comment_id).await?;
            debug!(user_id, comment_id, "comment unliked");
            Ok(LikeState::Unliked)
        } else {
            self.likes.like(user_id, comment_id).await?;
            debug!(user_id, comment_id, "comment liked");
            Ok(LikeState::Liked)
        }
    }

    /// Like count per comment id for one thread.
    ///
    /// Comments without likes may or may not be present in the map; readers
    /// should treat a missing entry as zero.
    pub async fn counts_by_thread(&self, thread_id: &str) -> Result<HashMap<String, u64>> {
        let counts = self.likes.like_counts_by_thread(thread_id).await?;
        Ok(counts.into_iter().map(|c| (c.comment_id, c.count)).collect())
    }
}
