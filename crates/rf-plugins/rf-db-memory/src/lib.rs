//! # rf-db-memory
//!
//! In-process implementation of the four store ports. Backs the test suites
//! and the `db-memory` build of the binary; nothing survives a restart.
//!
//! Mirrors the SQLite plugin's observable behaviour: ids are prefixed,
//! reads come back oldest first, deletes are soft, duplicate likes collapse
//! and usernames fall back to the owner id.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};
use rf_core::entities::{AddedComment, AddedReply, AddedThread, NewComment, NewReply, NewThread};
use rf_core::models::{CommentRow, LikeCount, ReplyRow, ThreadDetail};
use rf_core::traits::{CommentRepo, LikeRepo, ReplyRepo, ThreadRepo};
use tracing::debug;
use uuid::Uuid;

struct StoredThread {
    title: String,
    body: String,
    owner: String,
    date: DateTime<Utc>,
}

struct StoredComment {
    content: String,
    thread_id: String,
    owner: String,
    date: DateTime<Utc>,
    is_delete: bool,
    seq: u64,
}

struct StoredReply {
    content: String,
    comment_id: String,
    owner: String,
    date: DateTime<Utc>,
    is_delete: bool,
    seq: u64,
}

#[derive(Default)]
pub struct MemoryForumRepo {
    users: DashMap<String, String>,
    threads: DashMap<String, StoredThread>,
    comments: DashMap<String, StoredComment>,
    replies: DashMap<String, StoredReply>,
    /// (comment_id, owner)
    likes: DashSet<(String, String)>,
    /// Insertion counter, breaks ties between equal timestamps.
    seq: AtomicU64,
}

fn new_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &hex[..16])
}

impl MemoryForumRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a username for an owner id. Not part of the store ports.
    pub fn add_user(&self, id: &str, username: &str) {
        self.users.insert(id.to_string(), username.to_string());
    }

    fn username(&self, owner: &str) -> String {
        self.users
            .get(owner)
            .map(|u| u.value().clone())
            .unwrap_or_else(|| owner.to_string())
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl ThreadRepo for MemoryForumRepo {
    async fn add_thread(&self, new_thread: NewThread) -> anyhow::Result<AddedThread> {
        let id = new_id("thread");
        let date = Utc::now();
        self.threads.insert(
            id.clone(),
            StoredThread {
                title: new_thread.title().to_string(),
                body: new_thread.body().to_string(),
                owner: new_thread.owner().to_string(),
                date,
            },
        );
        Ok(AddedThread::new(id, new_thread.title(), new_thread.owner(), date)?)
    }

    async fn get_thread(&self, id: &str) -> anyhow::Result<Option<ThreadDetail>> {
        Ok(self.threads.get(id).map(|t| ThreadDetail {
            id: id.to_string(),
            title: t.title.clone(),
            body: t.body.clone(),
            date: t.date,
            username: self.username(&t.owner),
        }))
    }

    async fn thread_exists(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.threads.contains_key(id))
    }
}

#[async_trait]
impl CommentRepo for MemoryForumRepo {
    async fn add_comment(&self, new_comment: NewComment) -> anyhow::Result<AddedComment> {
        if !self.threads.contains_key(new_comment.thread_id()) {
            anyhow::bail!("foreign key violation: thread {} does not exist", new_comment.thread_id());
        }
        let id = new_id("comment");
        self.comments.insert(
            id.clone(),
            StoredComment {
                content: new_comment.content().to_string(),
                thread_id: new_comment.thread_id().to_string(),
                owner: new_comment.owner().to_string(),
                date: Utc::now(),
                is_delete: false,
                seq: self.next_seq(),
            },
        );
        Ok(AddedComment::new(id, new_comment.content(), new_comment.owner())?)
    }

    async fn comments_by_thread(&self, thread_id: &str) -> anyhow::Result<Vec<CommentRow>> {
        let mut rows: Vec<(u64, CommentRow)> = self
            .comments
            .iter()
            .filter(|entry| entry.thread_id == thread_id)
            .map(|entry| {
                let c = entry.value();
                let row = CommentRow {
                    id: entry.key().clone(),
                    content: c.content.clone(),
                    thread_id: c.thread_id.clone(),
                    owner: c.owner.clone(),
                    date: c.date,
                    is_delete: c.is_delete,
                    username: self.username(&c.owner),
                };
                (c.seq, row)
            })
            .collect();
        rows.sort_by_key(|(seq, row)| (row.date, *seq));

        debug!(thread_id, count = rows.len(), "fetched comments");
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn comment_exists(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.comments.contains_key(id))
    }

    async fn comment_owned_by(&self, id: &str, owner: &str) -> anyhow::Result<bool> {
        Ok(self.comments.get(id).is_some_and(|c| c.owner == owner))
    }

    async fn soft_delete_comment(&self, id: &str) -> anyhow::Result<()> {
        if let Some(mut comment) = self.comments.get_mut(id) {
            comment.is_delete = true;
        }
        Ok(())
    }
}

#[async_trait]
impl ReplyRepo for MemoryForumRepo {
    async fn add_reply(&self, new_reply: NewReply) -> anyhow::Result<AddedReply> {
        if !self.comments.contains_key(new_reply.comment_id()) {
            anyhow::bail!("foreign key violation: comment {} does not exist", new_reply.comment_id());
        }
        let id = new_id("reply");
        self.replies.insert(
            id.clone(),
            StoredReply {
                content: new_reply.content().to_string(),
                comment_id: new_reply.comment_id().to_string(),
                owner: new_reply.owner().to_string(),
                date: Utc::now(),
                is_delete: false,
                seq: self.next_seq(),
            },
        );
        Ok(AddedReply::new(id, new_reply.content(), new_reply.owner())?)
    }

    async fn replies_by_thread(&self, thread_id: &str) -> anyhow::Result<Vec<ReplyRow>> {
        let mut rows: Vec<(u64, ReplyRow)> = self
            .replies
            .iter()
            .filter(|entry| {
                self.comments
                    .get(&entry.comment_id)
                    .is_some_and(|c| c.thread_id == thread_id)
            })
            .map(|entry| {
                let r = entry.value();
                let row = ReplyRow {
                    id: entry.key().clone(),
                    content: r.content.clone(),
                    comment_id: r.comment_id.clone(),
                    owner: r.owner.clone(),
                    date: r.date,
                    is_delete: r.is_delete,
                    username: self.username(&r.owner),
                };
                (r.seq, row)
            })
            .collect();
        rows.sort_by_key(|(seq, row)| (row.date, *seq));

        debug!(thread_id, count = rows.len(), "fetched replies");
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn reply_exists(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.replies.contains_key(id))
    }

    async fn reply_owned_by(&self, id: &str, owner: &str) -> anyhow::Result<bool> {
        Ok(self.replies.get(id).is_some_and(|r| r.owner == owner))
    }

    async fn soft_delete_reply(&self, id: &str) -> anyhow::Result<()> {
        if let Some(mut reply) = self.replies.get_mut(id) {
            reply.is_delete = true;
        }
        Ok(())
    }
}

#[async_trait]
impl LikeRepo for MemoryForumRepo {
    async fn is_liked(&self, user_id: &str, comment_id: &str) -> anyhow::Result<bool> {
        Ok(self.likes.contains(&(comment_id.to_string(), user_id.to_string())))
    }

    async fn like(&self, user_id: &str, comment_id: &str) -> anyhow::Result<()> {
        self.likes.insert((comment_id.to_string(), user_id.to_string()));
        Ok(())
    }

    async fn unlike(&self, user_id: &str, comment_id: &str) -> anyhow::Result<()> {
        self.likes.remove(&(comment_id.to_string(), user_id.to_string()));
        Ok(())
    }

    async fn like_counts_by_thread(&self, thread_id: &str) -> anyhow::Result<Vec<LikeCount>> {
        let comment_ids: Vec<String> = self
            .comments
            .iter()
            .filter(|entry| entry.thread_id == thread_id)
            .map(|entry| entry.key().clone())
            .collect();

        Ok(comment_ids
            .into_iter()
            .map(|comment_id| {
                let count = self.likes.iter().filter(|pair| pair.0 == comment_id).count() as u64;
                LikeCount { comment_id, count }
            })
            .collect())
    }
}
