//! # rf-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `rf-core` domain models. One `SqliteForumRepo` serves all four
//! store ports over a shared pool.

use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use rf_core::entities::{AddedComment, AddedReply, AddedThread, NewComment, NewReply, NewThread};
use rf_core::models::{CommentRow, LikeCount, ReplyRow, ThreadDetail};
use rf_core::traits::{CommentRepo, LikeRepo, ReplyRepo, ThreadRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

const SCHEMA: &str = include_str!("../migrations/0001_init.sql");

pub struct SqliteForumRepo {
    pool: SqlitePool,
}

/// `<prefix>-<16 hex chars>`
fn new_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &hex[..16])
}

impl SqliteForumRepo {
    /// Connects and applies the schema.
    ///
    /// # Developer Note
    /// An in-memory database lives only as long as its connection, so for
    /// `:memory:` urls the pool is pinned to a single connection that never
    /// expires.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("invalid database url {url}"))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = if url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        let repo = Self::from_pool(pool);
        repo.migrate().await?;
        Ok(repo)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .context("applying schema")?;
        Ok(())
    }

    /// Registers a username for an owner id. Not part of the store ports.
    pub async fn add_user(&self, id: &str, username: &str) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO users (id, username) VALUES (?, ?)")
            .bind(id)
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn row_exists(&self, sql: &str, id: &str) -> anyhow::Result<bool> {
        let row = sqlx::query(sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.is_some())
    }

    async fn row_owned_by(&self, sql: &str, id: &str, owner: &str) -> anyhow::Result<bool> {
        let row = sqlx::query(sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }
}

fn comment_from_row(row: &SqliteRow) -> Result<CommentRow, sqlx::Error> {
    Ok(CommentRow {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        thread_id: row.try_get("thread_id")?,
        owner: row.try_get("owner")?,
        date: row.try_get("date")?,
        is_delete: row.try_get("is_delete")?,
        username: row.try_get("username")?,
    })
}

fn reply_from_row(row: &SqliteRow) -> Result<ReplyRow, sqlx::Error> {
    Ok(ReplyRow {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        comment_id: row.try_get("comment_id")?,
        owner: row.try_get("owner")?,
        date: row.try_get("date")?,
        is_delete: row.try_get("is_delete")?,
        username: row.try_get("username")?,
    })
}

#[async_trait]
impl ThreadRepo for SqliteForumRepo {
    async fn add_thread(&self, new_thread: NewThread) -> anyhow::Result<AddedThread> {
        let id = new_id("thread");
        let date = Utc::now();

        sqlx::query("INSERT INTO threads (id, title, body, owner, date) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(new_thread.title())
            .bind(new_thread.body())
            .bind(new_thread.owner())
            .bind(date)
            .execute(&self.pool)
            .await?;

        Ok(AddedThread::new(id, new_thread.title(), new_thread.owner(), date)?)
    }

    async fn get_thread(&self, id: &str) -> anyhow::Result<Option<ThreadDetail>> {
        let row = sqlx::query(
            "SELECT t.id, t.title, t.body, t.date, COALESCE(u.username, t.owner) AS username
             FROM threads t
             LEFT JOIN users u ON u.id = t.owner
             WHERE t.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(ThreadDetail {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            body: row.try_get("body")?,
            date: row.try_get("date")?,
            username: row.try_get("username")?,
        }))
    }

    async fn thread_exists(&self, id: &str) -> anyhow::Result<bool> {
        self.row_exists("SELECT 1 FROM threads WHERE id = ?", id).await
    }
}

#[async_trait]
impl CommentRepo for SqliteForumRepo {
    async fn add_comment(&self, new_comment: NewComment) -> anyhow::Result<AddedComment> {
        let id = new_id("comment");

        sqlx::query("INSERT INTO comments (id, content, thread_id, owner, date) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(new_comment.content())
            .bind(new_comment.thread_id())
            .bind(new_comment.owner())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(AddedComment::new(id, new_comment.content(), new_comment.owner())?)
    }

    async fn comments_by_thread(&self, thread_id: &str) -> anyhow::Result<Vec<CommentRow>> {
        let rows = sqlx::query(
            "SELECT c.id, c.content, c.thread_id, c.owner, c.date, c.is_delete,
                    COALESCE(u.username, c.owner) AS username
             FROM comments c
             LEFT JOIN users u ON u.id = c.owner
             WHERE c.thread_id = ?
             ORDER BY c.date ASC, c.rowid ASC",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(thread_id, count = rows.len(), "fetched comments");
        Ok(rows.iter().map(comment_from_row).collect::<Result<_, _>>()?)
    }

    async fn comment_exists(&self, id: &str) -> anyhow::Result<bool> {
        self.row_exists("SELECT 1 FROM comments WHERE id = ?", id).await
    }

    async fn comment_owned_by(&self, id: &str, owner: &str) -> anyhow::Result<bool> {
        self.row_owned_by("SELECT 1 FROM comments WHERE id = ? AND owner = ?", id, owner)
            .await
    }

    async fn soft_delete_comment(&self, id: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE comments SET is_delete = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ReplyRepo for SqliteForumRepo {
    async fn add_reply(&self, new_reply: NewReply) -> anyhow::Result<AddedReply> {
        let id = new_id("reply");

        sqlx::query("INSERT INTO replies (id, content, comment_id, owner, date) VALUES (?, ?, ?, ?, ?)")
            .bind(&id)
            .bind(new_reply.content())
            .bind(new_reply.comment_id())
            .bind(new_reply.owner())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(AddedReply::new(id, new_reply.content(), new_reply.owner())?)
    }

    async fn replies_by_thread(&self, thread_id: &str) -> anyhow::Result<Vec<ReplyRow>> {
        let rows = sqlx::query(
            "SELECT r.id, r.content, r.comment_id, r.owner, r.date, r.is_delete,
                    COALESCE(u.username, r.owner) AS username
             FROM replies r
             JOIN comments c ON c.id = r.comment_id
             LEFT JOIN users u ON u.id = r.owner
             WHERE c.thread_id = ?
             ORDER BY r.date ASC, r.rowid ASC",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(thread_id, count = rows.len(), "fetched replies");
        Ok(rows.iter().map(reply_from_row).collect::<Result<_, _>>()?)
    }

    async fn reply_exists(&self, id: &str) -> anyhow::Result<bool> {
        self.row_exists("SELECT 1 FROM replies WHERE id = ?", id).await
    }

    async fn reply_owned_by(&self, id: &str, owner: &str) -> anyhow::Result<bool> {
        self.row_owned_by("SELECT 1 FROM replies WHERE id = ? AND owner = ?", id, owner)
            .await
    }

    async fn soft_delete_reply(&self, id: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE replies SET is_delete = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl LikeRepo for SqliteForumRepo {
    async fn is_liked(&self, user_id: &str, comment_id: &str) -> anyhow::Result<bool> {
        self.row_owned_by(
            "SELECT 1 FROM likes WHERE comment_id = ? AND owner = ?",
            comment_id,
            user_id,
        )
        .await
    }

    async fn like(&self, user_id: &str, comment_id: &str) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO likes (comment_id, owner) VALUES (?, ?)
             ON CONFLICT (comment_id, owner) DO NOTHING",
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn unlike(&self, user_id: &str, comment_id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM likes WHERE comment_id = ? AND owner = ?")
            .bind(comment_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// One row per comment of the thread, zero-like comments included.
    async fn like_counts_by_thread(&self, thread_id: &str) -> anyhow::Result<Vec<LikeCount>> {
        let rows = sqlx::query(
            "SELECT c.id AS comment_id, COUNT(l.owner) AS like_count
             FROM comments c
             LEFT JOIN likes l ON l.comment_id = c.id
             WHERE c.thread_id = ?
             GROUP BY c.id",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> anyhow::Result<LikeCount> {
                let count: i64 = row.try_get("like_count")?;
                Ok(LikeCount {
                    comment_id: row.try_get("comment_id")?,
                    count: u64::try_from(count).unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repo() -> SqliteForumRepo {
        let repo = SqliteForumRepo::new("sqlite::memory:").await.unwrap();
        repo.add_user("user-123", "dicoding").await.unwrap();
        repo.add_user("user-456", "johndoe").await.unwrap();
        repo
    }

    async fn seed_thread(repo: &SqliteForumRepo) -> String {
        let thread = NewThread::new("sebuah thread", "sebuah body", "user-123").unwrap();
        repo.add_thread(thread).await.unwrap().id().to_string()
    }

    async fn seed_comment(repo: &SqliteForumRepo, thread_id: &str, owner: &str) -> String {
        let comment = NewComment::new("sebuah comment", owner, thread_id).unwrap();
        repo.add_comment(comment).await.unwrap().id().to_string()
    }

    #[tokio::test]
    async fn test_add_and_get_thread() {
        let repo = repo().await;
        let added = repo
            .add_thread(NewThread::new("sebuah thread", "sebuah body", "user-123").unwrap())
            .await
            .expect("Failed to add thread");

        assert!(added.id().starts_with("thread-"));
        assert_eq!(added.id().len(), "thread-".len() + 16);

        let thread = repo.get_thread(added.id()).await.unwrap().unwrap();
        assert_eq!(thread.title, "sebuah thread");
        assert_eq!(thread.body, "sebuah body");
        assert_eq!(thread.username, "dicoding");

        assert!(repo.thread_exists(added.id()).await.unwrap());
        assert!(!repo.thread_exists("thread-404").await.unwrap());
        assert!(repo.get_thread("thread-404").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_user_falls_back_to_owner_id() {
        let repo = repo().await;
        let added = repo
            .add_thread(NewThread::new("judul", "isi", "user-unregistered").unwrap())
            .await
            .unwrap();
        let thread = repo.get_thread(added.id()).await.unwrap().unwrap();
        assert_eq!(thread.username, "user-unregistered");
    }

    #[tokio::test]
    async fn test_comments_are_oldest_first_and_soft_deleted() {
        let repo = repo().await;
        let thread_id = seed_thread(&repo).await;
        let first = seed_comment(&repo, &thread_id, "user-123").await;
        let second = seed_comment(&repo, &thread_id, "user-456").await;

        repo.soft_delete_comment(&first).await.unwrap();

        let comments = repo.comments_by_thread(&thread_id).await.unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].id, first);
        assert!(comments[0].is_delete);
        assert_eq!(comments[0].content, "sebuah comment");
        assert_eq!(comments[1].id, second);
        assert!(!comments[1].is_delete);
        assert_eq!(comments[1].username, "johndoe");

        // still addressable after deletion
        assert!(repo.comment_exists(&first).await.unwrap());
    }

    #[tokio::test]
    async fn test_comment_ownership() {
        let repo = repo().await;
        let thread_id = seed_thread(&repo).await;
        let comment_id = seed_comment(&repo, &thread_id, "user-123").await;

        assert!(repo.comment_owned_by(&comment_id, "user-123").await.unwrap());
        assert!(!repo.comment_owned_by(&comment_id, "user-456").await.unwrap());
        assert!(!repo.comment_owned_by("comment-404", "user-123").await.unwrap());
    }

    #[tokio::test]
    async fn test_replies_are_joined_through_comments() {
        let repo = repo().await;
        let thread_id = seed_thread(&repo).await;
        let other_thread = seed_thread(&repo).await;
        let comment_id = seed_comment(&repo, &thread_id, "user-123").await;
        let other_comment = seed_comment(&repo, &other_thread, "user-123").await;

        let reply = repo
            .add_reply(NewReply::new("sebuah balasan", "user-456", &comment_id).unwrap())
            .await
            .unwrap();
        assert!(reply.id().starts_with("reply-"));
        repo.add_reply(NewReply::new("di thread lain", "user-456", &other_comment).unwrap())
            .await
            .unwrap();

        repo.soft_delete_reply(reply.id()).await.unwrap();

        let replies = repo.replies_by_thread(&thread_id).await.unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].comment_id, comment_id);
        assert!(replies[0].is_delete);
        assert_eq!(replies[0].username, "johndoe");

        assert!(repo.reply_exists(reply.id()).await.unwrap());
        assert!(repo.reply_owned_by(reply.id(), "user-456").await.unwrap());
        assert!(!repo.reply_owned_by(reply.id(), "user-123").await.unwrap());
    }

    #[tokio::test]
    async fn test_likes_collapse_and_count_zero() {
        let repo = repo().await;
        let thread_id = seed_thread(&repo).await;
        let liked = seed_comment(&repo, &thread_id, "user-123").await;
        let unliked = seed_comment(&repo, &thread_id, "user-123").await;

        repo.like("user-123", &liked).await.unwrap();
        repo.like("user-123", &liked).await.unwrap();
        repo.like("user-456", &liked).await.unwrap();
        assert!(repo.is_liked("user-123", &liked).await.unwrap());

        let mut counts = repo.like_counts_by_thread(&thread_id).await.unwrap();
        counts.sort_by(|a, b| a.comment_id.cmp(&b.comment_id));
        let count_of = |id: &str| counts.iter().find(|c| c.comment_id == id).map(|c| c.count);
        assert_eq!(count_of(&liked), Some(2));
        assert_eq!(count_of(&unliked), Some(0));

        repo.unlike("user-123", &liked).await.unwrap();
        assert!(!repo.is_liked("user-123", &liked).await.unwrap());
    }
}
