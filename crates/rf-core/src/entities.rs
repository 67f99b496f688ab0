//! # Entity Validators
//!
//! Creation payloads and their persisted counterparts. Every value object is
//! validated when it is constructed, so a `NewComment` in hand is always
//! well-formed. Fields are private to keep it that way.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;

/// Raw key/value payload as received from a caller.
pub type Payload = serde_json::Map<String, Value>;

/// Pulls `N` required text fields out of a payload.
///
/// Presence is checked for every key before any type is checked, so a
/// payload that is both incomplete and mistyped reports the missing field.
fn text_fields<const N: usize>(
    entity: &'static str,
    payload: &Payload,
    keys: [&str; N],
) -> Result<[String; N], ValidationError> {
    let missing = keys.iter().any(|key| match payload.get(*key) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    });
    if missing {
        return Err(ValidationError::missing(entity));
    }

    let mut out: [String; N] = std::array::from_fn(|_| String::new());
    for (slot, key) in out.iter_mut().zip(keys) {
        match payload.get(key) {
            Some(Value::String(s)) => *slot = s.clone(),
            _ => return Err(ValidationError::wrong_type(entity)),
        }
    }
    Ok(out)
}

fn require_present(entity: &'static str, values: &[&str]) -> Result<(), ValidationError> {
    if values.iter().any(|v| v.is_empty()) {
        return Err(ValidationError::missing(entity));
    }
    Ok(())
}

// ── Threads ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewThread {
    title: String,
    body: String,
    owner: String,
}

impl NewThread {
    pub const ENTITY: &'static str = "NEW_THREAD";

    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        owner: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (title, body, owner) = (title.into(), body.into(), owner.into());
        require_present(Self::ENTITY, &[&title, &body, &owner])?;
        Ok(Self { title, body, owner })
    }

    pub fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        let [title, body, owner] = text_fields(Self::ENTITY, payload, ["title", "body", "owner"])?;
        Ok(Self { title, body, owner })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

/// A persisted thread as returned to the creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedThread {
    id: String,
    title: String,
    owner: String,
    date: DateTime<Utc>,
}

impl AddedThread {
    pub const ENTITY: &'static str = "ADDED_THREAD";

    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        owner: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let (id, title, owner) = (id.into(), title.into(), owner.into());
        require_present(Self::ENTITY, &[&id, &title, &owner])?;
        Ok(Self { id, title, owner, date })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

// ── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    content: String,
    owner: String,
    thread_id: String,
}

impl NewComment {
    pub const ENTITY: &'static str = "NEW_COMMENT";

    pub fn new(
        content: impl Into<String>,
        owner: impl Into<String>,
        thread_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (content, owner, thread_id) = (content.into(), owner.into(), thread_id.into());
        require_present(Self::ENTITY, &[&content, &owner, &thread_id])?;
        Ok(Self { content, owner, thread_id })
    }

    pub fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        let [content, owner, thread_id] =
            text_fields(Self::ENTITY, payload, ["content", "owner", "threadId"])?;
        Ok(Self { content, owner, thread_id })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedComment {
    id: String,
    content: String,
    owner: String,
}

impl AddedComment {
    pub const ENTITY: &'static str = "ADDED_COMMENT";

    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        owner: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (id, content, owner) = (id.into(), content.into(), owner.into());
        require_present(Self::ENTITY, &[&id, &content, &owner])?;
        Ok(Self { id, content, owner })
    }

    pub fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        let [id, content, owner] = text_fields(Self::ENTITY, payload, ["id", "content", "owner"])?;
        Ok(Self { id, content, owner })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

// ── Replies ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReply {
    content: String,
    owner: String,
    comment_id: String,
}

impl NewReply {
    pub const ENTITY: &'static str = "NEW_REPLY";

    pub fn new(
        content: impl Into<String>,
        owner: impl Into<String>,
        comment_id: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (content, owner, comment_id) = (content.into(), owner.into(), comment_id.into());
        require_present(Self::ENTITY, &[&content, &owner, &comment_id])?;
        Ok(Self { content, owner, comment_id })
    }

    pub fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        let [content, owner, comment_id] =
            text_fields(Self::ENTITY, payload, ["content", "owner", "commentId"])?;
        Ok(Self { content, owner, comment_id })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn comment_id(&self) -> &str {
        &self.comment_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddedReply {
    id: String,
    content: String,
    owner: String,
}

impl AddedReply {
    pub const ENTITY: &'static str = "ADDED_REPLY";

    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        owner: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let (id, content, owner) = (id.into(), content.into(), owner.into());
        require_present(Self::ENTITY, &[&id, &content, &owner])?;
        Ok(Self { id, content, owner })
    }

    pub fn from_payload(payload: &Payload) -> Result<Self, ValidationError> {
        let [id, content, owner] = text_fields(Self::ENTITY, payload, ["id", "content", "owner"])?;
        Ok(Self { id, content, owner })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}
