//! # rf-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core
//! `ForumService`. Handlers only translate: path ids and the authenticated
//! user are merged into the payload, and results are wrapped in the
//! `{status, data}` envelope.

use actix_web::{web, HttpResponse};
use rf_core::entities::Payload;
use rf_core::error::AppError;
use rf_core::traits::AuthProvider;
use rf_core::ForumService;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::AuthenticatedUser;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub forum: ForumService,
    pub auth: Box<dyn AuthProvider>,
}

type ApiResult = Result<HttpResponse, ApiError>;

/// JSON body extraction never fails the request on its own.
type JsonBody = Result<web::Json<Value>, actix_web::Error>;

/// An unreadable body is not rejected on the spot: the use case still runs
/// its guards on an empty payload, and only its validation failure is
/// reported as `MalformedBody`.
struct Body {
    value: Value,
    unreadable: bool,
}

impl Body {
    fn new(body: JsonBody) -> Self {
        match body {
            Ok(json) => Self { value: json.into_inner(), unreadable: false },
            Err(_) => Self { value: Value::Null, unreadable: true },
        }
    }

    fn reject(unreadable: bool, err: AppError) -> ApiError {
        match err {
            AppError::Validation(_) if unreadable => ApiError::MalformedBody,
            other => other.into(),
        }
    }
}

/// Turns a request body into a payload. Anything but a JSON object counts
/// as an empty payload and fails validation downstream.
fn into_payload(body: Value) -> Payload {
    match body {
        Value::Object(map) => map,
        _ => Payload::new(),
    }
}

fn with_ids(body: Value, ids: &[(&str, &str)]) -> Payload {
    let mut payload = into_payload(body);
    for (key, value) in ids {
        // path and identity values always win over anything in the body
        payload.insert((*key).to_string(), Value::String((*value).to_string()));
    }
    payload
}

fn success() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "success" }))
}

/// POST /threads
pub async fn post_thread(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    body: JsonBody,
) -> ApiResult {
    let Body { value, unreadable } = Body::new(body);
    let payload = with_ids(value, &[("owner", user.0.as_str())]);
    let added_thread = data
        .forum
        .add_thread(&payload)
        .await
        .map_err(|err| Body::reject(unreadable, err))?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "data": { "addedThread": added_thread },
    })))
}

/// GET /threads/{thread_id}
pub async fn get_thread(data: web::Data<AppState>, path: web::Path<String>) -> ApiResult {
    let thread_id = path.into_inner();
    let thread = data.forum.get_aggregated_thread(&thread_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "status": "success",
        "data": { "thread": thread },
    })))
}

/// POST /threads/{thread_id}/comments
pub async fn post_comment(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    body: JsonBody,
) -> ApiResult {
    let thread_id = path.into_inner();
    let Body { value, unreadable } = Body::new(body);
    let payload = with_ids(
        value,
        &[("threadId", thread_id.as_str()), ("owner", user.0.as_str())],
    );
    let added_comment = data
        .forum
        .add_comment(&payload)
        .await
        .map_err(|err| Body::reject(unreadable, err))?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "data": { "addedComment": added_comment },
    })))
}

/// DELETE /threads/{thread_id}/comments/{comment_id}
pub async fn delete_comment(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> ApiResult {
    let (_thread_id, comment_id) = path.into_inner();
    data.forum.delete_comment(&comment_id, &user.0).await?;
    Ok(success())
}

/// POST /threads/{thread_id}/comments/{comment_id}/replies
pub async fn post_reply(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
    body: JsonBody,
) -> ApiResult {
    let (thread_id, comment_id) = path.into_inner();
    let Body { value, unreadable } = Body::new(body);
    let payload = with_ids(
        value,
        &[
            ("threadId", thread_id.as_str()),
            ("commentId", comment_id.as_str()),
            ("owner", user.0.as_str()),
        ],
    );
    let added_reply = data
        .forum
        .add_reply(&payload)
        .await
        .map_err(|err| Body::reject(unreadable, err))?;

    Ok(HttpResponse::Created().json(json!({
        "status": "success",
        "data": { "addedReply": added_reply },
    })))
}

/// DELETE /threads/{thread_id}/comments/{comment_id}/replies/{reply_id}
pub async fn delete_reply(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String, String)>,
) -> ApiResult {
    let (_thread_id, _comment_id, reply_id) = path.into_inner();
    data.forum.delete_reply(&reply_id, &user.0).await?;
    Ok(success())
}

/// PUT /threads/{thread_id}/comments/{comment_id}/likes
pub async fn put_like(
    data: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<(String, String)>,
) -> ApiResult {
    let (thread_id, comment_id) = path.into_inner();
    data.forum.toggle_like(&user.0, &comment_id, &thread_id).await?;
    Ok(success())
}
