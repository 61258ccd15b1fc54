//! Handlers for `/posts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts` | Public; newest first, author and comments embedded |
//! | `POST`   | `/posts` | Session required; body: `{"content":"…"}` |
//! | `PUT`    | `/posts/{id}` | Session required; author only |
//! | `DELETE` | `/posts` | Session required; author only; body: `{"id":"…"}` |
//! | `POST`   | `/posts/like` | Public; body: `{"postId":"…"}` |

use axum::{
  Json,
  extract::{Path, State},
};
use chirp_core::{
  post::{NewPost, Post, PostView},
  store::SocialStore,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, error::Error, session::Session};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /posts` — every post, newest first, each with its author and its
/// comments (oldest first).
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<PostView>>, Error>
where
  S: SocialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let posts = state
    .store
    .list_posts()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(posts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub content: Option<String>,
}

/// `POST /posts` — body: `{"content":"…"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Json(body): Json<CreateBody>,
) -> Result<Json<Post>, Error>
where
  S: SocialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let content = match body.content {
    Some(c) if !c.is_empty() => c,
    _ => return Err(Error::InvalidInput("content is required".to_string())),
  };

  // The session may outlive its account; resolve the author before writing.
  let author = state
    .store
    .get_user(session.user_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| Error::NotFound("author account not found".to_string()))?;

  let post = state
    .store
    .create_post(NewPost { author_id: author.user_id, content })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(post))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub content: Option<String>,
}

/// `PUT /posts/{id}` — body: `{"content":"…"}`
///
/// Only the author may edit. Editing replaces the content and nothing else:
/// likes, comments, and the creation timestamp all survive.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Path(id): Path<String>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<PostView>, Error>
where
  S: SocialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let post_id = Uuid::parse_str(&id)
    .map_err(|_| Error::InvalidInput(format!("malformed post id: {id}")))?;

  let content = body
    .content
    .ok_or_else(|| Error::InvalidInput("content is required".to_string()))?;

  let view = state
    .store
    .get_post(post_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| Error::NotFound(format!("post {post_id} not found")))?;
  if view.author.email != session.email {
    return Err(Error::Forbidden);
  }

  let updated = state
    .store
    .update_post_content(post_id, content)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(updated))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DeleteBody {
  pub id: Option<String>,
}

/// `DELETE /posts` — body: `{"id":"…"}`
///
/// A missing post and someone else's post produce the same 403: the caller
/// only learns whether the post was theirs to delete.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Json(body): Json<DeleteBody>,
) -> Result<Json<serde_json::Value>, Error>
where
  S: SocialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = body
    .id
    .ok_or_else(|| Error::InvalidInput("id is required".to_string()))?;
  let post_id = Uuid::parse_str(&id)
    .map_err(|_| Error::InvalidInput(format!("malformed post id: {id}")))?;

  let view = state
    .store
    .get_post(post_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::Forbidden)?;
  if view.author.email != session.email {
    return Err(Error::Forbidden);
  }

  state
    .store
    .delete_post(post_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(json!({ "message": "post deleted" })))
}

// ─── Like ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LikeBody {
  #[serde(rename = "postId")]
  pub post_id: Option<String>,
}

/// `POST /posts/like` — body: `{"postId":"…"}`
///
/// No session required: anyone may like a post, and the same caller may like
/// it any number of times. Returns the post with its updated count.
pub async fn like<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LikeBody>,
) -> Result<Json<Post>, Error>
where
  S: SocialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let id = body
    .post_id
    .ok_or_else(|| Error::InvalidInput("postId is required".to_string()))?;
  let post_id = Uuid::parse_str(&id)
    .map_err(|_| Error::InvalidInput(format!("malformed post id: {id}")))?;

  // Unknown ids are a 404, not a store failure.
  state
    .store
    .get_post(post_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| Error::NotFound(format!("post {post_id} not found")))?;

  let post = state
    .store
    .like_post(post_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(post))
}
