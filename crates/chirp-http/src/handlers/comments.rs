//! Handlers for `/comments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/comments` | Public; newest first, author embedded |
//! | `POST` | `/comments` | Session required; body: `{"postId":"…","content":"…"}` |

use axum::{Json, extract::State};
use chirp_core::{
  comment::{CommentView, NewComment},
  store::SocialStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::Error, session::Session};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub content: Option<String>,
  #[serde(rename = "postId")]
  pub post_id: Option<String>,
}

/// `POST /comments` — body: `{"postId":"…","content":"…"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Json(body): Json<CreateBody>,
) -> Result<Json<CommentView>, Error>
where
  S: SocialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (content, raw_id) = match (body.content, body.post_id) {
    (Some(c), Some(p)) if !c.is_empty() => (c, p),
    _ => {
      return Err(Error::InvalidInput(
        "content and postId are required".to_string(),
      ));
    }
  };
  let post_id = Uuid::parse_str(&raw_id)
    .map_err(|_| Error::InvalidInput(format!("malformed post id: {raw_id}")))?;

  // The session may outlive its account; resolve the author before writing.
  let author = state
    .store
    .get_user(session.user_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| Error::NotFound("author account not found".to_string()))?;

  state
    .store
    .get_post(post_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or_else(|| Error::NotFound(format!("post {post_id} not found")))?;

  let comment = state
    .store
    .create_comment(NewComment {
      post_id,
      author_id: author.user_id,
      content,
    })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(comment))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /comments` — every comment across all posts, newest first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<CommentView>>, Error>
where
  S: SocialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let comments = state
    .store
    .list_comments()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(comments))
}
