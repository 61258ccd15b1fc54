//! Comment — a reply attached to a post.
//!
//! Comments have no edit or delete path of their own; they disappear only
//! when their post is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::User;

/// A reply to a post. Every field is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub post_id:    Uuid,
  pub author_id:  Uuid,
  pub content:    String,
  pub created_at: DateTime<Utc>,
}

/// A comment with its author resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
  pub comment: Comment,
  pub author:  User,
}

/// Input to [`crate::store::SocialStore::create_comment`].
/// `comment_id` and `created_at` are set by the store.
#[derive(Debug, Clone)]
pub struct NewComment {
  pub post_id:   Uuid,
  pub author_id: Uuid,
  pub content:   String,
}
