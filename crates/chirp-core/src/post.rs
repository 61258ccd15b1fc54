//! Post — a short text entry owned by its author.
//!
//! The stored row carries only the author's UUID; the author and the
//! post's comments are resolved on read into a [`PostView`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{comment::CommentView, user::User};

/// A short text post. `content` is the only mutable field; everything else
/// is fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
  pub post_id:    Uuid,
  pub author_id:  Uuid,
  pub content:    String,
  pub created_at: DateTime<Utc>,
  /// Never negative; advances only by +1 per accepted like.
  pub like_count: i64,
}

/// The read model for a post — never stored, always derived.
/// Comments are in conversation (oldest-first) order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
  pub post:     Post,
  pub author:   User,
  pub comments: Vec<CommentView>,
}

/// Input to [`crate::store::SocialStore::create_post`].
/// `post_id`, `created_at`, and the zero like count are set by the store.
#[derive(Debug, Clone)]
pub struct NewPost {
  pub author_id: Uuid,
  pub content:   String,
}
