//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings (constant format, so string
//! comparison in SQL orders them chronologically). UUIDs are stored as
//! hyphenated lowercase strings.

use chirp_core::{
  comment::{Comment, CommentView},
  post::Post,
  user::{Credentials, User},
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row (hash column excluded).
pub struct RawUser {
  pub user_id:    String,
  pub email:      String,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      email:      self.email,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `users` row including the password hash.
/// Only the credentials lookup produces this.
pub struct RawCredentials {
  pub user_id:       String,
  pub email:         String,
  pub password_hash: String,
}

impl RawCredentials {
  pub fn into_credentials(self) -> Result<Credentials> {
    Ok(Credentials {
      user_id:       decode_uuid(&self.user_id)?,
      email:         self.email,
      password_hash: self.password_hash,
    })
  }
}

/// Raw values read directly from a `posts` row.
pub struct RawPost {
  pub post_id:    String,
  pub author_id:  String,
  pub content:    String,
  pub created_at: String,
  pub like_count: i64,
}

impl RawPost {
  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:    decode_uuid(&self.post_id)?,
      author_id:  decode_uuid(&self.author_id)?,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
      like_count: self.like_count,
    })
  }
}

/// Raw values from a `posts` row joined with its author's `users` row.
pub struct RawPostRow {
  // posts columns
  pub post_id:           String,
  pub author_id:         String,
  pub content:           String,
  pub created_at:        String,
  pub like_count:        i64,
  // users join
  pub author_email:      String,
  pub author_created_at: String,
}

impl RawPostRow {
  /// Decode into the post and its author; the caller attaches comments.
  pub fn into_parts(self) -> Result<(Post, User)> {
    let author_id = decode_uuid(&self.author_id)?;

    let post = Post {
      post_id:    decode_uuid(&self.post_id)?,
      author_id,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
      like_count: self.like_count,
    };
    let author = User {
      user_id:    author_id,
      email:      self.author_email,
      created_at: decode_dt(&self.author_created_at)?,
    };

    Ok((post, author))
  }
}

/// Raw values from a `comments` row joined with its author's `users` row.
pub struct RawCommentRow {
  // comments columns
  pub comment_id:        String,
  pub post_id:           String,
  pub author_id:         String,
  pub content:           String,
  pub created_at:        String,
  // users join
  pub author_email:      String,
  pub author_created_at: String,
}

impl RawCommentRow {
  pub fn into_view(self) -> Result<CommentView> {
    let author_id = decode_uuid(&self.author_id)?;

    Ok(CommentView {
      comment: Comment {
        comment_id: decode_uuid(&self.comment_id)?,
        post_id:    decode_uuid(&self.post_id)?,
        author_id,
        content:    self.content,
        created_at: decode_dt(&self.created_at)?,
      },
      author:  User {
        user_id:    author_id,
        email:      self.author_email,
        created_at: decode_dt(&self.author_created_at)?,
      },
    })
  }
}
