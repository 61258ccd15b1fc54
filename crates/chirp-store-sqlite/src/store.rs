//! [`SqliteStore`] — the SQLite implementation of [`SocialStore`].

use std::{collections::HashMap, path::Path};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use chirp_core::{
  comment::{Comment, CommentView, NewComment},
  post::{NewPost, Post, PostView},
  store::SocialStore,
  user::{Credentials, NewUser, User},
};

use crate::{
  encode::{
    encode_dt, encode_uuid, RawCommentRow, RawCredentials, RawPost, RawPostRow,
    RawUser,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Chirp social store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// operations run as closures on the connection's dedicated thread, so a
/// multi-step operation is never interleaved with another.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SocialStore impl ────────────────────────────────────────────────────────

impl SocialStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:    Uuid::new_v4(),
      email:      input.email,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(user.user_id);
    let email  = user.email.clone();
    let hash   = input.password_hash;
    let at_str = encode_dt(user.created_at);

    // Uniqueness check and insert share one closure; the UNIQUE constraint
    // is the backstop for access from outside this process.
    let taken: bool = self
      .conn
      .call(move |conn| {
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if taken {
          return Ok(true);
        }

        conn.execute(
          "INSERT INTO users (user_id, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, email, hash, at_str],
        )?;
        Ok(false)
      })
      .await?;

    if taken {
      return Err(chirp_core::Error::DuplicateEmail(user.email).into());
    }

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, email, created_at FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawUser {
                user_id:    row.get(0)?,
                email:      row.get(1)?,
                created_at: row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>> {
    let email = email.to_owned();

    let raw: Option<RawCredentials> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT user_id, email, password_hash FROM users WHERE email = ?1",
            rusqlite::params![email],
            |row| {
              Ok(RawCredentials {
                user_id:       row.get(0)?,
                email:         row.get(1)?,
                password_hash: row.get(2)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCredentials::into_credentials).transpose()
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn create_post(&self, input: NewPost) -> Result<Post> {
    let post = Post {
      post_id:    Uuid::new_v4(),
      author_id:  input.author_id,
      content:    input.content,
      created_at: Utc::now(),
      like_count: 0,
    };

    let id_str     = encode_uuid(post.post_id);
    let author_str = encode_uuid(post.author_id);
    let content    = post.content.clone();
    let at_str     = encode_dt(post.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, author_id, content, created_at, like_count)
           VALUES (?1, ?2, ?3, ?4, 0)",
          rusqlite::params![id_str, author_str, content, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn get_post(&self, id: Uuid) -> Result<Option<PostView>> {
    let id_str = encode_uuid(id);

    let (raw_post, raw_comments): (Option<RawPostRow>, Vec<RawCommentRow>) =
      self
        .conn
        .call(move |conn| {
          let raw_post = conn
            .query_row(
              "SELECT p.post_id, p.author_id, p.content, p.created_at,
                      p.like_count, u.email, u.created_at
               FROM posts p
               JOIN users u ON u.user_id = p.author_id
               WHERE p.post_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawPostRow {
                  post_id:           row.get(0)?,
                  author_id:         row.get(1)?,
                  content:           row.get(2)?,
                  created_at:        row.get(3)?,
                  like_count:        row.get(4)?,
                  author_email:      row.get(5)?,
                  author_created_at: row.get(6)?,
                })
              },
            )
            .optional()?;

          if raw_post.is_none() {
            return Ok((None, Vec::new()));
          }

          let mut stmt = conn.prepare(
            "SELECT c.comment_id, c.post_id, c.author_id, c.content,
                    c.created_at, u.email, u.created_at
             FROM comments c
             JOIN users u ON u.user_id = c.author_id
             WHERE c.post_id = ?1
             ORDER BY c.created_at ASC, c.rowid ASC",
          )?;
          let raw_comments = stmt
            .query_map(rusqlite::params![id_str], |row| {
              Ok(RawCommentRow {
                comment_id:        row.get(0)?,
                post_id:           row.get(1)?,
                author_id:         row.get(2)?,
                content:           row.get(3)?,
                created_at:        row.get(4)?,
                author_email:      row.get(5)?,
                author_created_at: row.get(6)?,
              })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

          Ok((raw_post, raw_comments))
        })
        .await?;

    let raw_post = match raw_post {
      Some(raw) => raw,
      None      => return Ok(None),
    };

    let (post, author) = raw_post.into_parts()?;
    let comments = raw_comments
      .into_iter()
      .map(RawCommentRow::into_view)
      .collect::<Result<Vec<_>>>()?;

    Ok(Some(PostView { post, author, comments }))
  }

  async fn list_posts(&self) -> Result<Vec<PostView>> {
    let (raw_posts, raw_comments): (Vec<RawPostRow>, Vec<RawCommentRow>) = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT p.post_id, p.author_id, p.content, p.created_at,
                  p.like_count, u.email, u.created_at
           FROM posts p
           JOIN users u ON u.user_id = p.author_id
           ORDER BY p.created_at DESC, p.rowid DESC",
        )?;
        let raw_posts = stmt
          .query_map([], |row| {
            Ok(RawPostRow {
              post_id:           row.get(0)?,
              author_id:         row.get(1)?,
              content:           row.get(2)?,
              created_at:        row.get(3)?,
              like_count:        row.get(4)?,
              author_email:      row.get(5)?,
              author_created_at: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT c.comment_id, c.post_id, c.author_id, c.content,
                  c.created_at, u.email, u.created_at
           FROM comments c
           JOIN users u ON u.user_id = c.author_id
           ORDER BY c.created_at ASC, c.rowid ASC",
        )?;
        let raw_comments = stmt
          .query_map([], |row| {
            Ok(RawCommentRow {
              comment_id:        row.get(0)?,
              post_id:           row.get(1)?,
              author_id:         row.get(2)?,
              content:           row.get(3)?,
              created_at:        row.get(4)?,
              author_email:      row.get(5)?,
              author_created_at: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((raw_posts, raw_comments))
      })
      .await?;

    let mut by_post: HashMap<Uuid, Vec<CommentView>> = HashMap::new();
    for raw in raw_comments {
      let view = raw.into_view()?;
      by_post.entry(view.comment.post_id).or_default().push(view);
    }

    raw_posts
      .into_iter()
      .map(|raw| {
        let (post, author) = raw.into_parts()?;
        let comments = by_post.remove(&post.post_id).unwrap_or_default();
        Ok(PostView { post, author, comments })
      })
      .collect()
  }

  async fn update_post_content(
    &self,
    id: Uuid,
    content: String,
  ) -> Result<PostView> {
    let id_str = encode_uuid(id);

    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE posts SET content = ?2 WHERE post_id = ?1",
          rusqlite::params![id_str, content],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(chirp_core::Error::PostNotFound(id).into());
    }

    match self.get_post(id).await? {
      Some(view) => Ok(view),
      None       => Err(chirp_core::Error::PostNotFound(id).into()),
    }
  }

  async fn delete_post(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let deleted: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM posts WHERE post_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(chirp_core::Error::PostNotFound(id).into());
    }
    Ok(())
  }

  async fn like_post(&self, id: Uuid) -> Result<Post> {
    let id_str = encode_uuid(id);

    // One closure for the increment and the read-back, so the returned
    // like_count is the row as this like left it.
    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        let updated = conn.execute(
          "UPDATE posts SET like_count = like_count + 1 WHERE post_id = ?1",
          rusqlite::params![id_str],
        )?;
        if updated == 0 {
          return Ok(None);
        }

        let raw = conn.query_row(
          "SELECT post_id, author_id, content, created_at, like_count
           FROM posts WHERE post_id = ?1",
          rusqlite::params![id_str],
          |row| {
            Ok(RawPost {
              post_id:    row.get(0)?,
              author_id:  row.get(1)?,
              content:    row.get(2)?,
              created_at: row.get(3)?,
              like_count: row.get(4)?,
            })
          },
        )?;
        Ok(Some(raw))
      })
      .await?;

    match raw {
      Some(raw) => raw.into_post(),
      None      => Err(chirp_core::Error::PostNotFound(id).into()),
    }
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn create_comment(&self, input: NewComment) -> Result<CommentView> {
    let comment = Comment {
      comment_id: Uuid::new_v4(),
      post_id:    input.post_id,
      author_id:  input.author_id,
      content:    input.content,
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(comment.comment_id);
    let post_str   = encode_uuid(comment.post_id);
    let author_str = encode_uuid(comment.author_id);
    let content    = comment.content.clone();
    let at_str     = encode_dt(comment.created_at);

    // Post-existence check, author fetch, and insert share one closure so
    // the post cannot be deleted between the check and the insert.
    let (post_exists, raw_author): (bool, Option<RawUser>) = self
      .conn
      .call(move |conn| {
        let post_exists: bool = conn
          .query_row(
            "SELECT 1 FROM posts WHERE post_id = ?1",
            rusqlite::params![post_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);

        if !post_exists {
          return Ok((false, None));
        }

        let raw_author: Option<RawUser> = conn
          .query_row(
            "SELECT user_id, email, created_at FROM users WHERE user_id = ?1",
            rusqlite::params![author_str],
            |row| {
              Ok(RawUser {
                user_id:    row.get(0)?,
                email:      row.get(1)?,
                created_at: row.get(2)?,
              })
            },
          )
          .optional()?;

        if raw_author.is_none() {
          return Ok((true, None));
        }

        conn.execute(
          "INSERT INTO comments (comment_id, post_id, author_id, content, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, post_str, author_str, content, at_str],
        )?;

        Ok((true, raw_author))
      })
      .await?;

    if !post_exists {
      return Err(chirp_core::Error::PostNotFound(comment.post_id).into());
    }

    let author = match raw_author {
      Some(raw) => raw.into_user()?,
      None => {
        return Err(chirp_core::Error::UserNotFound(comment.author_id).into());
      }
    };

    Ok(CommentView { comment, author })
  }

  async fn list_comments(&self) -> Result<Vec<CommentView>> {
    let raws: Vec<RawCommentRow> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT c.comment_id, c.post_id, c.author_id, c.content,
                  c.created_at, u.email, u.created_at
           FROM comments c
           JOIN users u ON u.user_id = c.author_id
           ORDER BY c.created_at DESC, c.rowid DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawCommentRow {
              comment_id:        row.get(0)?,
              post_id:           row.get(1)?,
              author_id:         row.get(2)?,
              content:           row.get(3)?,
              created_at:        row.get(4)?,
              author_email:      row.get(5)?,
              author_created_at: row.get(6)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCommentRow::into_view).collect()
  }
}
