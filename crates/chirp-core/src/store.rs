//! The `SocialStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `chirp-store-sqlite`).
//! The HTTP layer (`chirp-http`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  comment::{CommentView, NewComment},
  post::{NewPost, Post, PostView},
  user::{Credentials, NewUser, User},
};

/// Abstraction over a Chirp storage backend.
///
/// Checks that pair with a mutation (duplicate email before insert, post
/// existence before comment insert) are performed by the backend within a
/// single serialized operation, so callers get a consistent answer without
/// holding locks of their own.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SocialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a new account. `user_id` and `created_at` are
  /// assigned by the store. Fails if the email is already registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by UUID. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up the stored credentials for an email, exact match.
  /// This is the only read that exposes the password hash.
  fn find_credentials<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Credentials>, Self::Error>> + Send + 'a;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Persist a new post with a zero like count and return it.
  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Retrieve a post with author and comments resolved.
  /// Returns `None` if not found.
  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<PostView>, Self::Error>> + Send + '_;

  /// List every post, newest first, with authors and comments resolved.
  fn list_posts(
    &self,
  ) -> impl Future<Output = Result<Vec<PostView>, Self::Error>> + Send + '_;

  /// Replace a post's content. Id, author, timestamp, and like count are
  /// untouched. Errors if the post does not exist.
  fn update_post_content(
    &self,
    id: Uuid,
    content: String,
  ) -> impl Future<Output = Result<PostView, Self::Error>> + Send + '_;

  /// Permanently delete a post and its comments.
  /// Errors if the post does not exist.
  fn delete_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Add one like to a post and return it as stored after the increment.
  ///
  /// The increment is a single atomic operation in the backend; concurrent
  /// callers never lose updates. Errors if the post does not exist.
  fn like_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Persist a new comment and return it with its author resolved.
  /// Errors if the referenced post does not exist.
  fn create_comment(
    &self,
    input: NewComment,
  ) -> impl Future<Output = Result<CommentView, Self::Error>> + Send + '_;

  /// List every comment across all posts, newest first, authors resolved.
  fn list_comments(
    &self,
  ) -> impl Future<Output = Result<Vec<CommentView>, Self::Error>> + Send + '_;
}
