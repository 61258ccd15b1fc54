//! Error types for `chirp-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("an account already exists for email {0:?}")]
  DuplicateEmail(String),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("post not found: {0}")]
  PostNotFound(Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
