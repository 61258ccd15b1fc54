//! User — the registered account a request acts as.
//!
//! The password hash never travels with the user. It lives in the separate
//! [`Credentials`] lookup type, which deliberately implements no serde
//! traits so no response body can carry it by accident.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account. Immutable after registration; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  /// Unique. Stored and compared case-sensitively.
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

/// The stored login secret for an account, fetched only by the login flow.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user_id:       Uuid,
  pub email:         String,
  /// Argon2 PHC string (`$argon2id$...`).
  pub password_hash: String,
}

/// Input to [`crate::store::SocialStore::create_user`].
/// `user_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub email:         String,
  pub password_hash: String,
}
