//! Handlers for `/auth` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Body: `{"email":"…","password":"…"}` |
//! | `POST` | `/auth/login` | Returns a bearer token for the session |

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{Json, extract::State};
use chirp_core::{
  store::SocialStore,
  user::{NewUser, User},
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};

use crate::{AppState, error::Error};

// ─── Register ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

/// `POST /auth/register` — body: `{"email":"…","password":"…"}`
///
/// Returns the created account. The password is hashed with argon2 before it
/// reaches the store; the hash never appears in any response.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<Json<User>, Error>
where
  S: SocialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (email, password) = match (body.email, body.password) {
    (Some(e), Some(p)) if !e.is_empty() && !p.is_empty() => (e, p),
    _ => {
      return Err(Error::InvalidInput(
        "email and password are required".to_string(),
      ));
    }
  };

  let existing = state
    .store
    .find_credentials(&email)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  if existing.is_some() {
    return Err(Error::DuplicateAccount);
  }

  let salt = SaltString::generate(&mut OsRng);
  let password_hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| Error::Hash(e.to_string()))?
    .to_string();

  let user = state
    .store
    .create_user(NewUser { email, password_hash })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok(Json(user))
}

// ─── Login ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

/// The successful login payload: the account, a bearer token, and how long
/// the token stays valid (seconds).
#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub user:       User,
  pub token:      String,
  pub expires_in: i64,
}

/// `POST /auth/login` — body: `{"email":"…","password":"…"}`
///
/// Failures are indistinguishable on purpose: an unknown email and a wrong
/// password both produce the same 401.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, Error>
where
  S: SocialStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (email, password) = match (body.email, body.password) {
    (Some(e), Some(p)) => (e, p),
    _ => return Err(Error::InvalidCredentials),
  };

  let creds = state
    .store
    .find_credentials(&email)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::InvalidCredentials)?;

  let parsed_hash = PasswordHash::new(&creds.password_hash)
    .map_err(|_| Error::InvalidCredentials)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::InvalidCredentials)?;

  let user = state
    .store
    .get_user(creds.user_id)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?
    .ok_or(Error::InvalidCredentials)?;

  let token = state.session.mint(&user)?;
  let expires_in = state.session.ttl_seconds();

  Ok(Json(LoginResponse { user, token, expires_in }))
}
