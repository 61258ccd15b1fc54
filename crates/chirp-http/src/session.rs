//! Bearer-token sessions: minting, verification, and the axum extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{
  DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::Error};
use chirp_core::store::SocialStore;
use chirp_core::user::User;

/// Signing material and lifetime for session tokens.
pub struct SessionKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl:      Duration,
}

/// Claims carried inside a session token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  /// The user id, as a hyphenated UUID string.
  sub:   String,
  email: String,
  iat:   i64,
  exp:   i64,
}

impl SessionKeys {
  pub fn new(secret: &str, ttl_minutes: i64) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      ttl:      Duration::minutes(ttl_minutes),
    }
  }

  /// Token lifetime in seconds, as reported to clients at login.
  pub fn ttl_seconds(&self) -> i64 {
    self.ttl.num_seconds()
  }

  /// Mint a signed token for `user`, valid from now until now plus the
  /// configured lifetime.
  pub fn mint(&self, user: &User) -> Result<String, Error> {
    let now = Utc::now();
    let claims = Claims {
      sub:   user.user_id.to_string(),
      email: user.email.clone(),
      iat:   now.timestamp(),
      exp:   (now + self.ttl).timestamp(),
    };
    Ok(encode(&Header::default(), &claims, &self.encoding)?)
  }

  /// Verify a token and return the session it encodes.
  ///
  /// All verification failures collapse to [`Error::Unauthenticated`];
  /// the caller learns nothing about why.
  pub fn verify(&self, token: &str) -> Result<Session, Error> {
    let data = decode::<Claims>(token, &self.decoding, &Validation::default())
      .map_err(|_| Error::Unauthenticated)?;
    let user_id =
      Uuid::parse_str(&data.claims.sub).map_err(|_| Error::Unauthenticated)?;
    Ok(Session { user_id, email: data.claims.email })
  }
}

/// An authenticated caller — present in a handler means the request carried
/// a valid session token.
#[derive(Debug, Clone)]
pub struct Session {
  pub user_id: Uuid,
  pub email:   String,
}

impl<S> FromRequestParts<AppState<S>> for Session
where
  S: SocialStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let header_val = parts
      .headers
      .get(axum::http::header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .ok_or(Error::Unauthenticated)?;

    let token = header_val
      .strip_prefix("Bearer ")
      .ok_or(Error::Unauthenticated)?;

    state.session.verify(token)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;
  use std::sync::Arc;
  use axum::http::{Request, header};
  use crate::{AppState, ServerConfig};

  // A minimal no-op store: session extraction never touches it.
  #[derive(Clone)]
  struct NoopStore;

  impl chirp_core::store::SocialStore for NoopStore {
    type Error = std::convert::Infallible;
    async fn create_user(&self, _: chirp_core::user::NewUser) -> Result<chirp_core::user::User, Self::Error> { unimplemented!() }
    async fn get_user(&self, _: uuid::Uuid) -> Result<Option<chirp_core::user::User>, Self::Error> { unimplemented!() }
    async fn find_credentials(&self, _: &str) -> Result<Option<chirp_core::user::Credentials>, Self::Error> { unimplemented!() }
    async fn create_post(&self, _: chirp_core::post::NewPost) -> Result<chirp_core::post::Post, Self::Error> { unimplemented!() }
    async fn get_post(&self, _: uuid::Uuid) -> Result<Option<chirp_core::post::PostView>, Self::Error> { unimplemented!() }
    async fn list_posts(&self) -> Result<Vec<chirp_core::post::PostView>, Self::Error> { unimplemented!() }
    async fn update_post_content(&self, _: uuid::Uuid, _: String) -> Result<chirp_core::post::PostView, Self::Error> { unimplemented!() }
    async fn delete_post(&self, _: uuid::Uuid) -> Result<(), Self::Error> { unimplemented!() }
    async fn like_post(&self, _: uuid::Uuid) -> Result<chirp_core::post::Post, Self::Error> { unimplemented!() }
    async fn create_comment(&self, _: chirp_core::comment::NewComment) -> Result<chirp_core::comment::CommentView, Self::Error> { unimplemented!() }
    async fn list_comments(&self) -> Result<Vec<chirp_core::comment::CommentView>, Self::Error> { unimplemented!() }
  }

  fn make_state(secret: &str, ttl_minutes: i64) -> AppState<NoopStore> {
    AppState {
      store:   Arc::new(NoopStore),
      config:  Arc::new(ServerConfig {
        host:                "127.0.0.1".to_string(),
        port:                3000,
        store_path:          PathBuf::from(":memory:"),
        session_secret:      secret.to_string(),
        session_ttl_minutes: ttl_minutes,
      }),
      session: Arc::new(SessionKeys::new(secret, ttl_minutes)),
    }
  }

  fn demo_user() -> User {
    User {
      user_id:    Uuid::new_v4(),
      email:      "alice@example.com".to_string(),
      created_at: Utc::now(),
    }
  }

  async fn extract(
    req: Request<axum::body::Body>,
    state: &AppState<NoopStore>,
  ) -> Result<Session, Error> {
    let (mut parts, _) = req.into_parts();
    Session::from_request_parts(&mut parts, state).await
  }

  fn bearer(token: &str) -> String {
    format!("Bearer {token}")
  }

  #[tokio::test]
  async fn valid_token() {
    let state = make_state("secret", 60);
    let user = demo_user();
    let token = state.session.mint(&user).unwrap();
    let req = Request::builder()
      .header(header::AUTHORIZATION, bearer(&token))
      .body(axum::body::Body::empty()).unwrap();
    let session = extract(req, &state).await.unwrap();
    assert_eq!(session.user_id, user.user_id);
    assert_eq!(session.email, user.email);
  }

  #[tokio::test]
  async fn missing_header() {
    let state = make_state("secret", 60);
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(Error::Unauthenticated)
    ));
  }

  #[tokio::test]
  async fn wrong_scheme() {
    let state = make_state("secret", 60);
    let token = state.session.mint(&demo_user()).unwrap();
    let req = Request::builder()
      .header(header::AUTHORIZATION, format!("Basic {token}"))
      .body(axum::body::Body::empty()).unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(Error::Unauthenticated)
    ));
  }

  #[tokio::test]
  async fn garbage_token() {
    let state = make_state("secret", 60);
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Bearer not-a-token")
      .body(axum::body::Body::empty()).unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(Error::Unauthenticated)
    ));
  }

  #[tokio::test]
  async fn tampered_token() {
    let state = make_state("secret", 60);
    let other = make_state("a different secret", 60);
    let token = other.session.mint(&demo_user()).unwrap();
    let req = Request::builder()
      .header(header::AUTHORIZATION, bearer(&token))
      .body(axum::body::Body::empty()).unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(Error::Unauthenticated)
    ));
  }

  #[tokio::test]
  async fn expired_token() {
    // exp two hours in the past, far beyond the default leeway.
    let state = make_state("secret", -120);
    let token = state.session.mint(&demo_user()).unwrap();
    let req = Request::builder()
      .header(header::AUTHORIZATION, bearer(&token))
      .body(axum::body::Body::empty()).unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(Error::Unauthenticated)
    ));
  }
}
