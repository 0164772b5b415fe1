//! The built-in session provider: opaque bearer tokens over the `users` and
//! `sessions` tables.
//!
//! Tokens are 32 random bytes, hex-encoded, handed to the caller once. Only
//! their SHA-256 digest is stored.

use chrono::Duration;
use inmo_core::{actor::Identity, session::SessionProvider};
use rand_core::{OsRng, RngCore as _};
use rusqlite::{OptionalExtension as _, params};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
  Result, SqliteStore,
  encode::{decode_dt, decode_uuid, encode_dt, encode_uuid, now},
};

fn new_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

fn hash_token(token: &str) -> String { hex::encode(Sha256::digest(token.as_bytes())) }

impl SqliteStore {
  /// Return the identity registered under `email`, creating it if needed.
  pub async fn register_identity(&self, email: &str) -> Result<Identity> {
    let email = email.trim().to_owned();
    let new_id = encode_uuid(Uuid::new_v4());
    let at_str = encode_dt(now());

    let (id_str, email) = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, email, created_at) VALUES (?1, ?2, ?3)
           ON CONFLICT (email) DO NOTHING",
          params![new_id, email, at_str],
        )?;
        let id_str: String = conn.query_row(
          "SELECT user_id FROM users WHERE email = ?1",
          [&email],
          |row| row.get(0),
        )?;
        Ok((id_str, email))
      })
      .await?;

    Ok(Identity { user_id: decode_uuid(&id_str)?, email })
  }

  /// Start a session for `user_id` lasting `ttl`. Returns the plaintext
  /// token; it cannot be recovered later.
  pub async fn issue_session(&self, user_id: Uuid, ttl: Duration) -> Result<String> {
    let token = new_token();
    let hash = hash_token(&token);
    let user_str = encode_uuid(user_id);
    let created = now();
    let created_str = encode_dt(created);
    let expires_str = encode_dt(created + ttl);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
           VALUES (?1, ?2, ?3, ?4)",
          params![hash, user_str, created_str, expires_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::info!(user = %user_id, "session issued");
    Ok(token)
  }

  /// End the session behind `token`. Returns whether one existed.
  pub async fn revoke_session(&self, token: &str) -> Result<bool> {
    let hash = hash_token(token);
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM sessions WHERE token_hash = ?1", [&hash])?))
      .await?;
    Ok(removed > 0)
  }
}

impl SessionProvider for SqliteStore {
  type Error = crate::Error;

  async fn identity(&self, token: &str) -> Result<Option<Identity>> {
    let hash = hash_token(token);

    let row: Option<(String, String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT u.user_id, u.email, s.expires_at
               FROM sessions s
               JOIN users u ON u.user_id = s.user_id
               WHERE s.token_hash = ?1",
              [&hash],
              |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?,
        )
      })
      .await?;

    let Some((id_str, email, expires_str)) = row else {
      return Ok(None);
    };
    if decode_dt(&expires_str)? <= now() {
      return Ok(None);
    }
    Ok(Some(Identity { user_id: decode_uuid(&id_str)?, email }))
  }
}
