// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signed session cookies.
//!
//! The cookie value is `hex(username).issued_at.hex(tag)`, where `issued_at`
//! is a Unix timestamp in seconds and `tag` is the HMAC-SHA256 of everything
//! before the last dot. No session state is kept on the server: a cookie is
//! valid when its signature verifies under the process key and it is younger
//! than the configured lifetime.

use std::time::Duration;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chatscreen_auth::Session;
use chatscreen_core::ChatscreenError;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use time::OffsetDateTime;

use crate::server::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "chatscreen_session";

/// Length of a generated key, in bytes.
const GENERATED_KEY_LEN: usize = 32;

/// Clock skew tolerated for cookies issued in the future, in seconds.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

type HmacSha256 = Hmac<Sha256>;

/// HMAC key that signs and verifies session cookies.
#[derive(Clone)]
pub struct SessionKey {
    mac: HmacSha256,
    ttl: time::Duration,
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKey")
            .field("key", &"[redacted]")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionKey {
    /// Use `secret` when configured, otherwise a random per-process key.
    /// Cookies older than `ttl` are rejected.
    ///
    /// With a random key every restart logs all clients out.
    pub fn from_secret(secret: Option<&str>, ttl: Duration) -> Result<Self, ChatscreenError> {
        match secret {
            Some(secret) => Self::from_bytes(secret.as_bytes(), ttl),
            None => Self::generate(ttl),
        }
    }

    pub fn generate(ttl: Duration) -> Result<Self, ChatscreenError> {
        let mut key = [0u8; GENERATED_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        Self::from_bytes(&key, ttl)
    }

    fn from_bytes(key: &[u8], ttl: Duration) -> Result<Self, ChatscreenError> {
        let mac = HmacSha256::new_from_slice(key)
            .map_err(|e| ChatscreenError::Config(format!("invalid session key: {e}")))?;
        let ttl = time::Duration::try_from(ttl)
            .map_err(|e| ChatscreenError::Config(format!("invalid session lifetime: {e}")))?;
        Ok(Self { mac, ttl })
    }

    fn tag(&self, payload: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(payload.as_bytes());
        mac
    }

    /// Cookie value binding `username`, issued now.
    pub fn sign(&self, username: &str) -> String {
        self.sign_at(username, now())
    }

    /// Cookie value binding `username`, issued at Unix time `issued_at`.
    pub fn sign_at(&self, username: &str, issued_at: i64) -> String {
        let payload = format!("{}.{issued_at}", hex::encode(username));
        let tag = self.tag(&payload).finalize().into_bytes();
        format!("{payload}.{}", hex::encode(tag))
    }

    /// The username in `value`, if its signature verifies and it has not
    /// expired.
    pub fn verify(&self, value: &str) -> Option<String> {
        self.verify_at(value, now())
    }

    /// Like [`verify`](Self::verify), judged at Unix time `now`.
    pub fn verify_at(&self, value: &str, now: i64) -> Option<String> {
        let (payload, tag_hex) = value.rsplit_once('.')?;
        let (name_hex, issued_at) = payload.split_once('.')?;
        let tag = hex::decode(tag_hex).ok()?;
        self.tag(payload).verify_slice(&tag).ok()?;

        let issued_at: i64 = issued_at.parse().ok()?;
        let age = now.checked_sub(issued_at)?;
        if age < -MAX_CLOCK_SKEW_SECS || age > self.ttl.whole_seconds() {
            return None;
        }

        String::from_utf8(hex::decode(name_hex).ok()?).ok()
    }

    /// Session carried by `jar`; anything missing, forged or expired is
    /// anonymous.
    pub fn session_from(&self, jar: &CookieJar) -> Session {
        jar.get(SESSION_COOKIE)
            .and_then(|cookie| self.verify(cookie.value()))
            .map(Session::authenticated)
            .unwrap_or_default()
    }

    /// Cookie that binds the client to `username` for the session lifetime.
    pub fn login_cookie(&self, username: &str) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, self.sign(username)))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(self.ttl)
            .build()
    }
}

fn now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Expired, empty session cookie. The path must match the one it was set
/// with.
///
/// Meant for `CookieJar::add`, so the header is sent even when the request
/// carried no session cookie.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE).path("/").build();
    cookie.make_removal();
    cookie
}

/// The request's session, decoded from its cookie.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(CurrentSession(state.session_key.session_from(&jar)))
    }
}
