// SPDX-FileCopyrightText: 2026 Chatscreen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Account registration, login and profile updates.

use std::sync::Arc;

use chatscreen_config::model::AuthConfig;
use chatscreen_core::{AuthError, ChatscreenError, CredentialStore, UserProfile};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::hash::Argon2Hasher;
use crate::policy;
use crate::session::Session;

/// Highest age accepted by [`AuthService::update_age`].
pub const MAX_AGE: i64 = 150;

/// Password verified against for unknown usernames, so a miss costs the
/// same as a wrong password.
const DUMMY_PASSWORD: &str = "dummy-password-for-timing";

/// Account operations over a [`CredentialStore`].
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: Argon2Hasher,
    dummy_hash: OnceCell<String>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, config: &AuthConfig) -> Result<Self, ChatscreenError> {
        Ok(Self {
            store,
            hasher: Argon2Hasher::new(config)?,
            dummy_hash: OnceCell::new(),
        })
    }

    /// Create an account.
    ///
    /// Checks run in a fixed order and the first failure wins: empty
    /// username, password mismatch, username taken, weak password.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<String, ChatscreenError> {
        if username.is_empty() {
            return Err(AuthError::EmptyUsername.into());
        }
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch.into());
        }
        if self.store.find_user(username).await?.is_some() {
            return Err(AuthError::UsernameTaken.into());
        }
        let violations = policy::validate(password);
        if !violations.is_empty() {
            return Err(AuthError::WeakPassword(violations).into());
        }

        let hash = self.hasher.hash(password).await?;
        match self.store.create_user(username, &hash).await {
            Ok(_) => {}
            // Lost a race with a concurrent registration.
            Err(ChatscreenError::AlreadyExists { .. }) => {
                return Err(AuthError::UsernameTaken.into());
            }
            Err(e) => return Err(e),
        }

        info!(username = %username, "user registered");
        Ok(format!("User '{username}' registered successfully!"))
    }

    /// Verify credentials and bind `session` to the user.
    ///
    /// Unknown users and wrong passwords give the same
    /// [`AuthError::InvalidCredentials`]. On failure `session` is untouched.
    pub async fn login(
        &self,
        session: &mut Session,
        username: &str,
        password: &str,
    ) -> Result<String, ChatscreenError> {
        let verified = match self.store.find_user(username).await? {
            Some(user) => self.hasher.verify(password, &user.password_hash).await?,
            None => {
                let dummy = self.dummy_hash().await?;
                let _ = self.hasher.verify(password, dummy).await?;
                false
            }
        };

        if !verified {
            debug!(username = %username, "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }

        session.bind(username);
        info!(username = %username, "user logged in");
        Ok(format!("Login successful! Welcome, {username}."))
    }

    /// Clear the binding. Logging out an anonymous session is fine.
    pub fn logout(&self, session: &mut Session) -> String {
        if let Some(username) = session.username() {
            info!(username = %username, "user logged out");
        }
        session.clear();
        "Logged out successfully".to_string()
    }

    /// Set the logged-in user's age.
    pub async fn update_age(&self, session: &Session, age: i64) -> Result<String, ChatscreenError> {
        let username = session.require_user()?;
        if !(0..=MAX_AGE).contains(&age) {
            return Err(AuthError::InvalidAge(age).into());
        }
        let age = u32::try_from(age).map_err(|_| AuthError::InvalidAge(age))?;

        self.store
            .update_age(username, age)
            .await
            .map_err(stale_session)?;
        debug!(username = %username, age, "age updated");
        Ok("Age updated successfully.".to_string())
    }

    /// Replace the logged-in user's password after re-verifying the current one.
    pub async fn change_password(
        &self,
        session: &Session,
        current_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> Result<String, ChatscreenError> {
        let username = session.require_user()?;
        let user = self
            .store
            .find_user(username)
            .await?
            .ok_or(AuthError::NotAuthenticated)?;

        if !self.hasher.verify(current_password, &user.password_hash).await? {
            return Err(AuthError::InvalidCredentials.into());
        }
        if new_password != confirm_password {
            return Err(AuthError::PasswordMismatch.into());
        }
        let violations = policy::validate(new_password);
        if !violations.is_empty() {
            return Err(AuthError::WeakPassword(violations).into());
        }

        let hash = self.hasher.hash(new_password).await?;
        self.store
            .update_password(username, &hash)
            .await
            .map_err(stale_session)?;
        info!(username = %username, "password changed");
        Ok("Password updated successfully.".to_string())
    }

    /// Username and age of the logged-in user.
    pub async fn profile(&self, session: &Session) -> Result<UserProfile, ChatscreenError> {
        let username = session.require_user()?;
        let user = self
            .store
            .find_user(username)
            .await?
            .ok_or(AuthError::NotAuthenticated)?;
        Ok(UserProfile::from(&user))
    }

    async fn dummy_hash(&self) -> Result<&str, ChatscreenError> {
        self.dummy_hash
            .get_or_try_init(|| self.hasher.hash(DUMMY_PASSWORD))
            .await
            .map(String::as_str)
    }
}

/// A session naming a user the store no longer has is treated as logged out.
fn stale_session(err: ChatscreenError) -> ChatscreenError {
    match err {
        ChatscreenError::NotFound { .. } => AuthError::NotAuthenticated.into(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatscreen_config::model::StorageConfig;
    use chatscreen_core::StorageAdapter;
    use chatscreen_storage::SqliteStorage;
    use tempfile::tempdir;

    const GOOD: &str = "Secret1!";

    fn fast_config() -> AuthConfig {
        AuthConfig {
            hash_memory_cost: 1024,
            hash_iterations: 1,
            hash_parallelism: 1,
        }
    }

    async fn setup() -> (Arc<AuthService>, Arc<SqliteStorage>, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: dir.path().join("auth.db").to_str().unwrap().to_string(),
            wal_mode: true,
        }));
        storage.initialize().await.unwrap();
        let service = AuthService::new(storage.clone(), &fast_config()).unwrap();
        (Arc::new(service), storage, dir)
    }

    fn auth_err(result: Result<String, ChatscreenError>) -> AuthError {
        match result {
            Err(ChatscreenError::Auth(e)) => e,
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let (service, store, _dir) = setup().await;

        let msg = service.register("alice", GOOD, GOOD).await.unwrap();
        assert_eq!(msg, "User 'alice' registered successfully!");

        let stored = store.find_user("alice").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, GOOD);

        let mut session = Session::default();
        let msg = service.login(&mut session, "alice", GOOD).await.unwrap();
        assert_eq!(msg, "Login successful! Welcome, alice.");
        assert_eq!(session.username(), Some("alice"));
    }

    #[tokio::test]
    async fn register_check_precedence() {
        let (service, _store, _dir) = setup().await;
        service.register("taken", GOOD, GOOD).await.unwrap();

        // empty username beats mismatch
        assert_eq!(
            auth_err(service.register("", "a", "b").await),
            AuthError::EmptyUsername
        );
        // mismatch beats taken
        assert_eq!(
            auth_err(service.register("taken", GOOD, "other").await),
            AuthError::PasswordMismatch
        );
        // taken beats weak
        assert_eq!(
            auth_err(service.register("taken", "weak", "weak").await),
            AuthError::UsernameTaken
        );
    }

    #[tokio::test]
    async fn weak_password_lists_violations() {
        let (service, store, _dir) = setup().await;

        match auth_err(service.register("bob", "abc", "abc").await) {
            AuthError::WeakPassword(v) => assert_eq!(v, policy::validate("abc")),
            other => panic!("expected WeakPassword, got {other:?}"),
        }
        assert!(store.find_user("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_registration_has_one_winner() {
        let (service, _store, _dir) = setup().await;

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.register("racer", GOOD, GOOD).await })
            })
            .collect();

        let mut wins = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(ChatscreenError::Auth(AuthError::UsernameTaken)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(wins, 1);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (service, _store, _dir) = setup().await;
        service.register("alice", GOOD, GOOD).await.unwrap();

        let mut session = Session::default();
        let wrong = auth_err(service.login(&mut session, "alice", "Wrong1!!").await);
        let unknown = auth_err(service.login(&mut session, "nobody", GOOD).await);

        assert_eq!(wrong, AuthError::InvalidCredentials);
        assert_eq!(wrong, unknown);
        assert_eq!(wrong.to_string(), "Invalid username or password.");
        assert_eq!(session, Session::Anonymous);
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let (service, _store, _dir) = setup().await;
        let mut session = Session::authenticated("alice");

        assert_eq!(service.logout(&mut session), "Logged out successfully");
        assert_eq!(service.logout(&mut session), "Logged out successfully");
        assert_eq!(session, Session::Anonymous);
    }

    #[tokio::test]
    async fn update_age_requires_login_and_range() {
        let (service, _store, _dir) = setup().await;
        service.register("alice", GOOD, GOOD).await.unwrap();

        assert_eq!(
            auth_err(service.update_age(&Session::Anonymous, 30).await),
            AuthError::NotAuthenticated
        );

        let session = Session::authenticated("alice");
        assert_eq!(
            auth_err(service.update_age(&session, 151).await),
            AuthError::InvalidAge(151)
        );
        assert_eq!(
            auth_err(service.update_age(&session, -1).await),
            AuthError::InvalidAge(-1)
        );

        assert_eq!(
            service.update_age(&session, 30).await.unwrap(),
            "Age updated successfully."
        );
        let profile = service.profile(&session).await.unwrap();
        assert_eq!(profile.username, "alice");
        assert_eq!(profile.age, Some(30));
    }

    #[tokio::test]
    async fn session_for_missing_user_is_not_authenticated() {
        let (service, _store, _dir) = setup().await;
        let ghost = Session::authenticated("ghost");

        assert_eq!(
            auth_err(service.update_age(&ghost, 20).await),
            AuthError::NotAuthenticated
        );
        assert!(matches!(
            service.profile(&ghost).await,
            Err(ChatscreenError::Auth(AuthError::NotAuthenticated))
        ));
    }

    #[tokio::test]
    async fn change_password_flow() {
        let (service, _store, _dir) = setup().await;
        service.register("alice", GOOD, GOOD).await.unwrap();
        let session = Session::authenticated("alice");

        assert_eq!(
            auth_err(service.change_password(&session, "Nope1!!", "Next2@x", "Next2@x").await),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            auth_err(service.change_password(&session, GOOD, "Next2@x", "Other2@x").await),
            AuthError::PasswordMismatch
        );
        assert!(matches!(
            auth_err(service.change_password(&session, GOOD, "short", "short").await),
            AuthError::WeakPassword(_)
        ));

        service
            .change_password(&session, GOOD, "Next2@x", "Next2@x")
            .await
            .unwrap();

        let mut fresh = Session::default();
        assert!(service.login(&mut fresh, "alice", GOOD).await.is_err());
        service.login(&mut fresh, "alice", "Next2@x").await.unwrap();
    }
}
