//! Session context: the stored bearer token and the cached user record
//!
//! A `Session` is passed explicitly to everything that needs it. Nothing in
//! the workspace reads session state from an ambient global.

use crate::storage::{MemoryStorage, Storage};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Storage keys used by the session
pub struct SessionKeys;

impl SessionKeys {
    /// Key holding the bearer token
    pub const TOKEN: &'static str = "token";

    /// Key holding the cached user record (JSON)
    pub const USER: &'static str = "user";
}

/// Bearer token persistence
///
/// No expiry, rotation or validation: a present token is taken as proof of
/// authentication until the backend says otherwise. An empty string counts as
/// no token.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Persist `token`, replacing any previous one
    pub fn save(&self, token: &str) {
        self.storage.set_item(SessionKeys::TOKEN, token);
    }

    /// The stored token, if any
    pub fn get(&self) -> Option<String> {
        self.storage
            .get_item(SessionKeys::TOKEN)
            .filter(|token| !token.is_empty())
    }

    /// Remove the stored token
    pub fn clear(&self) {
        self.storage.remove_item(SessionKeys::TOKEN);
    }

    /// Whether a token is stored
    pub fn is_present(&self) -> bool {
        self.get().is_some()
    }
}

/// Session context shared by the API client and the route guard
#[derive(Clone)]
pub struct Session {
    tokens: TokenStore,
    storage: Arc<dyn Storage>,
}

impl Session {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            tokens: TokenStore::new(Arc::clone(&storage)),
            storage,
        }
    }

    /// Session backed by process memory only
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    pub const fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Current bearer token, read fresh from storage
    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_present()
    }

    /// Cached user record from the last login or registration
    pub fn user(&self) -> Option<Value> {
        let raw = self.storage.get_item(SessionKeys::USER)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "Cached user record is not valid JSON, ignoring it");
                None
            }
        }
    }

    /// Store the token and user record returned by login or registration
    pub fn establish(&self, token: &str, user: &Value) {
        self.tokens.save(token);
        match serde_json::to_string(user) {
            Ok(serialized) => self.storage.set_item(SessionKeys::USER, &serialized),
            Err(err) => warn!(error = %err, "Failed to serialize user record"),
        }
        info!("Session established");
    }

    /// Forget the token and the cached user record
    pub fn clear(&self) {
        self.tokens.clear();
        self.storage.remove_item(SessionKeys::USER);
        info!("Session cleared");
    }

    /// Decide whether the stored state counts as signed in
    ///
    /// Pure with respect to the session: it only reads storage. Acting on an
    /// `Unauthorized` result (redirecting, prompting) is the caller's job.
    pub fn check(&self) -> SessionCheck {
        match self.token() {
            Some(token) => {
                debug!("Session check: authorized");
                SessionCheck::Authorized(AuthorizedSession {
                    token,
                    user: self.user(),
                })
            }
            None => {
                debug!("Session check: no token stored");
                SessionCheck::Unauthorized
            }
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Result of [`Session::check`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCheck {
    Authorized(AuthorizedSession),
    Unauthorized,
}

impl SessionCheck {
    pub const fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }

    /// Cached user record, when authorized and one is stored
    pub const fn user(&self) -> Option<&Value> {
        match self {
            Self::Authorized(session) => session.user.as_ref(),
            Self::Unauthorized => None,
        }
    }
}

/// Token and cached user of a signed-in session
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorizedSession {
    pub token: String,
    pub user: Option<Value>,
}

impl fmt::Debug for AuthorizedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizedSession")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockStorage;
    use mockall::predicate::eq;
    use serde_json::json;

    #[test]
    fn test_token_store_contract() {
        let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
        assert_eq!(tokens.get(), None);
        assert!(!tokens.is_present());

        tokens.save("abc123");
        assert_eq!(tokens.get().as_deref(), Some("abc123"));
        assert!(tokens.is_present());

        tokens.clear();
        assert_eq!(tokens.get(), None);
        assert!(!tokens.is_present());
    }

    #[test]
    fn test_empty_token_counts_as_absent() {
        let tokens = TokenStore::new(Arc::new(MemoryStorage::new()));
        tokens.save("");
        assert_eq!(tokens.get(), None);
        assert!(!tokens.is_present());
    }

    #[test]
    fn test_token_is_read_fresh_on_every_call() {
        let mut storage = MockStorage::new();
        let mut seq = mockall::Sequence::new();
        storage
            .expect_get_item()
            .with(eq(SessionKeys::TOKEN))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Some("first".to_string()));
        storage
            .expect_get_item()
            .with(eq(SessionKeys::TOKEN))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| None);

        let session = Session::new(Arc::new(storage));
        assert_eq!(session.token().as_deref(), Some("first"));
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_establish_stores_token_and_user() {
        let session = Session::in_memory();
        let user = json!({"id": "u-1", "email": "alex@example.com"});

        session.establish("tok", &user);

        assert_eq!(session.token().as_deref(), Some("tok"));
        assert_eq!(session.user(), Some(user.clone()));
        assert_eq!(
            session.check(),
            SessionCheck::Authorized(AuthorizedSession {
                token: "tok".to_string(),
                user: Some(user),
            })
        );
    }

    #[test]
    fn test_clear_removes_token_and_user() {
        let session = Session::in_memory();
        session.establish("tok", &json!({"id": "u-1"}));

        session.clear();

        assert_eq!(session.token(), None);
        assert_eq!(session.user(), None);
        assert_eq!(session.check(), SessionCheck::Unauthorized);
    }

    #[test]
    fn test_check_authorized_without_cached_user() {
        let session = Session::in_memory();
        session.tokens().save("tok");

        let check = session.check();
        assert!(check.is_authorized());
        assert_eq!(check.user(), None);
    }

    #[test]
    fn test_malformed_user_record_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(SessionKeys::TOKEN, "tok");
        storage.set_item(SessionKeys::USER, "{not json");

        let session = Session::new(storage);
        assert_eq!(session.user(), None);
        assert!(session.check().is_authorized());
    }

    #[test]
    fn test_debug_output_redacts_token() {
        let session = Session::in_memory();
        session.establish("super-secret", &json!({}));

        let rendered = format!("{:?} {:?}", session, session.check());
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn test_clones_share_storage() {
        let session = Session::in_memory();
        let other = session.clone();

        session.tokens().save("tok");
        assert!(other.is_authenticated());

        other.clear();
        assert!(!session.is_authenticated());
    }
}
