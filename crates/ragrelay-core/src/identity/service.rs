//! Authentication service: login, registration, token verification.
//!
//! `AuthService` coordinates the user repository, the credential
//! hasher, and the token issuer. Identity is resolved once at the
//! request boundary and threaded explicitly into the handlers; nothing
//! here reads ambient security state.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use ragrelay_types::error::{AuthError, RepositoryError};
use ragrelay_types::identity::{TokenClaims, User, UserRole};

use crate::identity::repository::UserRepository;

/// Trait for password hashing and verification.
///
/// The concrete argon2id implementation lives in ragrelay-infra.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password into a PHC-format string.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a plaintext password against a stored hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Trait for bearer token issuance and verification.
///
/// The concrete HMAC-SHA256 signer lives in ragrelay-infra.
pub trait TokenIssuer: Send + Sync {
    /// Issue a signed token for the given username.
    fn issue(&self, username: &str) -> Result<String, AuthError>;

    /// Verify a token and return its claims.
    ///
    /// Fails with [`AuthError::InvalidToken`] on a bad signature,
    /// malformed payload, or expired token.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Orchestrates login, registration, and token-based authentication.
pub struct AuthService<U: UserRepository, H: CredentialHasher, T: TokenIssuer> {
    users: U,
    hasher: H,
    tokens: T,
}

impl<U: UserRepository, H: CredentialHasher, T: TokenIssuer> AuthService<U, H, T> {
    /// Create a new auth service.
    pub fn new(users: U, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Verify credentials and issue a bearer token.
    ///
    /// An unknown username and a wrong password both fail with the same
    /// [`AuthError::InvalidCredentials`]; the specific cause is never
    /// surfaced to the client.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let Some(user) = self.users.get_by_username(username).await? else {
            debug!(username, "login for unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash)? {
            debug!(username, "login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.username)?;
        info!(username, "login succeeded");
        Ok(token)
    }

    /// Register a new user.
    ///
    /// Uniqueness is enforced by a single insert-or-fail against the
    /// storage layer's UNIQUE constraint; a duplicate username fails
    /// with [`AuthError::UsernameTaken`].
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        roles: Vec<UserRole>,
    ) -> Result<User, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }
        if password.is_empty() {
            return Err(AuthError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        let roles = if roles.is_empty() {
            vec![UserRole::User]
        } else {
            roles
        };

        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            password_hash: self.hasher.hash(password)?,
            roles,
            created_at: Utc::now(),
        };

        match self.users.create_user(&user).await {
            Ok(()) => {
                info!(username, "user registered");
                Ok(user)
            }
            Err(RepositoryError::Conflict(_)) => {
                Err(AuthError::UsernameTaken(username.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve a bearer token to its user.
    ///
    /// Used by the request-boundary extractor; the resulting identity
    /// is passed explicitly into the orchestrator.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.verify(token)?;
        self.users
            .get_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryUsers {
        users: Mutex<Vec<User>>,
    }

    impl UserRepository for MemoryUsers {
        async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.username == user.username) {
                return Err(RepositoryError::Conflict(format!(
                    "username '{}' already exists",
                    user.username
                )));
            }
            users.push(user.clone());
            Ok(())
        }

        async fn get_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }
    }

    /// Trivial reversible "hash" for tests.
    struct PlainHasher;

    impl CredentialHasher for PlainHasher {
        fn hash(&self, password: &str) -> Result<String, AuthError> {
            Ok(format!("hashed:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
            Ok(hash == format!("hashed:{password}"))
        }
    }

    /// Token issuer that encodes the username verbatim.
    struct PlainTokens;

    impl TokenIssuer for PlainTokens {
        fn issue(&self, username: &str) -> Result<String, AuthError> {
            Ok(format!("token-for:{username}"))
        }

        fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
            let sub = token
                .strip_prefix("token-for:")
                .ok_or(AuthError::InvalidToken)?;
            Ok(TokenClaims {
                sub: sub.to_string(),
                iat: 0,
                exp: i64::MAX,
            })
        }
    }

    fn service() -> AuthService<MemoryUsers, PlainHasher, PlainTokens> {
        AuthService::new(MemoryUsers::default(), PlainHasher, PlainTokens)
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let svc = service();

        let user = svc.register("alice", "s3cret", Vec::new()).await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.roles, vec![UserRole::User]);
        assert_eq!(user.password_hash, "hashed:s3cret");

        let token = svc.login("alice", "s3cret").await.unwrap();
        assert_eq!(token, "token-for:alice");
    }

    #[tokio::test]
    async fn test_login_failures_share_one_error() {
        let svc = service();
        svc.register("alice", "s3cret", Vec::new()).await.unwrap();

        let unknown = svc.login("mallory", "s3cret").await.unwrap_err();
        let wrong = svc.login("alice", "wrong").await.unwrap_err();
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_conflicts() {
        let svc = service();
        svc.register("alice", "one", Vec::new()).await.unwrap();

        let err = svc.register("alice", "two", Vec::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken(name) if name == "alice"));

        // The second registration inserted nothing.
        assert_eq!(svc.users.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields() {
        let svc = service();
        assert!(matches!(
            svc.register("", "pw", Vec::new()).await.unwrap_err(),
            AuthError::InvalidInput(_)
        ));
        assert!(matches!(
            svc.register("alice", "", Vec::new()).await.unwrap_err(),
            AuthError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_user() {
        let svc = service();
        svc.register("alice", "s3cret", vec![UserRole::Admin])
            .await
            .unwrap();

        let user = svc.authenticate("token-for:alice").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.roles, vec![UserRole::Admin]);

        assert!(matches!(
            svc.authenticate("garbage").await.unwrap_err(),
            AuthError::InvalidToken
        ));
        assert!(matches!(
            svc.authenticate("token-for:nobody").await.unwrap_err(),
            AuthError::InvalidToken
        ));
    }
}
