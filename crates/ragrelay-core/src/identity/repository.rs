//! UserRepository trait definition.
//!
//! Follows the same RPITIT pattern as ConversationRepository.

use ragrelay_types::error::RepositoryError;
use ragrelay_types::identity::User;

/// Repository trait for user persistence.
///
/// Implementations live in ragrelay-infra (e.g., `SqliteUserRepository`).
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// Uniqueness of the username is enforced by the storage layer in
    /// the same statement; a duplicate fails with
    /// [`RepositoryError::Conflict`], never a lookup-then-insert race.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Look up a user by username.
    fn get_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;
}
