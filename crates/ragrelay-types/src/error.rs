use thiserror::Error;

/// Errors from the authentication flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("incorrect username or password")]
    InvalidCredentials,

    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("credential hashing error: {0}")]
    Hash(String),

    #[error("token signing error: {0}")]
    TokenSigning(String),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors from the chat orchestration flow.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("message text must not be empty")]
    EmptyMessage,

    #[error("conversation not found")]
    ConversationNotFound,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors from the outbound RAG provider call.
///
/// Deliberately a single kind: callers treat any provider failure the
/// same way and never retry.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors from repository operations (used by trait definitions in ragrelay-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
