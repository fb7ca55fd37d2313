/// Convenience result type used across shardsmith.
pub type ShardResult<T> = Result<T, ShardError>;

/// Request-scoped error taxonomy.
///
/// Every variant is recoverable by the caller: a failed generation request reports one of these
/// and leaves the registry and instance cache untouched.
#[derive(thiserror::Error, Debug)]
pub enum ShardError {
    /// An argument the shard needs is absent, or is stored under the wrong kind.
    #[error("missing argument `{id}`")]
    MissingArgument {
        /// Argument id.
        id: String,
    },

    /// A value was read or marshalled as a kind it does not hold.
    #[error("type mismatch for `{id}`: expected {expected}, found {actual}")]
    TypeMismatch {
        /// Argument id, or `<value>` when raised by a bare accessor.
        id: String,
        /// Kind the caller asked for.
        expected: &'static str,
        /// Kind actually stored.
        actual: &'static str,
    },

    /// No shard is registered under this id.
    #[error("unknown shard `{id}`")]
    UnknownShard {
        /// Requested shard id.
        id: String,
    },

    /// A shard id was registered twice.
    #[error("duplicate shard id `{id}`")]
    DuplicateId {
        /// Conflicting shard id.
        id: String,
    },

    /// A lifecycle call arrived before the state it depends on.
    #[error("shard not initialized: {0}")]
    NotInitialized(String),

    /// Plugin manifest could not be understood by a loader.
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// Animation parameters produce no usable frames.
    #[error("synthesis domain error: {0}")]
    SynthesisDomain(String),

    /// Invalid user-provided data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when encoding or decoding data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Stable discriminant of a [`ShardError`], used in structured error responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// See [`ShardError::MissingArgument`].
    MissingArgument,
    /// See [`ShardError::TypeMismatch`].
    TypeMismatch,
    /// See [`ShardError::UnknownShard`].
    UnknownShard,
    /// See [`ShardError::DuplicateId`].
    DuplicateId,
    /// See [`ShardError::NotInitialized`].
    NotInitialized,
    /// See [`ShardError::InvalidManifest`].
    InvalidManifest,
    /// See [`ShardError::SynthesisDomain`].
    SynthesisDomainError,
    /// See [`ShardError::Validation`].
    Validation,
    /// See [`ShardError::Serde`].
    Serialization,
    /// See [`ShardError::Other`].
    Internal,
}

impl ShardError {
    /// Build a [`ShardError::MissingArgument`] value.
    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingArgument { id: id.into() }
    }

    /// Build a [`ShardError::TypeMismatch`] value.
    pub fn type_mismatch(
        id: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            id: id.into(),
            expected,
            actual,
        }
    }

    /// Build a [`ShardError::UnknownShard`] value.
    pub fn unknown_shard(id: impl Into<String>) -> Self {
        Self::UnknownShard { id: id.into() }
    }

    /// Build a [`ShardError::DuplicateId`] value.
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Build a [`ShardError::NotInitialized`] value.
    pub fn not_initialized(msg: impl Into<String>) -> Self {
        Self::NotInitialized(msg.into())
    }

    /// Build a [`ShardError::InvalidManifest`] value.
    pub fn invalid_manifest(msg: impl Into<String>) -> Self {
        Self::InvalidManifest(msg.into())
    }

    /// Build a [`ShardError::SynthesisDomain`] value.
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::SynthesisDomain(msg.into())
    }

    /// Build a [`ShardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ShardError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Attach an argument id to an anonymous [`ShardError::TypeMismatch`].
    ///
    /// Other variants are returned unchanged.
    pub fn with_argument(self, arg: &str) -> Self {
        match self {
            Self::TypeMismatch {
                expected, actual, ..
            } => Self::TypeMismatch {
                id: arg.to_string(),
                expected,
                actual,
            },
            other => other,
        }
    }

    /// Stable discriminant for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingArgument { .. } => ErrorKind::MissingArgument,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::UnknownShard { .. } => ErrorKind::UnknownShard,
            Self::DuplicateId { .. } => ErrorKind::DuplicateId,
            Self::NotInitialized(_) => ErrorKind::NotInitialized,
            Self::InvalidManifest(_) => ErrorKind::InvalidManifest,
            Self::SynthesisDomain(_) => ErrorKind::SynthesisDomainError,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Serde(_) => ErrorKind::Serialization,
            Self::Other(_) => ErrorKind::Internal,
        }
    }

    /// Structured form of this error for a request response.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

/// Structured error response: kind plus human readable message.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ErrorReport {
    /// Error discriminant.
    pub kind: ErrorKind,
    /// Rendered error message.
    pub message: String,
}

impl From<&ShardError> for ErrorReport {
    fn from(err: &ShardError) -> Self {
        err.report()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
