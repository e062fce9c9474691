/// Result type alias for warden operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error returned by the external compiler and constructor primitives
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Core error type for warden operations
///
/// Cache lookups and insertions never fail; every variant here originates in
/// one of the external primitives (rule compiler, authorizer constructor,
/// sync delegate) and carries enough context to diagnose without re-running.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single policy's rule source failed to parse
    #[error("failed to parse policy '{name}': {source}")]
    PolicyParse {
        name: String,
        #[source]
        source: BoxedError,
    },

    /// A policy set could not be compiled into authorizer inputs
    #[error("failed to parse the ACL policies: {source}")]
    PolicySetParse {
        #[source]
        source: Box<Error>,
    },

    /// The authorizer constructor rejected a compiled policy set
    #[error("failed to construct ACL authorizer: {source}")]
    AuthorizerConstruct {
        #[source]
        source: BoxedError,
    },

    /// A reconciliation pass against the source of truth failed
    #[error("sync with source of truth failed: {message}")]
    Sync { message: String },
}

// Helper methods for creating errors with context
impl Error {
    /// Create a parse error for a named policy
    #[must_use]
    pub fn policy_parse(name: impl Into<String>, source: impl Into<BoxedError>) -> Self {
        Error::PolicyParse {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Wrap a per-policy parse failure as a whole-set failure
    #[must_use]
    pub fn policy_set_parse(source: Error) -> Self {
        Error::PolicySetParse {
            source: Box::new(source),
        }
    }

    /// Create an authorizer construction error
    #[must_use]
    pub fn authorizer_construct(source: impl Into<BoxedError>) -> Self {
        Error::AuthorizerConstruct {
            source: source.into(),
        }
    }

    /// Create a sync error with a message
    #[must_use]
    pub fn sync(message: impl Into<String>) -> Self {
        Error::Sync {
            message: message.into(),
        }
    }
}
