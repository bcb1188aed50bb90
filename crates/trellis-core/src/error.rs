use std::fmt;
use thiserror::Error;

/// The levels of the remote hierarchy an error can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Board,
    List,
    Card,
    Comment,
    Label,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Board => "board",
            ResourceKind::List => "list",
            ResourceKind::Card => "card",
            ResourceKind::Comment => "comment",
            ResourceKind::Label => "label",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum TrellisError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("{kind} not found: {name}")]
    ResourceNotFound { kind: ResourceKind, name: String },

    #[error("Remote failure: {message}")]
    RemoteFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Nothing to do: {0}")]
    NothingToDo(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrellisError {
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        TrellisError::ResourceNotFound {
            kind,
            name: name.into(),
        }
    }

    /// Wraps a failure reported by the repository collaborator.
    pub fn remote<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TrellisError::RemoteFailure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TrellisError::ResourceNotFound { .. })
    }
}
