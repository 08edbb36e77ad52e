use odb_digest::FrameError;
use odb_kvlm::KvlmError;
use odb_types::{ObjectId, ObjectType, TypeError};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object is stored under this address.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// The object's frame or payload does not match its grammar.
    #[error("malformed {} object: {reason}", kind_tag(.kind))]
    MalformedObject {
        kind: Option<ObjectType>,
        reason: String,
        #[source]
        source: Option<KvlmError>,
    },

    /// The frame's type tag is not one of the four known kinds.
    #[error("unknown object type: {0}")]
    UnknownObjectType(String),

    /// The name handed to the store is not a 40-character lowercase hex address.
    #[error("invalid object address {name:?}: {reason}")]
    InvalidAddress { name: String, reason: String },

    /// The object exists but is not of the requested kind.
    #[error("object {id} is a {actual}, expected {expected}")]
    TypeMismatch {
        id: ObjectId,
        expected: ObjectType,
        actual: ObjectType,
    },

    /// Store configuration could not be loaded or is out of range.
    #[error("invalid store configuration: {0}")]
    Config(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// A malformed-object error with no underlying codec error.
    pub fn malformed(kind: Option<ObjectType>, reason: impl Into<String>) -> Self {
        Self::MalformedObject {
            kind,
            reason: reason.into(),
            source: None,
        }
    }

    /// Wrap a KVLM decode failure for a commit or tag payload.
    pub fn kvlm(kind: ObjectType, err: KvlmError) -> Self {
        Self::MalformedObject {
            kind: Some(kind),
            reason: err.to_string(),
            source: Some(err),
        }
    }

    pub(crate) fn invalid_address(name: &str, err: TypeError) -> Self {
        Self::InvalidAddress {
            name: name.to_string(),
            reason: err.to_string(),
        }
    }

    /// Returns `true` for `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<FrameError> for StoreError {
    fn from(err: FrameError) -> Self {
        match err {
            FrameError::UnknownType(tag) => Self::UnknownObjectType(tag),
            other => Self::malformed(None, other.to_string()),
        }
    }
}

fn kind_tag(kind: &Option<ObjectType>) -> &'static str {
    kind.map(|k| k.as_tag()).unwrap_or("unknown")
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
