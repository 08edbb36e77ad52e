use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The kind of a stored object.
///
/// Each kind has a fixed ASCII tag that appears in the object frame and is
/// never reinterpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    /// Opaque content.
    Blob,
    /// Directory listing (opaque payload in this store).
    Tree,
    /// Commit record encoded as KVLM.
    Commit,
    /// Annotated tag encoded as KVLM.
    Tag,
}

impl ObjectType {
    /// All object types, in tag order.
    pub const ALL: [ObjectType; 4] = [Self::Blob, Self::Tree, Self::Commit, Self::Tag];

    /// The ASCII tag used in frames.
    pub const fn as_tag(&self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
            Self::Tag => "tag",
        }
    }

    /// Match a raw frame tag. Matching is exact and case-sensitive.
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"blob" => Some(Self::Blob),
            b"tree" => Some(Self::Tree),
            b"commit" => Some(Self::Commit),
            b"tag" => Some(Self::Tag),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for ObjectType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s.as_bytes()).ok_or_else(|| TypeError::UnknownObjectType(s.to_string()))
    }
}
