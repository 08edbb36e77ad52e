use odb_types::{ObjectId, ObjectType};
use sha1::{Digest, Sha1};

use crate::frame::header;

/// SHA-1 content hasher for object frames.
///
/// The address of an object is the digest of its whole frame, so the type
/// tag and length take part in the identity: a blob and a tree with the same
/// payload have different addresses.
pub struct ObjectHasher;

impl ObjectHasher {
    /// Address of an already-built frame.
    pub fn address_of(frame: &[u8]) -> ObjectId {
        Self::finish(Sha1::new_with_prefix(frame))
    }

    /// Address of `payload` framed as `kind`, without materializing the frame.
    pub fn hash_object(kind: ObjectType, payload: &[u8]) -> ObjectId {
        let mut hasher = Sha1::new();
        hasher.update(header(kind, payload.len()));
        hasher.update(payload);
        Self::finish(hasher)
    }

    /// Verify that a frame hashes to the expected address.
    pub fn verify(frame: &[u8], expected: &ObjectId) -> bool {
        Self::address_of(frame) == *expected
    }

    fn finish(hasher: Sha1) -> ObjectId {
        let mut out = [0u8; 20];
        out.copy_from_slice(&hasher.finalize());
        ObjectId::from_hash(out)
    }
}
