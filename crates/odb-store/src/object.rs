use odb_digest::{frame, ObjectHasher};
use odb_kvlm::KvlmDocument;
use odb_types::{ObjectId, ObjectType};

use crate::error::{StoreError, StoreResult};

/// Encode/decode contract shared by every object kind.
///
/// `decode(x.encode())` must reproduce `x`, and for any bytes that decode
/// successfully, `decode(b)?.encode() == b`. The address is defined over the
/// encoded bytes, so a lossy codec would change an object's identity.
pub trait ObjectCodec: Sized {
    /// The kind tag written into the frame.
    const TYPE: ObjectType;

    /// Canonical payload bytes.
    fn encode(&self) -> Vec<u8>;

    /// Rebuild the object from payload bytes.
    fn decode(data: &[u8]) -> StoreResult<Self>;

    /// Wrap into the [`Object`] enum.
    fn into_object(self) -> Object;

    /// Unwrap from the [`Object`] enum, handing it back on a kind mismatch.
    fn from_object(object: Object) -> Result<Self, Object>;

    /// Content address of this object.
    fn id(&self) -> ObjectId {
        ObjectHasher::hash_object(Self::TYPE, &self.encode())
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Opaque content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl ObjectCodec for Blob {
    const TYPE: ObjectType = ObjectType::Blob;

    fn encode(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn decode(data: &[u8]) -> StoreResult<Self> {
        Ok(Self::new(data))
    }

    fn into_object(self) -> Object {
        Object::Blob(self)
    }

    fn from_object(object: Object) -> Result<Self, Object> {
        match object {
            Object::Blob(blob) => Ok(blob),
            other => Err(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// Directory listing. Stored opaquely: entries are not interpreted here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    pub data: Vec<u8>,
}

impl Tree {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self { data: data.into() }
    }
}

impl ObjectCodec for Tree {
    const TYPE: ObjectType = ObjectType::Tree;

    fn encode(&self) -> Vec<u8> {
        self.data.clone()
    }

    fn decode(data: &[u8]) -> StoreResult<Self> {
        Ok(Self::new(data))
    }

    fn into_object(self) -> Object {
        Object::Tree(self)
    }

    fn from_object(object: Object) -> Result<Self, Object> {
        match object {
            Object::Tree(tree) => Ok(tree),
            other => Err(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// A commit: KVLM headers (`tree`, `parent`*, `author`, `committer`, ...)
/// plus the commit message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub kvlm: KvlmDocument,
}

impl Commit {
    /// Build a commit with the standard header set.
    pub fn new(
        tree: &ObjectId,
        parents: &[ObjectId],
        author: &str,
        committer: &str,
        message: &str,
    ) -> Self {
        let mut kvlm = KvlmDocument::new();
        push_header(&mut kvlm, "tree", tree.to_hex());
        for parent in parents {
            push_header(&mut kvlm, "parent", parent.to_hex());
        }
        push_header(&mut kvlm, "author", author);
        push_header(&mut kvlm, "committer", committer);
        kvlm.set_message(message);
        Self { kvlm }
    }

    /// The root tree this commit snapshots.
    pub fn tree(&self) -> StoreResult<ObjectId> {
        header_id(&self.kvlm, Self::TYPE, b"tree")?
            .ok_or_else(|| StoreError::malformed(Some(Self::TYPE), "missing tree header"))
    }

    /// Parent commits, in header order. Empty for a root commit.
    pub fn parents(&self) -> StoreResult<Vec<ObjectId>> {
        self.kvlm
            .get_all(b"parent")
            .iter()
            .map(|raw| parse_id(Self::TYPE, b"parent", raw))
            .collect()
    }

    pub fn author(&self) -> Option<&[u8]> {
        self.kvlm.get(b"author")
    }

    pub fn committer(&self) -> Option<&[u8]> {
        self.kvlm.get(b"committer")
    }

    pub fn message(&self) -> &[u8] {
        self.kvlm.message()
    }
}

impl ObjectCodec for Commit {
    const TYPE: ObjectType = ObjectType::Commit;

    fn encode(&self) -> Vec<u8> {
        odb_kvlm::serialize(&self.kvlm)
    }

    fn decode(data: &[u8]) -> StoreResult<Self> {
        let kvlm = odb_kvlm::parse(data).map_err(|e| StoreError::kvlm(Self::TYPE, e))?;
        Ok(Self { kvlm })
    }

    fn into_object(self) -> Object {
        Object::Commit(self)
    }

    fn from_object(object: Object) -> Result<Self, Object> {
        match object {
            Object::Commit(commit) => Ok(commit),
            other => Err(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Tag
// ---------------------------------------------------------------------------

/// An annotated tag: KVLM headers (`object`, `type`, `tag`, `tagger`) plus
/// the tag message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub kvlm: KvlmDocument,
}

impl Tag {
    /// Build an annotated tag pointing at `object` of kind `target_type`.
    pub fn new(
        object: &ObjectId,
        target_type: ObjectType,
        name: &str,
        tagger: &str,
        message: &str,
    ) -> Self {
        let mut kvlm = KvlmDocument::new();
        push_header(&mut kvlm, "object", object.to_hex());
        push_header(&mut kvlm, "type", target_type.as_tag());
        push_header(&mut kvlm, "tag", name);
        push_header(&mut kvlm, "tagger", tagger);
        kvlm.set_message(message);
        Self { kvlm }
    }

    /// The tagged object.
    pub fn object(&self) -> StoreResult<ObjectId> {
        header_id(&self.kvlm, Self::TYPE, b"object")?
            .ok_or_else(|| StoreError::malformed(Some(Self::TYPE), "missing object header"))
    }

    /// The declared kind of the tagged object.
    pub fn target_type(&self) -> StoreResult<ObjectType> {
        let raw = self
            .kvlm
            .get(b"type")
            .ok_or_else(|| StoreError::malformed(Some(Self::TYPE), "missing type header"))?;
        ObjectType::from_tag(raw).ok_or_else(|| {
            StoreError::malformed(
                Some(Self::TYPE),
                format!("type header names no object kind: {:?}", String::from_utf8_lossy(raw)),
            )
        })
    }

    pub fn tag_name(&self) -> Option<&[u8]> {
        self.kvlm.get(b"tag")
    }

    pub fn tagger(&self) -> Option<&[u8]> {
        self.kvlm.get(b"tagger")
    }

    pub fn message(&self) -> &[u8] {
        self.kvlm.message()
    }
}

impl ObjectCodec for Tag {
    const TYPE: ObjectType = ObjectType::Tag;

    fn encode(&self) -> Vec<u8> {
        odb_kvlm::serialize(&self.kvlm)
    }

    fn decode(data: &[u8]) -> StoreResult<Self> {
        let kvlm = odb_kvlm::parse(data).map_err(|e| StoreError::kvlm(Self::TYPE, e))?;
        Ok(Self { kvlm })
    }

    fn into_object(self) -> Object {
        Object::Tag(self)
    }

    fn from_object(object: Object) -> Result<Self, Object> {
        match object {
            Object::Tag(tag) => Ok(tag),
            other => Err(other),
        }
    }
}

/// Append a header under one of the fixed keys used by the builders.
fn push_header(kvlm: &mut KvlmDocument, key: &'static str, value: impl Into<Vec<u8>>) {
    kvlm.push(key, value)
        .expect("builder header keys are non-empty and contain no space or newline");
}

/// Validate `payload` as an object of `kind` and compute its address
/// without storing it.
pub fn hash_only(kind: ObjectType, payload: &[u8]) -> StoreResult<ObjectId> {
    Object::decode(kind, payload)?;
    Ok(ObjectHasher::hash_object(kind, payload))
}

fn header_id(kvlm: &KvlmDocument, kind: ObjectType, key: &[u8]) -> StoreResult<Option<ObjectId>> {
    kvlm.get(key).map(|raw| parse_id(kind, key, raw)).transpose()
}

fn parse_id(kind: ObjectType, key: &[u8], raw: &[u8]) -> StoreResult<ObjectId> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| ObjectId::from_hex(s).ok())
        .ok_or_else(|| {
            StoreError::malformed(
                Some(kind),
                format!(
                    "{} header is not an object address: {:?}",
                    String::from_utf8_lossy(key),
                    String::from_utf8_lossy(raw)
                ),
            )
        })
}

// ---------------------------------------------------------------------------
// Object
// ---------------------------------------------------------------------------

/// Any stored object, tagged by kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

impl Object {
    /// Decode a payload according to its frame's type tag.
    pub fn decode(kind: ObjectType, data: &[u8]) -> StoreResult<Self> {
        Ok(match kind {
            ObjectType::Blob => Self::Blob(Blob::decode(data)?),
            ObjectType::Tree => Self::Tree(Tree::decode(data)?),
            ObjectType::Commit => Self::Commit(Commit::decode(data)?),
            ObjectType::Tag => Self::Tag(Tag::decode(data)?),
        })
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Blob(_) => ObjectType::Blob,
            Self::Tree(_) => ObjectType::Tree,
            Self::Commit(_) => ObjectType::Commit,
            Self::Tag(_) => ObjectType::Tag,
        }
    }

    /// Canonical payload bytes.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Blob(o) => o.encode(),
            Self::Tree(o) => o.encode(),
            Self::Commit(o) => o.encode(),
            Self::Tag(o) => o.encode(),
        }
    }

    /// The full frame: `<type> SP <len> NUL <payload>`.
    pub fn to_frame(&self) -> Vec<u8> {
        frame(self.object_type(), &self.encode())
    }

    /// Content address of this object.
    pub fn id(&self) -> ObjectId {
        ObjectHasher::hash_object(self.object_type(), &self.encode())
    }

    /// Fail with `TypeMismatch` unless this object is of kind `expected`.
    pub fn expect_type(self, id: &ObjectId, expected: ObjectType) -> StoreResult<Self> {
        let actual = self.object_type();
        if actual != expected {
            return Err(StoreError::TypeMismatch {
                id: *id,
                expected,
                actual,
            });
        }
        Ok(self)
    }

    /// The KVLM document of a commit or tag.
    pub fn kvlm(&self) -> Option<&KvlmDocument> {
        match self {
            Self::Commit(c) => Some(&c.kvlm),
            Self::Tag(t) => Some(&t.kvlm),
            Self::Blob(_) | Self::Tree(_) => None,
        }
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Self::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Self::Tree(tree)
    }
}

impl From<Commit> for Object {
    fn from(commit: Commit) -> Self {
        Self::Commit(commit)
    }
}

impl From<Tag> for Object {
    fn from(tag: Tag) -> Self {
        Self::Tag(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TREE_HEX: &str = "29ff16c9c14e2652b22f8b78bb08a5a07930c147";
    const COMMIT: &[u8] = b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n\
author A U Thor <author@example.com> 1 +0000\n\
committer A U Thor <author@example.com> 1 +0000\n\
\n\
Initial commit\n";

    fn id(hex: &str) -> ObjectId {
        ObjectId::from_hex(hex).unwrap()
    }

    #[test]
    fn blob_id_matches_known_address() {
        let blob = Blob::new(&b"hello world\n"[..]);
        assert_eq!(blob.id().to_hex(), "3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
        assert_eq!(
            blob.into_object().to_frame(),
            b"blob 12\x00hello world\n".to_vec()
        );
    }

    #[test]
    fn commit_decode_exposes_headers() {
        let commit = Commit::decode(COMMIT).unwrap();
        assert_eq!(commit.tree().unwrap(), id(TREE_HEX));
        assert!(commit.parents().unwrap().is_empty());
        assert_eq!(
            commit.author(),
            Some(&b"A U Thor <author@example.com> 1 +0000"[..])
        );
        assert_eq!(commit.message(), b"Initial commit\n");
        assert_eq!(commit.encode(), COMMIT.to_vec());
    }

    #[test]
    fn commit_builder_matches_parsed_form() {
        let built = Commit::new(
            &id(TREE_HEX),
            &[],
            "A U Thor <author@example.com> 1 +0000",
            "A U Thor <author@example.com> 1 +0000",
            "Initial commit",
        );
        assert_eq!(built.encode(), COMMIT.to_vec());
        assert_eq!(built, Commit::decode(COMMIT).unwrap());
    }

    #[test]
    fn merge_commit_lists_parents_in_order() {
        let p1 = id("1111111111111111111111111111111111111111");
        let p2 = id("2222222222222222222222222222222222222222");
        let commit = Commit::new(&id(TREE_HEX), &[p1, p2], "a", "c", "merge");
        let decoded = Commit::decode(&commit.encode()).unwrap();
        assert_eq!(decoded.parents().unwrap(), vec![p1, p2]);
    }

    #[test]
    fn commit_with_bad_parent_is_malformed() {
        let commit = Commit::decode(b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\nparent xyz\n\nm").unwrap();
        assert!(matches!(
            commit.parents(),
            Err(StoreError::MalformedObject { kind: Some(ObjectType::Commit), .. })
        ));
    }

    #[test]
    fn commit_without_separator_is_malformed() {
        let err = Commit::decode(b"tree abc\nauthor x\n").unwrap_err();
        match err {
            StoreError::MalformedObject { kind, source, .. } => {
                assert_eq!(kind, Some(ObjectType::Commit));
                assert_eq!(source.and_then(|e| e.offset()), Some(18));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn tag_accessors() {
        let target = id("3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
        let tag = Tag::new(&target, ObjectType::Blob, "v1.0", "T <t@example.com> 1 +0000", "release");
        let decoded = Tag::decode(&tag.encode()).unwrap();
        assert_eq!(decoded.object().unwrap(), target);
        assert_eq!(decoded.target_type().unwrap(), ObjectType::Blob);
        assert_eq!(decoded.tag_name(), Some(&b"v1.0"[..]));
        assert_eq!(decoded.message(), b"release\n");
    }

    #[test]
    fn hash_only_validates_payload() {
        let id = hash_only(ObjectType::Blob, b"hello world\n").unwrap();
        assert_eq!(id.to_hex(), "3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
        assert_eq!(hash_only(ObjectType::Commit, COMMIT).unwrap(), Commit::decode(COMMIT).unwrap().id());
        assert!(hash_only(ObjectType::Tag, b"no separator").is_err());
    }

    #[test]
    fn tag_with_unknown_target_type_is_malformed() {
        let tag = Tag::decode(b"object 3b18e512dba79e4c8300dd08aeb37f8e728b8dad\ntype snapshot\n\nm").unwrap();
        assert!(matches!(
            tag.target_type(),
            Err(StoreError::MalformedObject { kind: Some(ObjectType::Tag), .. })
        ));
    }

    #[test]
    fn builders_emit_every_header() {
        let target = id("3b18e512dba79e4c8300dd08aeb37f8e728b8dad");
        let tag = Tag::new(&target, ObjectType::Blob, "v1", "T", "m");
        let keys: Vec<&[u8]> = tag.kvlm.keys().collect();
        assert_eq!(keys, vec![&b"object"[..], &b"type"[..], &b"tag"[..], &b"tagger"[..]]);

        let commit = Commit::new(&target, &[target], "a", "c", "m");
        let keys: Vec<&[u8]> = commit.kvlm.keys().collect();
        assert_eq!(keys, vec![&b"tree"[..], &b"parent"[..], &b"author"[..], &b"committer"[..]]);
    }

    #[test]
    fn tree_is_opaque() {
        let data = b"100644 a.txt\0\x01\x02".to_vec();
        let tree = Tree::decode(&data).unwrap();
        assert_eq!(tree.encode(), data);
    }

    #[test]
    fn object_dispatch_by_type() {
        let obj = Object::decode(ObjectType::Commit, COMMIT).unwrap();
        assert_eq!(obj.object_type(), ObjectType::Commit);
        assert!(obj.kvlm().is_some());
        let obj = Object::decode(ObjectType::Blob, COMMIT).unwrap();
        assert_eq!(obj.object_type(), ObjectType::Blob);
        assert!(obj.kvlm().is_none());
    }

    #[test]
    fn expect_type_reports_mismatch() {
        let obj = Object::from(Blob::new("x"));
        let oid = obj.id();
        assert!(obj.clone().expect_type(&oid, ObjectType::Blob).is_ok());
        let err = obj.expect_type(&oid, ObjectType::Commit).unwrap_err();
        assert!(matches!(
            err,
            StoreError::TypeMismatch { expected: ObjectType::Commit, actual: ObjectType::Blob, .. }
        ));
    }

    #[test]
    fn from_object_hands_back_on_mismatch() {
        let obj = Object::from(Tree::new("t"));
        let back = Blob::from_object(obj.clone()).unwrap_err();
        assert_eq!(back, obj);
        assert_eq!(Tree::from_object(obj).unwrap(), Tree::new("t"));
    }

    proptest! {
        #[test]
        fn opaque_kinds_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            for kind in [ObjectType::Blob, ObjectType::Tree] {
                let obj = Object::decode(kind, &data).unwrap();
                prop_assert_eq!(obj.encode(), data.clone());
            }
        }
    }
}
