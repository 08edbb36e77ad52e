use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::{KvlmError, Result};

/// The value(s) stored under one header key.
///
/// A key seen once holds a `Single` value. Seeing it again turns it into a
/// `Multi` sequence, and further occurrences append.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KvlmValue {
    Single(Vec<u8>),
    Multi(Vec<Vec<u8>>),
}

impl KvlmValue {
    /// All values in insertion order.
    pub fn as_slice(&self) -> &[Vec<u8>] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multi(vs) => vs,
        }
    }

    /// The first value.
    pub fn first(&self) -> &[u8] {
        match self {
            Self::Single(v) => v,
            // `Multi` is only created from an existing `Single`, so it has
            // at least two elements.
            Self::Multi(vs) => &vs[0],
        }
    }

    fn append(&mut self, value: Vec<u8>) {
        match self {
            Self::Single(existing) => {
                let first = std::mem::take(existing);
                *self = Self::Multi(vec![first, value]);
            }
            Self::Multi(vs) => vs.push(value),
        }
    }
}

/// An ordered header multimap plus a message.
///
/// Header keys iterate in the order they were first inserted. The document
/// also remembers the order of individual header lines, so a repeated key
/// interleaved with other keys is written back exactly where it was read;
/// that is what makes `serialize(parse(raw)) == raw` hold. The message is
/// kept apart from the headers and is always written last.
#[derive(Clone, Debug, Default)]
pub struct KvlmDocument {
    headers: IndexMap<Vec<u8>, KvlmValue>,
    /// Index into `headers` for each header line, in line order.
    lines: Vec<usize>,
    message: Vec<u8>,
}

impl KvlmDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header value, validating the key.
    ///
    /// Keys must be non-empty and contain neither spaces nor newlines,
    /// otherwise they would not survive a serialize/parse round trip.
    pub fn push(&mut self, key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Result<()> {
        let key = key.into();
        validate_key(&key)?;
        self.push_unchecked(key, value.into());
        Ok(())
    }

    pub(crate) fn push_unchecked(&mut self, key: Vec<u8>, value: Vec<u8>) {
        let idx = match self.headers.get_full_mut(&key) {
            Some((idx, _, existing)) => {
                existing.append(value);
                idx
            }
            None => self.headers.insert_full(key, KvlmValue::Single(value)).0,
        };
        self.lines.push(idx);
    }

    /// The first value stored under `key`.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.headers.get(key).map(KvlmValue::first)
    }

    /// Every value stored under `key`, in insertion order. Empty if absent.
    pub fn get_all(&self, key: &[u8]) -> &[Vec<u8>] {
        self.headers.get(key).map(KvlmValue::as_slice).unwrap_or(&[])
    }

    /// The raw entry for `key`.
    pub fn entry(&self, key: &[u8]) -> Option<&KvlmValue> {
        self.headers.get(key)
    }

    /// Whether `key` has at least one value.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.headers.contains_key(key)
    }

    /// Header keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.headers.keys().map(Vec::as_slice)
    }

    /// Header entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &KvlmValue)> {
        self.headers.iter().map(|(k, v)| (k.as_slice(), v))
    }

    /// Every header line as `(key, value)`, in the order the lines were
    /// inserted.
    pub fn lines(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        let mut seen = vec![0usize; self.headers.len()];
        self.lines.iter().map(move |&idx| {
            let nth = seen[idx];
            seen[idx] += 1;
            // Indices in `lines` come from `insert_full`/`get_full_mut` and
            // headers are never removed.
            let (key, value) = self
                .headers
                .get_index(idx)
                .expect("line index refers to a live header");
            (key.as_slice(), value.as_slice()[nth].as_slice())
        })
    }

    /// Number of distinct header keys.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns `true` if the document has no headers.
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// The message body, verbatim.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Set the message body. A trailing newline is added if missing.
    pub fn set_message(&mut self, message: impl Into<Vec<u8>>) {
        let mut message = message.into();
        if message.last() != Some(&b'\n') {
            message.push(b'\n');
        }
        self.message = message;
    }

    pub(crate) fn set_raw_message(&mut self, message: Vec<u8>) {
        self.message = message;
    }
}

fn validate_key(key: &[u8]) -> Result<()> {
    let reason = if key.is_empty() {
        "key must not be empty"
    } else if key.contains(&b' ') {
        "key must not contain a space"
    } else if key.contains(&b'\n') {
        "key must not contain a newline"
    } else {
        return Ok(());
    };
    Err(KvlmError::InvalidKey {
        key: String::from_utf8_lossy(key).into_owned(),
        reason: reason.into(),
    })
}

/// Order-sensitive: two documents are equal only if their keys, values and
/// header lines appear in the same order.
impl PartialEq for KvlmDocument {
    fn eq(&self, other: &Self) -> bool {
        self.message == other.message
            && self.lines == other.lines
            && self.headers.iter().eq(other.headers.iter())
    }
}

impl Eq for KvlmDocument {}

#[derive(Serialize)]
struct HeaderView<'a> {
    key: Cow<'a, str>,
    values: Vec<Cow<'a, str>>,
}

#[derive(Serialize)]
struct DocumentView<'a> {
    headers: Vec<HeaderView<'a>>,
    message: Cow<'a, str>,
}

/// Serializes as `{ headers: [{ key, values }], message }` with lossy UTF-8.
impl Serialize for KvlmDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let headers = self
            .iter()
            .map(|(key, value)| HeaderView {
                key: String::from_utf8_lossy(key),
                values: value
                    .as_slice()
                    .iter()
                    .map(|v| String::from_utf8_lossy(v))
                    .collect(),
            })
            .collect();
        DocumentView {
            headers,
            message: String::from_utf8_lossy(&self.message),
        }
        .serialize(serializer)
    }
}
