use odb_types::ObjectType;

/// Errors from splitting a frame.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    /// The frame is missing its space or NUL separator, or the length field
    /// is not a decimal number.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// The declared length does not match the bytes after the NUL.
    #[error("bad length: header declares {declared} bytes, payload has {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// The type tag is not one of `blob`, `tree`, `commit`, `tag`.
    #[error("unknown object type {0:?}")]
    UnknownType(String),
}

/// A frame split into its parts. Borrows the payload from the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrame<'a> {
    pub kind: ObjectType,
    pub declared_len: usize,
    pub payload: &'a [u8],
}

/// Build the canonical frame for a payload.
pub fn frame(kind: ObjectType, payload: &[u8]) -> Vec<u8> {
    let header = header(kind, payload.len());
    let mut out = Vec::with_capacity(header.len() + payload.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(payload);
    out
}

/// The frame header: `<type> SP <len> NUL`.
pub(crate) fn header(kind: ObjectType, len: usize) -> Vec<u8> {
    format!("{} {}\0", kind.as_tag(), len).into_bytes()
}

/// Split a frame into type, declared length and payload.
///
/// The length check is the only integrity check performed on the payload.
pub fn unframe(raw: &[u8]) -> Result<RawFrame<'_>, FrameError> {
    let spc = raw
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| FrameError::Malformed("missing type separator".into()))?;
    let nul = raw[spc..]
        .iter()
        .position(|&b| b == 0)
        .map(|i| spc + i)
        .ok_or_else(|| FrameError::Malformed("missing length terminator".into()))?;

    let len_field = &raw[spc + 1..nul];
    if len_field.is_empty() || !len_field.iter().all(u8::is_ascii_digit) {
        return Err(FrameError::Malformed(format!(
            "length field {:?} is not decimal",
            String::from_utf8_lossy(len_field)
        )));
    }
    // All-digit ASCII is valid UTF-8; only overflow can fail here.
    let declared_len: usize = std::str::from_utf8(len_field)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| FrameError::Malformed("length field overflows".into()))?;

    let payload = &raw[nul + 1..];
    if declared_len != payload.len() {
        return Err(FrameError::LengthMismatch {
            declared: declared_len,
            actual: payload.len(),
        });
    }

    let tag = &raw[..spc];
    let kind = ObjectType::from_tag(tag)
        .ok_or_else(|| FrameError::UnknownType(String::from_utf8_lossy(tag).into_owned()))?;

    tracing::trace!(%kind, len = declared_len, "unframed object");
    Ok(RawFrame {
        kind,
        declared_len,
        payload,
    })
}
