use crate::document::KvlmDocument;
use crate::error::{KvlmError, Result};

/// Parse a KVLM payload.
///
/// Scans left to right with an explicit cursor, one header field per loop
/// iteration, so header count does not grow the call stack. The header block
/// ends at the first line that has no space before its newline; that line
/// must be empty, and everything after it is the message, taken verbatim.
pub fn parse(raw: &[u8]) -> Result<KvlmDocument> {
    let mut doc = KvlmDocument::new();
    let mut pos = 0;

    loop {
        let spc = find(raw, b' ', pos);
        let nl = find(raw, b'\n', pos);

        let at_boundary = match (spc, nl) {
            (None, _) => true,
            (Some(s), Some(n)) => n < s,
            (Some(_), None) => false,
        };
        if at_boundary {
            if nl != Some(pos) {
                return Err(KvlmError::malformed(
                    pos,
                    "expected blank line between headers and message",
                ));
            }
            doc.set_raw_message(raw[pos + 1..].to_vec());
            tracing::trace!(headers = doc.len(), "parsed kvlm document");
            return Ok(doc);
        }

        // `at_boundary` is false only when a space was found.
        let spc = spc.unwrap_or(pos);
        if spc == pos {
            return Err(KvlmError::malformed(pos, "empty header key"));
        }
        let key = &raw[pos..spc];

        let end = field_end(raw, spc)?;
        let value = unfold(&raw[spc + 1..end]);
        doc.push_unchecked(key.to_vec(), value);

        pos = end + 1;
    }
}

/// Position of the newline that ends the field whose key ends at `spc`.
///
/// A newline followed by a space is a continuation and does not end the
/// field.
fn field_end(raw: &[u8], spc: usize) -> Result<usize> {
    let mut from = spc;
    loop {
        let nl = find(raw, b'\n', from)
            .ok_or_else(|| KvlmError::malformed(raw.len(), "unterminated header field"))?;
        if raw.get(nl + 1) != Some(&b' ') {
            return Ok(nl);
        }
        from = nl + 1;
    }
}

/// Drop the leading space of each continuation line.
fn unfold(folded: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(folded.len());
    let mut i = 0;
    while i < folded.len() {
        out.push(folded[i]);
        if folded[i] == b'\n' && folded.get(i + 1) == Some(&b' ') {
            i += 1;
        }
        i += 1;
    }
    out
}

fn find(haystack: &[u8], needle: u8, from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| from + i)
}
