use crate::document::KvlmDocument;

/// Serialize a document back to KVLM bytes.
///
/// Each header value is written as `key SP value LF` in line order, with
/// every embedded newline followed by a space so it reads back as a
/// continuation line. A blank line follows the headers, then the message
/// verbatim.
pub fn serialize(doc: &KvlmDocument) -> Vec<u8> {
    let mut out = Vec::new();
    for (key, value) in doc.lines() {
        out.extend_from_slice(key);
        out.push(b' ');
        fold_into(&mut out, value);
        out.push(b'\n');
    }
    out.push(b'\n');
    out.extend_from_slice(doc.message());
    out
}

fn fold_into(out: &mut Vec<u8>, value: &[u8]) {
    for &b in value {
        out.push(b);
        if b == b'\n' {
            out.push(b' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use proptest::prelude::*;

    #[test]
    fn folds_embedded_newlines() {
        let mut doc = KvlmDocument::new();
        doc.push("note", "first\nsecond").unwrap();
        doc.set_message("m");
        assert_eq!(serialize(&doc), b"note first\n second\n\nm\n".to_vec());
    }

    #[test]
    fn repeated_values_are_written_in_order() {
        let mut doc = KvlmDocument::new();
        doc.push("tree", "t").unwrap();
        doc.push("parent", "p1").unwrap();
        doc.push("parent", "p2").unwrap();
        doc.set_message("merge");
        assert_eq!(
            serialize(&doc),
            b"tree t\nparent p1\nparent p2\n\nmerge\n".to_vec()
        );
    }

    #[test]
    fn interleaved_repeated_keys_keep_their_lines() {
        let raw: &[u8] = b"tree t\nmergetag one\nparent p\nmergetag two\n\nm\n";
        let doc = parse(raw).unwrap();
        assert_eq!(doc.get_all(b"mergetag"), &[b"one".to_vec(), b"two".to_vec()]);
        assert_eq!(serialize(&doc), raw.to_vec());
    }

    #[test]
    fn reproduces_commit_bytes() {
        let raw: &[u8] = b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n\
author A U Thor <author@example.com> 1 +0000\n\
committer A U Thor <author@example.com> 1 +0000\n\
\n\
Initial commit\n";
        let doc = parse(raw).unwrap();
        assert_eq!(serialize(&doc), raw.to_vec());
    }

    #[test]
    fn reproduces_signed_tag_bytes() {
        let raw: &[u8] = b"object 3b18e512dba79e4c8300dd08aeb37f8e728b8dad\n\
type blob\n\
tag v1.0\n\
tagger A U Thor <author@example.com> 1 +0000\n\
gpgsig -----BEGIN PGP SIGNATURE-----\n \n iQEzBAABCAAdFiEE\n -----END PGP SIGNATURE-----\n\
\n\
Release 1.0\n\nWith a body.\n";
        let doc = parse(raw).unwrap();
        assert_eq!(
            doc.get(b"gpgsig"),
            Some(&b"-----BEGIN PGP SIGNATURE-----\n\niQEzBAABCAAdFiEE\n-----END PGP SIGNATURE-----"[..])
        );
        assert_eq!(serialize(&doc), raw.to_vec());
    }

    #[test]
    fn empty_document_is_a_blank_line() {
        assert_eq!(serialize(&KvlmDocument::new()), b"\n".to_vec());
    }

    fn document() -> impl Strategy<Value = KvlmDocument> {
        let field = ("[a-z]{1,6}", proptest::collection::vec(any::<u8>(), 0..40));
        (
            proptest::collection::vec(field, 0..12),
            proptest::collection::vec(any::<u8>(), 0..80),
        )
            .prop_map(|(fields, message)| {
                let mut doc = KvlmDocument::new();
                for (key, value) in fields {
                    doc.push(key, value).unwrap();
                }
                doc.set_raw_message(message);
                doc
            })
    }

    proptest! {
        #[test]
        fn parse_inverts_serialize(doc in document()) {
            let raw = serialize(&doc);
            let parsed = parse(&raw).unwrap();
            prop_assert_eq!(&parsed, &doc);
            prop_assert_eq!(serialize(&parsed), raw);
        }
    }
}
