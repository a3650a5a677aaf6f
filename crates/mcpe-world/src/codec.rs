//! Text encodings for raw keys, values and URL path segments.
//!
//! Keys travel as lowercase hex, values as standard (padded) base64. World
//! directory names travel as percent-escaped path segments.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{CodecError, CodecResult};

/// Encode a raw key as lowercase hex.
pub fn encode_key(key: &[u8]) -> String {
    hex::encode(key)
}

/// Decode a hex key. Both cases are accepted; anything else is an error.
pub fn decode_key(text: &str) -> CodecResult<Vec<u8>> {
    Ok(hex::decode(text)?)
}

/// Encode a raw value as standard base64.
pub fn encode_value(value: &[u8]) -> String {
    STANDARD.encode(value)
}

/// Decode standard base64, ignoring ASCII whitespace such as line breaks.
pub fn decode_value(text: &str) -> CodecResult<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

/// Render bytes as a canonical hexdump: offset, sixteen hex bytes split in
/// two groups of eight, and the printable ASCII column.
///
/// ```text
/// 00000000  47 6f 20 69 73 20 61 6e  20 6f 70 65 6e 20 73 6f  |Go is an open so|
/// ```
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::new();
    for (line, chunk) in data.chunks(16).enumerate() {
        out.push_str(&format!("{:08x}  ", line * 16));
        for i in 0..16 {
            match chunk.get(i) {
                Some(b) => out.push_str(&format!("{b:02x} ")),
                None => out.push_str("   "),
            }
            if i == 7 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        out.extend(chunk.iter().map(|&b| if (0x20..=0x7e).contains(&b) { b as char } else { '.' }));
        out.push_str("|\n");
    }
    out
}

/// Percent-escape a world directory name for use as one URL path segment.
pub fn escape_segment(name: &str) -> String {
    urlencoding::encode(name).into_owned()
}

/// Decode a percent-escaped URL path segment.
///
/// Every `%` must be followed by two hex digits and the result must be valid
/// UTF-8. `+` is kept literally.
pub fn unescape_segment(segment: &str) -> CodecResult<String> {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(CodecError::InvalidEscape(segment[i..].chars().take(3).collect()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    let decoded = urlencoding::decode(segment).map_err(|e| CodecError::InvalidUtf8(e.to_string()))?;
    Ok(decoded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn key_hex_is_lowercase() {
        assert_eq!(encode_key(&[0x00, 0xab, 0xff]), "00abff");
        assert_eq!(decode_key("00ABff").unwrap(), vec![0x00, 0xab, 0xff]);
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(matches!(decode_key("abc"), Err(CodecError::Hex(_))));
        assert!(matches!(decode_key("zz"), Err(CodecError::Hex(_))));
    }

    #[test]
    fn empty_key_is_valid() {
        assert!(decode_key("").unwrap().is_empty());
    }

    #[test]
    fn base64_ignores_line_breaks() {
        assert_eq!(decode_value("aGVs\nbG8=\r\n").unwrap(), b"hello");
    }

    #[test]
    fn malformed_base64_is_rejected() {
        assert!(matches!(decode_value("not base64!"), Err(CodecError::Base64(_))));
    }

    #[test]
    fn hex_dump_full_and_partial_lines() {
        let dump = hex_dump(b"Go is an open source programming language.");
        let expected = "\
00000000  47 6f 20 69 73 20 61 6e  20 6f 70 65 6e 20 73 6f  |Go is an open so|
00000010  75 72 63 65 20 70 72 6f  67 72 61 6d 6d 69 6e 67  |urce programming|
00000020  20 6c 61 6e 67 75 61 67  65 2e                    | language.|
";
        assert_eq!(dump, expected);
    }

    #[test]
    fn hex_dump_non_printable() {
        let dump = hex_dump(&[0x00, 0x41, 0x7f]);
        assert!(dump.starts_with("00000000  00 41 7f "));
        assert!(dump.ends_with("|.A.|\n"));
    }

    #[test]
    fn hex_dump_empty() {
        assert_eq!(hex_dump(&[]), "");
    }

    #[test]
    fn segment_escaping() {
        assert_eq!(escape_segment("My World"), "My%20World");
        assert_eq!(escape_segment("a+b/c"), "a%2Bb%2Fc");
        assert_eq!(unescape_segment("My%20World").unwrap(), "My World");
        assert_eq!(unescape_segment("a+b").unwrap(), "a+b");
    }

    #[test]
    fn malformed_escape_is_rejected() {
        assert!(matches!(
            unescape_segment("bad%zzname"),
            Err(CodecError::InvalidEscape(e)) if e == "%zz"
        ));
        assert!(matches!(unescape_segment("trailing%4"), Err(CodecError::InvalidEscape(_))));
        assert!(matches!(unescape_segment("%ff%fe"), Err(CodecError::InvalidUtf8(_))));
    }

    proptest! {
        #[test]
        fn hex_codec_is_identity(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            prop_assert_eq!(decode_key(&encode_key(&bytes)).unwrap(), bytes);
        }

        #[test]
        fn base64_codec_is_identity(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(decode_value(&encode_value(&bytes)).unwrap(), bytes);
        }

        #[test]
        fn segment_escape_is_identity(name in "\\PC{0,24}") {
            prop_assert_eq!(unescape_segment(&escape_segment(&name)).unwrap(), name);
        }
    }
}
