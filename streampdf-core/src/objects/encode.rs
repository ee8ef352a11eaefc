//! Byte encoding of PDF values (ISO 32000-1 Section 7.3)
//!
//! [`encode`] is a pure function: the same value always produces the same
//! bytes, and references are written as `<number> <generation> R` rather than
//! inlined.

use crate::objects::Object;

/// Encodes a value into its PDF byte representation.
pub fn encode(object: &Object) -> Vec<u8> {
    let mut buf = Vec::new();
    encode_into(&mut buf, object);
    buf
}

/// Appends the encoding of `object` to `buf`.
pub fn encode_into(buf: &mut Vec<u8>, object: &Object) {
    match object {
        Object::Null => buf.extend_from_slice(b"null"),
        Object::Boolean(b) => buf.extend_from_slice(if *b { b"true" } else { b"false" }),
        Object::Integer(i) => buf.extend_from_slice(i.to_string().as_bytes()),
        Object::Real(f) => buf.extend_from_slice(format_real(*f).as_bytes()),
        Object::String(s) => encode_text_string(buf, s),
        Object::Name(n) => encode_name(buf, n),
        Object::Array(arr) => {
            buf.push(b'[');
            for (i, obj) in arr.iter().enumerate() {
                if i > 0 {
                    buf.push(b' ');
                }
                encode_into(buf, obj);
            }
            buf.push(b']');
        }
        Object::Dictionary(dict) => {
            buf.extend_from_slice(b"<<");
            for (key, value) in dict.iter() {
                buf.push(b'\n');
                encode_name(buf, key);
                buf.push(b' ');
                encode_into(buf, value);
            }
            buf.extend_from_slice(b"\n>>");
        }
        Object::Stream(dict, data) => {
            encode_into(buf, &Object::Dictionary(dict.clone()));
            buf.extend_from_slice(b"\nstream\n");
            buf.extend_from_slice(data);
            buf.extend_from_slice(b"\nendstream");
        }
        Object::Reference(id) => {
            buf.extend_from_slice(format!("{} {} R", id.number(), id.generation()).as_bytes());
        }
    }
}

/// Formats a real with at most six decimals and no trailing zeros.
pub fn format_real(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Text strings that are plain printable ASCII go out as literal strings;
/// anything else is written as UTF-16BE with a byte order mark, hex encoded.
fn encode_text_string(buf: &mut Vec<u8>, text: &str) {
    let printable = text
        .bytes()
        .all(|b| b == b'\n' || b == b'\r' || b == b'\t' || (0x20..=0x7E).contains(&b));

    if printable {
        buf.extend_from_slice(&escape_literal(text.as_bytes()));
    } else {
        let mut utf16 = vec![0xFE, 0xFF];
        for unit in text.encode_utf16() {
            utf16.extend_from_slice(&unit.to_be_bytes());
        }
        buf.push(b'<');
        buf.extend_from_slice(hex::encode_upper(utf16).as_bytes());
        buf.push(b'>');
    }
}

/// Wraps raw bytes in `( )`, escaping delimiters and control characters.
pub fn escape_literal(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 2);
    out.push(b'(');
    for &byte in data {
        match byte {
            b'(' => out.extend_from_slice(b"\\("),
            b')' => out.extend_from_slice(b"\\)"),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            _ => out.push(byte),
        }
    }
    out.push(b')');
    out
}

fn encode_name(buf: &mut Vec<u8>, name: &str) {
    buf.push(b'/');
    for byte in name.bytes() {
        match byte {
            b'!'
            | b'"'
            | b'$'..=b'&'
            | b'\''
            | b'*'..=b'.'
            | b'0'..=b'9'
            | b';'
            | b'='
            | b'?'
            | b'@'
            | b'A'..=b'Z'
            | b'^'..=b'z'
            | b'|'
            | b'~' => buf.push(byte),
            _ => buf.extend_from_slice(format!("#{byte:02X}").as_bytes()),
        }
    }
}
