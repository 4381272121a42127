//! EMV TLV fields: two-digit tag, two-digit byte length, value.

use super::error::PixError;

/// Largest value a two-digit length prefix can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// One top-level TLV field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvField {
    /// Two-digit tag.
    pub tag: String,
    /// Raw value.
    pub value: String,
}

impl TlvField {
    /// Creates a field.
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: value.into(),
        }
    }
}

fn is_valid_tag(tag: &str) -> bool {
    tag.len() == 2 && tag.bytes().all(|b| b.is_ascii_digit())
}

/// Encodes a single field.
pub fn encode_field(tag: &str, value: &str) -> Result<String, PixError> {
    if !is_valid_tag(tag) {
        return Err(PixError::InvalidTag(tag.to_string()));
    }
    let len = value.len();
    if len > MAX_VALUE_LEN {
        return Err(PixError::FieldTooLong {
            tag: tag.to_string(),
            len,
        });
    }
    Ok(format!("{tag}{len:02}{value}"))
}

/// Encodes fields in order.
pub fn encode_fields(fields: &[TlvField]) -> Result<String, PixError> {
    fields
        .iter()
        .map(|f| encode_field(&f.tag, &f.value))
        .collect()
}

/// Parses a sequence of top-level fields.
///
/// # Errors
///
/// Returns `PixError::Malformed` with the byte offset where parsing failed.
pub fn parse_fields(payload: &str) -> Result<Vec<TlvField>, PixError> {
    let mut fields = Vec::new();
    let mut pos = 0;
    while pos < payload.len() {
        let header = payload.get(pos..pos + 4).ok_or(PixError::Malformed(pos))?;
        let tag = header
            .get(..2)
            .filter(|t| is_valid_tag(t))
            .ok_or(PixError::Malformed(pos))?;
        let len: usize = header
            .get(2..)
            .filter(|l| l.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|l| l.parse().ok())
            .ok_or(PixError::Malformed(pos + 2))?;
        let start = pos + 4;
        let value = payload
            .get(start..start + len)
            .ok_or(PixError::Malformed(start))?;
        fields.push(TlvField::new(tag, value));
        pos = start + len;
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_field() {
        assert_eq!(encode_field("00", "01").unwrap(), "000201");
        assert_eq!(encode_field("58", "BR").unwrap(), "5802BR");
    }

    #[test]
    fn test_length_counts_bytes() {
        assert_eq!(encode_field("02", "ação").unwrap(), "0206ação");
    }

    #[test]
    fn test_encode_rejects_long_value() {
        let err = encode_field("26", &"x".repeat(100)).unwrap_err();
        assert_eq!(
            err,
            PixError::FieldTooLong {
                tag: "26".to_string(),
                len: 100
            }
        );
    }

    #[test]
    fn test_encode_rejects_bad_tag() {
        assert!(matches!(encode_field("5", "x"), Err(PixError::InvalidTag(_))));
        assert!(matches!(encode_field("AB", "x"), Err(PixError::InvalidTag(_))));
    }

    #[test]
    fn test_parse_fields() {
        let fields = parse_fields("0002015802BR6304ABCD").unwrap();
        assert_eq!(
            fields,
            vec![
                TlvField::new("00", "01"),
                TlvField::new("58", "BR"),
                TlvField::new("63", "ABCD"),
            ]
        );
    }

    #[test]
    fn test_parse_truncated() {
        assert_eq!(parse_fields("000"), Err(PixError::Malformed(0)));
        assert_eq!(parse_fields("0005AB"), Err(PixError::Malformed(4)));
        assert_eq!(parse_fields("00XX01"), Err(PixError::Malformed(2)));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_fields("").unwrap().is_empty());
    }
}
