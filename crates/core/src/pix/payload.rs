//! Static PIX "copia e cola" payloads.

use super::crc::crc_hex;
use super::error::PixError;
use super::tlv::{TlvField, encode_field, encode_fields, parse_fields};

const PIX_GUI: &str = "br.gov.bcb.pix";
const MAX_MERCHANT_NAME: usize = 25;
const MAX_MERCHANT_CITY: usize = 15;
const MAX_TXID: usize = 25;
const DEFAULT_TXID: &str = "***";
const CRC_TAG_HEADER: &str = "6304";

/// Data for a static BR Code charge.
#[derive(Debug, Clone, Default)]
pub struct PixPayload {
    /// Receiving PIX key.
    pub key: String,
    /// Merchant name (sanitized and truncated on encode).
    pub merchant_name: String,
    /// Merchant city (sanitized and truncated on encode).
    pub merchant_city: String,
    /// Fixed amount; omitted when absent or not positive.
    pub amount_cents: Option<i64>,
    /// Transaction id, `***` when absent.
    pub txid: Option<String>,
    /// Optional description shown to the payer.
    pub description: Option<String>,
}

impl PixPayload {
    /// Encodes the payload with its CRC.
    ///
    /// # Errors
    ///
    /// Returns `PixError::MissingKey` if no key is set, or
    /// `PixError::FieldTooLong` if key and description overflow field 26.
    pub fn encode(&self) -> Result<String, PixError> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(PixError::MissingKey);
        }

        let mut account = encode_field("00", PIX_GUI)? + &encode_field("01", key)?;
        if let Some(description) = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
        {
            account.push_str(&encode_field("02", description)?);
        }

        let txid: String = self
            .txid
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TXID)
            .chars()
            .take(MAX_TXID)
            .collect();

        let mut fields = vec![
            TlvField::new("00", "01"),
            TlvField::new("01", "11"),
            TlvField::new("26", account),
            TlvField::new("52", "0000"),
            TlvField::new("53", "986"),
        ];
        if let Some(cents) = self.amount_cents.filter(|c| *c > 0) {
            fields.push(TlvField::new("54", format_amount(cents)));
        }
        fields.extend([
            TlvField::new("58", "BR"),
            TlvField::new(
                "59",
                sanitize_merchant_text(&self.merchant_name, MAX_MERCHANT_NAME),
            ),
            TlvField::new(
                "60",
                sanitize_merchant_text(&self.merchant_city, MAX_MERCHANT_CITY),
            ),
            TlvField::new("62", encode_field("05", &txid)?),
        ]);

        Ok(seal(&encode_fields(&fields)?))
    }
}

/// Appends `6304` and the CRC computed over everything before it.
fn seal(payload_without_crc: &str) -> String {
    let to_crc = format!("{payload_without_crc}{CRC_TAG_HEADER}");
    let crc = crc_hex(&to_crc);
    to_crc + &crc
}

/// Formats cents as `units.cc`.
#[must_use]
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Uppercases, collapses whitespace, keeps `[A-Z0-9 ]`, truncates to `max` chars.
#[must_use]
pub fn sanitize_merchant_text(text: &str, max: usize) -> String {
    let upper = text.trim().to_uppercase();
    let collapsed = upper.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == ' ')
        .take(max)
        .collect()
}

/// Checks that a code ends with a `63` field whose CRC matches.
#[must_use]
pub fn validate_crc(code: &str) -> bool {
    let code = code.trim();
    let Some(idx) = code.rfind(CRC_TAG_HEADER) else {
        return false;
    };
    if idx + CRC_TAG_HEADER.len() + 4 != code.len() {
        return false;
    }
    let (body, given) = code.split_at(code.len() - 4);
    given.eq_ignore_ascii_case(&crc_hex(body))
}

/// Rewrites a code with a fixed amount.
///
/// Any existing `54` and `63` fields are dropped, `54` is inserted before
/// `58` (or appended), and the CRC is recomputed.
///
/// # Errors
///
/// Returns `PixError::EmptyCode`, `PixError::InvalidAmount` or a parse error.
pub fn with_amount(base_code: &str, amount_cents: i64) -> Result<String, PixError> {
    let base = base_code.trim();
    if base.is_empty() {
        return Err(PixError::EmptyCode);
    }
    if amount_cents <= 0 {
        return Err(PixError::InvalidAmount(amount_cents));
    }

    let mut fields: Vec<TlvField> = parse_fields(base)?
        .into_iter()
        .filter(|f| f.tag != "54" && f.tag != "63")
        .collect();
    let amount = TlvField::new("54", format_amount(amount_cents));
    match fields.iter().position(|f| f.tag == "58") {
        Some(idx) => fields.insert(idx, amount),
        None => fields.push(amount),
    }

    Ok(seal(&encode_fields(&fields)?))
}
