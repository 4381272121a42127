//! PIX BR Code (EMV QR "copia e cola") encoding.

pub mod crc;
pub mod error;
pub mod payload;
pub mod tlv;

pub use crc::{crc16_ccitt_false, crc_hex};
pub use error::PixError;
pub use payload::{PixPayload, format_amount, validate_crc, with_amount};
pub use tlv::{TlvField, parse_fields};
