//! CRC-16/CCITT-FALSE as used by the BR Code `63` field.

const POLY: u16 = 0x1021;
const INIT: u16 = 0xFFFF;

/// CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF, no reflection, no xor-out).
#[must_use]
pub fn crc16_ccitt_false(data: &[u8]) -> u16 {
    data.iter().fold(INIT, |crc, &byte| {
        (0..8).fold(crc ^ (u16::from(byte) << 8), |crc, _| {
            if crc & 0x8000 == 0 {
                crc << 1
            } else {
                (crc << 1) ^ POLY
            }
        })
    })
}

/// Four uppercase hex digits of the CRC over `data`.
#[must_use]
pub fn crc_hex(data: &str) -> String {
    format!("{:04X}", crc16_ccitt_false(data.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(crc16_ccitt_false(b"123456789"), 0x29B1);
    }

    #[test]
    fn test_empty_input_is_init() {
        assert_eq!(crc16_ccitt_false(b""), 0xFFFF);
    }

    #[test]
    fn test_hex_is_padded_uppercase() {
        assert_eq!(crc_hex("123456789"), "29B1");
        assert_eq!(crc_hex("").len(), 4);
    }
}
