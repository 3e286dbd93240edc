//! Whole-file decoding and encoding, detected from the byte order mark.

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("invalid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },
    #[error("unpaired UTF-16 surrogate {unit:#06x}")]
    InvalidUtf16 { unit: u16 },
    #[error("odd number of bytes in UTF-16 data")]
    OddLength,
}

impl Encoding {
    /// Detects the encoding and decodes `bytes`, stripping any byte order mark.
    pub fn decode(bytes: &[u8]) -> Result<(String, Self), EncodingError> {
        if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
            return Ok((decode_utf8(rest)?, Self::Utf8Bom));
        }
        if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
            return Ok((decode_utf16(rest, u16::from_le_bytes)?, Self::Utf16Le));
        }
        if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
            return Ok((decode_utf16(rest, u16::from_be_bytes)?, Self::Utf16Be));
        }
        Ok((decode_utf8(bytes)?, Self::Utf8))
    }

    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf8Bom => [UTF8_BOM, text.as_bytes()].concat(),
            Self::Utf16Le => {
                let mut bytes = UTF16_LE_BOM.to_vec();
                bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
                bytes
            }
            Self::Utf16Be => {
                let mut bytes = UTF16_BE_BOM.to_vec();
                bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                bytes
            }
        }
    }
}

fn decode_utf8(bytes: &[u8]) -> Result<String, EncodingError> {
    String::from_utf8(bytes.to_vec())
        .map_err(|error| EncodingError::InvalidUtf8 { offset: error.utf8_error().valid_up_to() })
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, EncodingError> {
    if bytes.len() % 2 != 0 {
        return Err(EncodingError::OddLength);
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|error| EncodingError::InvalidUtf16 { unit: error.unpaired_surrogate() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_byte_order_marks() {
        for encoding in [Encoding::Utf8, Encoding::Utf8Bom, Encoding::Utf16Le, Encoding::Utf16Be] {
            let bytes = encoding.encode("<a>ü</a>\r\n");
            assert_eq!(Encoding::decode(&bytes), Ok(("<a>ü</a>\r\n".to_owned(), encoding)));
        }
    }

    #[test]
    fn reports_invalid_data() {
        assert_eq!(Encoding::decode(b"ab\xFFc"), Err(EncodingError::InvalidUtf8 { offset: 2 }));
        assert_eq!(Encoding::decode(&[0xFF, 0xFE, 0x41]), Err(EncodingError::OddLength));
        assert_eq!(Encoding::decode(&[0xFF, 0xFE, 0x00, 0xD8]), Err(EncodingError::InvalidUtf16 { unit: 0xD800 }));
    }
}
