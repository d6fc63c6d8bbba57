use crate::error::ConvertError;

const UTF8_BOM: char = '\u{feff}';

/// Decode uploaded bytes as text
///
/// UTF-8 is tried first (a leading byte-order mark is dropped). On failure the
/// bytes are read as Latin-1, where every byte maps to one character, so the
/// fallback accepts any payload. [`ConvertError::Decode`] stays part of the
/// signature for decoders that can fail.
///
/// # Arguments
/// * `bytes` - Raw upload content
///
/// # Returns
/// * `Result<String, ConvertError>` - The decoded text
pub fn decode_text(bytes: &[u8]) -> Result<String, ConvertError> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string()),
        Err(e) => {
            log::debug!("input is not UTF-8 ({}), falling back to Latin-1", e);
            Ok(bytes.iter().map(|&b| b as char).collect())
        }
    }
}
