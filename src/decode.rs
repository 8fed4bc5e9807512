//! Web-safe base64 decoding of body payloads

use crate::error::{ExtractError, Result};
use crate::types::MimePart;
use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// URL-safe alphabet; decoding accepts payloads with or without padding
pub(crate) const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a web-safe base64 body payload into text.
///
/// Line breaks anywhere in the payload are ignored. Bytes that are not valid
/// UTF-8 are replaced rather than rejected; the HTML parser downstream is
/// permissive anyway.
pub fn decode_body(encoded: &str) -> Result<String> {
    let bytes = if encoded.contains(['\r', '\n']) {
        let unwrapped: String = encoded.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
        BODY_ENGINE.decode(unwrapped)
    } else {
        BODY_ENGINE.decode(encoded)
    }
    .map_err(|e| ExtractError::Decode(format!("invalid web-safe base64: {e}")))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decode the payload of a located HTML leaf
pub fn decode_part(part: &MimePart) -> Result<String> {
    let encoded = part
        .body
        .as_deref()
        .ok_or_else(|| ExtractError::Decode(format!("{} part carries no body", part.content_type)))?;

    decode_body(encoded)
}

/// Encode text the way the mail service encodes bodies
#[must_use]
pub fn encode_body(text: &str) -> String {
    BODY_ENGINE.encode(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_unpadded_payload() {
        assert_eq!(decode_body("aGk").unwrap(), "hi");
        assert_eq!(decode_body("aGk=").unwrap(), "hi");
    }

    #[test]
    fn ignores_line_breaks() {
        let wrapped = "PGRpdiBjbGFzcz0iZ3JlZXRpbmci\r\nPkhpPC9kaXY-\n";
        assert_eq!(decode_body(wrapped).unwrap(), "<div class=\"greeting\">Hi</div>");
        assert_eq!(decode_body("").unwrap(), "");
    }

    #[test]
    fn rejects_standard_alphabet_only_chars() {
        // '+' and '/' belong to the standard alphabet, not the web-safe one
        assert!(decode_body("a+b/").is_err());
    }
}
