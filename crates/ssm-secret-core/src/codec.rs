//! Gzip + base64 value codec
//!
//! Values stored with `--encode` are gzip-compressed and then base64 encoded
//! (standard alphabet, padded). Decoding is lenient: anything that does not
//! decode cleanly falls back to a literal value and yields a [`CodecWarning`]
//! instead of an error, so one bad key never blocks its siblings.

use crate::types::SecretBundle;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};
use thiserror::Error;
use tracing::{debug, warn};

/// Non-fatal decode problem; the value fell back to a literal
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecWarning {
    /// Input was not base64; the original text is kept
    #[error("base64 decode error: {reason}")]
    InvalidEncoding { reason: String },

    /// Input was base64 but not gzip; the base64-decoded bytes are kept
    #[error("gzip decompress error: {reason}")]
    InvalidCompression { reason: String },
}

/// Result of decoding one value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub value: String,
    pub warning: Option<CodecWarning>,
}

/// Compress and encode a single value
pub fn encode(value: &str) -> std::io::Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(value.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}

/// Decode and decompress a single value, falling back to a literal on failure
pub fn decode(text: &str) -> Decoded {
    if text.is_empty() {
        return Decoded {
            value: String::new(),
            warning: None,
        };
    }

    let raw = match STANDARD.decode(text) {
        Ok(raw) => raw,
        Err(e) => {
            return Decoded {
                value: text.to_string(),
                warning: Some(CodecWarning::InvalidEncoding {
                    reason: e.to_string(),
                }),
            }
        }
    };

    let mut decompressed = Vec::new();
    match GzDecoder::new(raw.as_slice()).read_to_end(&mut decompressed) {
        Ok(_) => Decoded {
            value: String::from_utf8_lossy(&decompressed).into_owned(),
            warning: None,
        },
        Err(e) => Decoded {
            value: String::from_utf8_lossy(&raw).into_owned(),
            warning: Some(CodecWarning::InvalidCompression {
                reason: e.to_string(),
            }),
        },
    }
}

/// Encode every value in a bundle
pub fn encode_bundle(bundle: SecretBundle) -> std::io::Result<SecretBundle> {
    let mut encoded = SecretBundle::new();
    for (key, value) in bundle {
        let value = encode(&value)?;
        debug!("Encoded value for key {} ({} bytes)", key, value.len());
        encoded.insert(key, value);
    }
    Ok(encoded)
}

/// Decode every value in a bundle
///
/// Returns the decoded bundle together with the keys that fell back to a
/// literal value.
pub fn decode_bundle(bundle: SecretBundle) -> (SecretBundle, Vec<(String, CodecWarning)>) {
    let mut warnings = Vec::new();
    let decoded = bundle.map_values(|key, value| {
        let Decoded { value, warning } = decode(&value);
        if let Some(warning) = warning {
            warn!("Key {} kept as literal value: {}", key, warning);
            warnings.push((key.to_string(), warning));
        }
        value
    });
    (decoded, warnings)
}
