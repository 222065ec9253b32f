//! The `.mem` file format.
//!
//! ```text
//! # Recall Memory File v2.5
//! # Do not edit manually
//! # sha256: <hex digest of the base64 body>
//! <base64 of gzip-compressed JSON>
//! ```
//!
//! Lines starting with `#` are preamble. Everything else is concatenated to
//! form the body. Files without a checksum line are still accepted.

use std::io::{Read, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::record::MemoryRecord;

/// Payload format revision written by this crate.
pub const FORMAT_VERSION: &str = "2.5";

/// Extension of memory files, with the leading dot.
pub const MEM_EXTENSION: &str = ".mem";

/// Major revision this crate can read.
const SUPPORTED_MAJOR: &str = "2";

const CHECKSUM_PREFIX: &str = "# sha256:";

/// Serialize a record into the text of a `.mem` file.
pub fn encode(record: &MemoryRecord) -> Result<String> {
    let json = serde_json::to_string_pretty(record)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json.as_bytes())?;
    let compressed = encoder.finish()?;

    let body = STANDARD.encode(compressed);
    let checksum = checksum(&body);

    Ok(format!(
        "# Recall Memory File v{FORMAT_VERSION}\n# Do not edit manually\n{CHECKSUM_PREFIX} {checksum}\n{body}\n"
    ))
}

/// Parse the text of a `.mem` file.
///
/// Every failure to reconstruct the payload is [`StoreError::Corrupt`],
/// except a readable payload from another major revision, which is
/// [`StoreError::UnsupportedVersion`].
pub fn decode(text: &str) -> Result<MemoryRecord> {
    let mut expected = None;
    let mut body = String::new();

    for line in text.lines() {
        if let Some(digest) = line.strip_prefix(CHECKSUM_PREFIX) {
            expected = Some(digest.trim().to_string());
        } else if !line.starts_with('#') {
            body.push_str(line.trim());
        }
    }

    if body.is_empty() {
        return Err(StoreError::Corrupt("empty payload".to_string()));
    }
    if let Some(expected) = expected {
        let actual = checksum(&body);
        if !actual.eq_ignore_ascii_case(&expected) {
            return Err(StoreError::Corrupt(format!(
                "checksum mismatch (expected {expected}, got {actual})"
            )));
        }
    }

    let compressed = STANDARD
        .decode(body.as_bytes())
        .map_err(|e| StoreError::Corrupt(format!("invalid base64: {e}")))?;

    let mut json = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut json)
        .map_err(|e| StoreError::Corrupt(format!("invalid gzip payload: {e}")))?;

    let value: serde_json::Value = serde_json::from_str(&json)
        .map_err(|e| StoreError::Corrupt(format!("invalid JSON: {e}")))?;

    let version = value
        .get("version")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| StoreError::Corrupt("missing version".to_string()))?;
    if version.split('.').next() != Some(SUPPORTED_MAJOR) {
        return Err(StoreError::UnsupportedVersion {
            found: version.to_string(),
            supported: format!("{SUPPORTED_MAJOR}.x"),
        });
    }

    let record: MemoryRecord = serde_json::from_value(value)
        .map_err(|e| StoreError::Corrupt(format!("unexpected record shape: {e}")))?;
    debug!("Decoded memory for {} (v{})", record.project, record.version);
    Ok(record)
}

fn checksum(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}
