//! Dataset sources: local files or HTTP(S) URLs, optionally gzip-compressed.

use std::io::Read;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::error::SourceError;

/// Downloads a URL with a blocking client and returns the body.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>, SourceError> {
    let http = |source| SourceError::Http {
        url: url.to_string(),
        source,
    };
    let resp = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(http)?;
    Ok(resp.bytes().map_err(http)?.to_vec())
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Gzip streams start with the magic bytes `1f 8b`.
fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0x1f, 0x8b])
}

/// Inflates gzip data; anything else is returned as-is.
pub fn decompress(source: &str, bytes: Vec<u8>) -> Result<Vec<u8>, SourceError> {
    if !is_gzip(&bytes) {
        return Ok(bytes);
    }
    let mut out = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut out)
        .map_err(|error| SourceError::Gzip {
            source_name: source.to_string(),
            error,
        })?;
    debug!(compressed = bytes.len(), inflated = out.len(), "Source decompressed");
    Ok(out)
}

/// Loads a dataset from a local path or URL, inflating gzip content.
#[tracing::instrument(fields(source = %source))]
pub fn read_source(source: &str) -> Result<Vec<u8>, SourceError> {
    let bytes = if is_url(source) {
        fetch_bytes(source)?
    } else {
        std::fs::read(source).map_err(|e| SourceError::Io {
            path: source.to_string(),
            source: e,
        })?
    };
    debug!(bytes = bytes.len(), "Source bytes read");
    decompress(source, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/pbp.csv.gz"));
        assert!(is_url("http://localhost/pbp.csv"));
        assert!(!is_url("data/play_by_play_2024.csv"));
    }

    #[test]
    fn test_plain_bytes_pass_through() {
        let out = decompress("plain", b"a,b\n1,2\n".to_vec()).unwrap();
        assert_eq!(out, b"a,b\n1,2\n");
    }

    #[test]
    fn test_gzip_round_trip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"play_id,epa\n1,0.5\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let out = decompress("pbp.csv.gz", compressed).unwrap();
        assert_eq!(out, b"play_id,epa\n1,0.5\n");
    }

    #[test]
    fn test_corrupt_gzip_errors() {
        let err = decompress("bad.gz", vec![0x1f, 0x8b, 0x00, 0x01]).unwrap_err();
        assert!(matches!(err, SourceError::Gzip { .. }));
    }

    #[test]
    fn test_missing_file_errors() {
        let err = read_source("/nonexistent/qb_rater/pbp.csv").unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }
}
