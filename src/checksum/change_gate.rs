use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest as _, Sha256};
use tracing::{debug, info, warn};

use crate::error::{ApiGenError, Result};

pub type Digest = [u8; 32];

/// Stands in for the previous digest when there is no usable artifact.
pub const ZERO_DIGEST: Digest = [0; 32];

pub const FOOTER_TAG: &str = "// Checksum: ";
/// `// Checksum: ` + 44 base64 characters + newline.
pub const FOOTER_LEN: usize = FOOTER_TAG.len() + 44 + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    pub digest: Digest,
    pub proceed: bool,
}

pub fn digest(canonical: &[u8]) -> Digest {
    Sha256::digest(canonical).into()
}

pub fn encode_digest(digest: &Digest) -> String {
    STANDARD.encode(digest)
}

/// Compares the canonical page against the digest of the last generation.
pub fn should_regenerate(canonical: &[u8], previous: &Digest) -> GateDecision {
    let current = digest(canonical);
    if &current == previous {
        info!(digest = %encode_digest(&current), "Checksums match");
        return GateDecision {
            digest: current,
            proceed: false,
        };
    }

    info!(
        previous = %encode_digest(previous),
        current = %encode_digest(&current),
        "Checksums do not match"
    );
    GateDecision {
        digest: current,
        proceed: true,
    }
}

/// The footer line appended to every generated artifact.
pub fn footer_line(digest: &Digest) -> String {
    format!("{FOOTER_TAG}{}\n", encode_digest(digest))
}

/// Decodes a footer line. `None` when the text is not a well-formed footer.
pub fn parse_footer(line: &str) -> Option<Digest> {
    let encoded = line.trim().strip_prefix(FOOTER_TAG.trim_end())?.trim();
    let bytes = STANDARD.decode(encoded).ok()?;
    Digest::try_from(bytes.as_slice()).ok()
}

/// Recovers the digest recorded in the footer of a previously generated
/// artifact. A missing or truncated artifact yields [`ZERO_DIGEST`].
pub fn previous_digest(artifact: &Path) -> Result<Digest> {
    let io_err = |source| ApiGenError::Io {
        path: artifact.to_path_buf(),
        source,
    };

    let mut file = match File::open(artifact) {
        Ok(file) => file,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %artifact.display(), "No previous artifact");
            return Ok(ZERO_DIGEST);
        }
        Err(err) => return Err(io_err(err)),
    };

    let size = file.metadata().map_err(io_err)?.len();
    if size < FOOTER_LEN as u64 {
        debug!(path = %artifact.display(), size, "Previous artifact too short for a footer");
        return Ok(ZERO_DIGEST);
    }

    let mut tail = vec![0; FOOTER_LEN];
    file.seek(SeekFrom::End(-(FOOTER_LEN as i64)))
        .map_err(io_err)?;
    file.read_exact(&mut tail).map_err(io_err)?;

    match std::str::from_utf8(&tail).ok().and_then(parse_footer) {
        Some(digest) => Ok(digest),
        None => {
            warn!(
                path = %artifact.display(),
                "Previous artifact has no readable checksum footer, regenerating"
            );
            Ok(ZERO_DIGEST)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footer_has_fixed_length() {
        let line = footer_line(&digest(b"anything"));
        assert_eq!(line.len(), FOOTER_LEN);
        assert_eq!(FOOTER_LEN, 58);
        assert!(line.starts_with(FOOTER_TAG));
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn footer_round_trips() {
        let d = digest(b"<html></html>");
        assert_eq!(parse_footer(&footer_line(&d)), Some(d));
    }

    #[test]
    fn malformed_footers_are_rejected() {
        assert_eq!(parse_footer("// Checksum: not base64!"), None);
        assert_eq!(parse_footer("// Checksum: AAAA"), None);
        assert_eq!(parse_footer("}\n"), None);
    }

    #[test]
    fn unchanged_page_does_not_proceed() {
        let page = b"<html>same</html>";
        let decision = should_regenerate(page, &digest(page));
        assert!(!decision.proceed);
        assert_eq!(decision.digest, digest(page));
    }

    #[test]
    fn zero_digest_always_proceeds() {
        assert!(should_regenerate(b"", &ZERO_DIGEST).proceed);
    }

    #[test]
    fn previous_digest_of_missing_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let digest = previous_digest(&dir.path().join("api_generated.rs")).unwrap();
        assert_eq!(digest, ZERO_DIGEST);
    }

    #[test]
    fn previous_digest_of_short_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_generated.rs");
        std::fs::write(&path, "// Checksum: AAAA\n").unwrap();
        assert_eq!(previous_digest(&path).unwrap(), ZERO_DIGEST);
    }

    #[test]
    fn previous_digest_of_garbled_footer_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_generated.rs");
        std::fs::write(&path, "x".repeat(200)).unwrap();
        assert_eq!(previous_digest(&path).unwrap(), ZERO_DIGEST);
    }

    #[test]
    fn previous_digest_reads_the_last_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api_generated.rs");
        let d = digest(b"page");
        std::fs::write(&path, format!("pub struct A;\n\n{}", footer_line(&d))).unwrap();
        assert_eq!(previous_digest(&path).unwrap(), d);
    }
}
