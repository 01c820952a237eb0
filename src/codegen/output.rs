//! Normalization and persistence of the generated artifact.
//!
//! - The rendered text is parsed with `syn` and printed back with
//!   `prettyplease`, so the artifact is always valid and consistently laid out.
//! - `prettyplease` keeps doc comments but drops plain `//` comments, so the
//!   banner and the checksum footer are attached afterwards and the final
//!   text is parsed once more.
//! - Writes go to a temp file in the target directory and are renamed into
//!   place, so a failed run leaves the previous artifact untouched.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::checksum::{Digest, footer_line};
use crate::error::GenerateError;

pub const BANNER: &str = "// This file is generated by alphavantage-apigen. Do not edit by hand.";

/// Parses `source` as a Rust file and reprints it.
pub fn normalize(source: &str) -> Result<String, GenerateError> {
    let file = syn::parse_file(source)?;
    Ok(prettyplease::unparse(&file))
}

/// Adds the banner and the checksum footer to formatted source. The footer
/// is always the last line.
pub fn finalize(formatted: &str, digest: &Digest) -> Result<String, GenerateError> {
    let text = format!("{BANNER}\n\n{}\n{}", formatted.trim_end(), footer_line(digest));
    syn::parse_file(&text)?;
    Ok(text)
}

pub fn write_atomic(path: &Path, content: &str) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| GenerateError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("rs.tmp");
    fs::write(&temp_path, content).map_err(|source| GenerateError::Write {
        path: temp_path.clone(),
        source,
    })?;

    if let Err(source) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(GenerateError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    info!(path = %path.display(), bytes = content.len(), "Wrote generated bindings");
    Ok(())
}
