//! # Manifest Module
//!
//! Reads precomputed fingerprints for the CLI.
//!
//! Hashing images is left to whichever tool produced the manifest; this
//! module only pairs identifiers with fingerprints.
//!
//! ## Formats
//! Tab-separated lines (blank lines and `#` comments are ignored):
//! ```text
//! # path<TAB>hex fingerprint
//! cam01/IMG_0001.jpg	f0e1d2c3b4a59687
//! cam01/IMG_0002.jpg	f0e1d2c3b4a59686
//! ```
//!
//! Or a JSON array:
//! ```json
//! [{ "path": "cam01/IMG_0001.jpg", "hash": "f0e1d2c3b4a59687" }]
//! ```
//!
//! Entries whose fingerprint cannot be parsed are skipped and reported in
//! [`Manifest::errors`], so the remaining entries are always the valid subset.

use crate::core::fingerprint::Fingerprint;
use crate::error::ManifestError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One identifier with its fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Identifier exactly as written in the manifest
    pub path: String,
    /// The fingerprint for `path`
    pub fingerprint: Fingerprint,
}

/// Raw JSON entry, before the fingerprint is validated
#[derive(Debug, Deserialize)]
struct RawEntry {
    path: String,
    hash: String,
}

/// Parsed manifest
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Valid entries, in manifest order
    pub entries: Vec<ManifestEntry>,
    /// Entries that were skipped (non-fatal)
    pub errors: Vec<String>,
}

impl Manifest {
    /// Read a manifest file, detecting JSON by a leading `[`
    pub fn read(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Parse manifest text in either format
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        if text.trim_start().starts_with('[') {
            Self::parse_json(text)
        } else {
            Self::parse_lines(text)
        }
    }

    /// Parse the tab-separated format
    pub fn parse_lines(text: &str) -> Result<Self, ManifestError> {
        let mut manifest = Manifest::default();

        for (number, line) in text.lines().enumerate() {
            let line_number = number + 1;
            let trimmed = line.trim_end_matches('\r');
            if trimmed.trim().is_empty() || trimmed.trim_start().starts_with('#') {
                continue;
            }

            let (path, hash) = split_line(trimmed).ok_or_else(|| ManifestError::Parse {
                line: line_number,
                reason: "expected '<path><TAB><hex fingerprint>'".to_string(),
            })?;

            manifest.push(path.to_string(), hash, line_number);
        }

        Ok(manifest)
    }

    /// Parse the JSON array format
    pub fn parse_json(text: &str) -> Result<Self, ManifestError> {
        let raw: Vec<RawEntry> = serde_json::from_str(text)?;
        let mut manifest = Manifest::default();

        for (position, entry) in raw.into_iter().enumerate() {
            manifest.push(entry.path, &entry.hash, position + 1);
        }

        Ok(manifest)
    }

    fn push(&mut self, path: String, hash: &str, location: usize) {
        match Fingerprint::from_hex(hash) {
            Ok(fingerprint) => self.entries.push(ManifestEntry { path, fingerprint }),
            Err(error) => self
                .errors
                .push(format!("entry {}: {}: {}", location, path, error)),
        }
    }

    /// Stable sort by (parent directory, file name)
    pub fn sort_by_directory(&mut self) {
        self.entries.sort_by(|a, b| directory_key(&a.path).cmp(&directory_key(&b.path)));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Split into parallel identifier and fingerprint lists
    pub fn into_parts(self) -> (Vec<String>, Vec<Fingerprint>) {
        self.entries
            .into_iter()
            .map(|entry| (entry.path, entry.fingerprint))
            .unzip()
    }
}

/// Split a line at its tab, or at its last space when the trailing token is hex
fn split_line(line: &str) -> Option<(&str, &str)> {
    if let Some(split) = line.rsplit_once('\t') {
        return Some(split);
    }
    line.trim_end()
        .rsplit_once(' ')
        .filter(|(_, hash)| !hash.is_empty() && hash.chars().all(|c| c.is_ascii_hexdigit()))
}

fn directory_key(path: &str) -> (String, String) {
    let path = Path::new(path);
    let parent = path
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (parent, name)
}
