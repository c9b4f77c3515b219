//! Tag-pattern scanner: recover track paths without trusting length fields.
//!
//! # How it works
//!
//! Every offset at which the literal bytes `ptrk` occur is treated as the
//! start of a path chunk. For the match at offset `i`:
//!
//! | Bound | Value |
//! |-------|-------|
//! | start | `i + 9`: the tag, the length field, and the leading zero byte of the text |
//! | end   | next match `- 8` (drops the following `otrk` header), or end of buffer |
//!
//! The slice is passed through `decode_text` and resolved against the root.
//! Length fields are never read, so a damaged header cannot stop the scan.
//! The price is that `ptrk` appearing inside path text produces a spurious
//! split; [`crate::decode`] has no such weakness and is the normal path.
//!
//! ## Recovery quality
//!
//! | Quality | Description |
//! |---------|-------------|
//! | `Intact` | Structural decode succeeds and agrees with the scan |
//! | `Divergent` | Structural decode succeeds but the scan disagrees (tag bytes inside paths) |
//! | `Recovered` | Structural decode fails; paths come from the scan only |
//! | `Empty` | Structural decode fails and the scan found nothing |

use std::io;
use std::path::Path;

use crate::chunk::{decode_text, TAG_PATH, HEADER_LEN};
use crate::decode::decode;
use crate::error::CrateError;
use crate::path::resolve_from_root;

/// Bytes between a `ptrk` match and the first significant text byte.
const PATH_TEXT_SKIP: usize = HEADER_LEN + 1;

/// One path found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedPath {
    /// Offset of the `ptrk` bytes in the buffer.
    pub tag_offset: usize,
    pub path:       String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryQuality {
    Intact,
    Divergent,
    Recovered,
    Empty,
}

/// Complete report produced by [`scan`].
#[derive(Debug)]
pub struct ScanReport {
    pub bytes_scanned: usize,
    pub tracks:        Vec<ScannedPath>,
    /// Why the structural decoder rejected the input, if it did.
    pub structural_error: Option<CrateError>,
    pub quality:       RecoveryQuality,
}

impl ScanReport {
    pub fn paths(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.path.clone()).collect()
    }

    pub fn summary(&self) -> String {
        let mut line = format!(
            "{:?}: {} track(s) found by tag scan over {} bytes",
            self.quality, self.tracks.len(), self.bytes_scanned,
        );
        if let Some(e) = &self.structural_error {
            line.push_str(&format!(" (structural decode: {e})"));
        }
        line
    }
}

/// Offsets of every occurrence of `tag` in `raw`, ascending.
pub fn tag_offsets(raw: &[u8], tag: &[u8; 4]) -> Vec<usize> {
    raw.windows(tag.len())
        .enumerate()
        .filter(|(_, w)| *w == tag)
        .map(|(i, _)| i)
        .collect()
}

/// Recover paths by tag-pattern search. Never fails; damaged input yields
/// whatever the slicing produces, possibly nothing.
pub fn scan_paths(raw: &[u8]) -> Vec<String> {
    scan_tracks(raw).into_iter().map(|t| t.path).collect()
}

fn scan_tracks(raw: &[u8]) -> Vec<ScannedPath> {
    let offsets = tag_offsets(raw, &TAG_PATH);
    offsets
        .iter()
        .enumerate()
        .map(|(n, &at)| {
            let start = (at + PATH_TEXT_SKIP).min(raw.len());
            let end = match offsets.get(n + 1) {
                Some(&next) => next.saturating_sub(HEADER_LEN),
                None => raw.len(),
            };
            // Overlapping matches leave an inverted range; treat it as empty.
            let text = if end > start { decode_text(&raw[start..end]) } else { String::new() };
            ScannedPath { tag_offset: at, path: resolve_from_root(&text) }
        })
        .collect()
}

/// Scan `raw` and compare the result with the structural decoder.
pub fn scan(raw: &[u8]) -> ScanReport {
    let tracks = scan_tracks(raw);
    let (structural_error, quality) = match decode(raw) {
        Ok(paths) => {
            let agrees = paths.len() == tracks.len()
                && paths.iter().zip(&tracks).all(|(p, t)| *p == t.path);
            (None, if agrees { RecoveryQuality::Intact } else { RecoveryQuality::Divergent })
        }
        Err(e) if tracks.is_empty() => (Some(e), RecoveryQuality::Empty),
        Err(e) => (Some(e), RecoveryQuality::Recovered),
    };
    ScanReport { bytes_scanned: raw.len(), tracks, structural_error, quality }
}

/// Convenience: scan a file at `path` and return the report.
pub fn scan_file(path: &Path) -> io::Result<ScanReport> {
    let raw = std::fs::read(path)?;
    Ok(scan(&raw))
}
