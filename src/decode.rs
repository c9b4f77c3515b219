//! Crate decoder.
//!
//! Walks the chunk structure instead of searching for tag bytes, so payload
//! text that happens to contain `ptrk` cannot be mistaken for a chunk.
//! For files whose length fields are damaged, [`decode_lenient`] falls back
//! to the tag-pattern scanner in [`crate::recovery`].

use tracing::{debug, trace, warn};

use crate::chunk::{decode_text, tag_name, Chunk, Chunks, TAG_PATH, TAG_TRACK, TAG_VERSION};
use crate::error::{CrateError, CrateResult};
use crate::path::resolve_from_root;
use crate::recovery::scan_paths;

/// Decode a crate file into its ordered list of absolute track paths.
///
/// An input without any `otrk` chunk (including an empty input) is an empty
/// crate. Chunk tags other than `vrsn` and `otrk` are skipped.
pub fn decode(raw: &[u8]) -> CrateResult<Vec<String>> {
    let mut paths = Vec::new();
    for chunk in Chunks::new(raw) {
        let chunk = chunk?;
        match chunk.tag {
            TAG_TRACK => paths.push(decode_track(&chunk)?),
            TAG_VERSION => {}
            other => trace!(tag = %tag_name(&other), offset = chunk.offset, "skipping chunk"),
        }
    }
    debug!(bytes = raw.len(), tracks = paths.len(), "decoded crate");
    Ok(paths)
}

/// Like [`decode`], but recovers what it can from structurally broken input.
pub fn decode_lenient(raw: &[u8]) -> Vec<String> {
    match decode(raw) {
        Ok(paths) => paths,
        Err(e) => {
            warn!(error = %e, "structural decode failed, scanning for path tags");
            scan_paths(raw)
        }
    }
}

/// Every child of the `otrk` must be a whole chunk, and exactly one of them
/// a `ptrk`; bytes that do not form a chunk are reported, not skipped.
fn decode_track(track: &Chunk<'_>) -> CrateResult<String> {
    let mut path = None;
    for inner in track.children() {
        let inner = inner?;
        if inner.tag != TAG_PATH {
            continue;
        }
        if path.is_some() {
            return Err(CrateError::malformed(inner.offset, "`otrk` chunk has a second `ptrk` chunk"));
        }
        path = Some(resolve_from_root(&decode_text(inner.payload)));
    }
    path.ok_or_else(|| CrateError::malformed(track.offset, "`otrk` chunk has no `ptrk` chunk"))
}
