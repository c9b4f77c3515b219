//! Crate encoder.
//!
//! Output layout:
//!
//! ```text
//! HEADER (64 B)
//! per path: "otrk" BE32(len(data) + 8) "ptrk" BE32(len(data)) data
//! ```
//!
//! where `data` is the root-relative path in the null-interleaved text
//! encoding. The buffer is meant to be written to storage verbatim.

use std::io::Write;

use tracing::debug;

use crate::chunk::{encode_length, encode_text, HEADER_LEN, TAG_PATH, TAG_TRACK};
use crate::error::{CrateError, CrateResult};
use crate::header::HEADER;
use crate::path::stored_text;

/// Encode an ordered list of absolute paths into crate file bytes.
pub fn encode<P: AsRef<str>>(paths: &[P]) -> CrateResult<Vec<u8>> {
    let mut out = Vec::with_capacity(HEADER.len() + paths.len() * 128);
    encode_to(&mut out, paths)?;
    Ok(out)
}

/// Stream the encoded crate into `writer`.
///
/// Every path is validated before anything is written, so a rejected list
/// leaves `writer` untouched.
pub fn encode_to<W: Write, P: AsRef<str>>(mut writer: W, paths: &[P]) -> CrateResult<()> {
    let tracks = paths
        .iter()
        .map(|p| encode_track(p.as_ref()))
        .collect::<CrateResult<Vec<_>>>()?;

    writer.write_all(&HEADER)?;
    for track in &tracks {
        writer.write_all(track)?;
    }
    debug!(tracks = tracks.len(), "encoded crate");
    Ok(())
}

/// Encode one absolute path as a complete `otrk` chunk.
pub fn encode_track(path: &str) -> CrateResult<Vec<u8>> {
    let rel = stored_text(path)?;
    let data = encode_text(&rel);
    let ptrk_size = u32::try_from(data.len())
        .ok()
        .filter(|n| n.checked_add(HEADER_LEN as u32).is_some())
        .ok_or(CrateError::EncodingOverflow(data.len()))?;
    let otrk_size = ptrk_size + HEADER_LEN as u32;

    let mut out = Vec::with_capacity(2 * HEADER_LEN + data.len());
    out.extend_from_slice(&TAG_TRACK);
    out.extend_from_slice(&encode_length(otrk_size));
    out.extend_from_slice(&TAG_PATH);
    out.extend_from_slice(&encode_length(ptrk_size));
    out.extend_from_slice(&data);
    Ok(out)
}
