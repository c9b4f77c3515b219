use crate::chunk::{decode_text, tag_name, Chunks, TAG_VERSION};
use crate::error::{CrateError, CrateResult};

/// Version string carried by the `vrsn` chunk.
pub const VERSION_TEXT: &str = "1.0/Serato ScratchLive Crate";

/// Fixed `vrsn` chunk written at the start of every crate.
///
/// Tag, a 56-byte length, then `VERSION_TEXT` null-interleaved. The two
/// spaces of the version string are stored as zero bytes, so the header
/// reads back as `"1.0/SeratoScratchLiveCrate"` through `decode_text`.
pub const HEADER: [u8; 64] = [
    b'v', b'r', b's', b'n', 0x00, 0x00, 0x00, 0x38,
    0x00, b'1', 0x00, b'.', 0x00, b'0', 0x00, b'/',
    0x00, b'S', 0x00, b'e', 0x00, b'r', 0x00, b'a',
    0x00, b't', 0x00, b'o', 0x00, 0x00, 0x00, b'S',
    0x00, b'c', 0x00, b'r', 0x00, b'a', 0x00, b't',
    0x00, b'c', 0x00, b'h', 0x00, b'L', 0x00, b'i',
    0x00, b'v', 0x00, b'e', 0x00, 0x00, 0x00, b'C',
    0x00, b'r', 0x00, b'a', 0x00, b't', 0x00, b'e',
];

/// Read the version text of the leading `vrsn` chunk.
pub fn read_version(raw: &[u8]) -> CrateResult<String> {
    match Chunks::new(raw).next() {
        Some(Ok(chunk)) if chunk.tag == TAG_VERSION => Ok(decode_text(chunk.payload)),
        Some(Ok(chunk)) => Err(CrateError::malformed(
            chunk.offset,
            format!("expected `vrsn` chunk, found `{}`", tag_name(&chunk.tag)),
        )),
        Some(Err(e)) => Err(e),
        None => Err(CrateError::malformed(0, "empty crate has no `vrsn` chunk")),
    }
}
