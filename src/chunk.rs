//! Chunk framing shared by the decoder and the encoder.
//!
//! A crate file is a flat sequence of chunks. Every chunk starts with an
//! 8-byte header:
//!
//! | Offset | Size | Field                                  |
//! |--------|------|----------------------------------------|
//! | 0      | 4    | ASCII tag, not NUL-terminated          |
//! | 4      | 4    | payload length, unsigned big-endian    |
//!
//! Container chunks (`otrk`) carry further chunks in their payload; leaf
//! chunks (`ptrk`, `vrsn`) carry text in the format's null-interleaved
//! encoding, see [`encode_text`].

use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::error::{CrateError, CrateResult};

/// Size of the tag + length header in front of every chunk payload.
pub const HEADER_LEN: usize = 8;

pub type Tag = [u8; 4];

/// Version / identification chunk at the start of every file.
pub const TAG_VERSION: Tag = *b"vrsn";
/// Track container; wraps exactly one path chunk.
pub const TAG_TRACK: Tag = *b"otrk";
/// Track path payload.
pub const TAG_PATH: Tag = *b"ptrk";

/// Printable form of a tag, with non-ASCII bytes escaped.
pub fn tag_name(tag: &Tag) -> String {
    tag.iter().map(|&b| std::ascii::escape_default(b).to_string()).collect()
}

// ── Integers ──────────────────────────────────────────────────────────────────

pub fn encode_length(n: u32) -> [u8; 4] {
    let mut out = [0u8; 4];
    BigEndian::write_u32(&mut out, n);
    out
}

pub fn decode_length(bytes: &[u8]) -> CrateResult<u32> {
    if bytes.len() < 4 {
        return Err(CrateError::malformed(0, format!("length field needs 4 bytes, got {}", bytes.len())));
    }
    Ok(BigEndian::read_u32(&bytes[..4]))
}

// ── Text ──────────────────────────────────────────────────────────────────────

/// Highest character the one-byte-per-character text form can hold.
pub const MAX_TEXT_CHAR: char = '\u{ff}';

/// Encode `s` as a zero byte followed by its characters joined with zero
/// bytes, one byte per character.
///
/// A non-empty string of `n` characters encodes to `2 * n` bytes (UTF-16BE
/// restricted to U+0001..=U+00FF). The empty string encodes to a single
/// zero byte. Characters above [`MAX_TEXT_CHAR`] keep only their low byte;
/// callers check text with [`is_storable_char`] first.
pub fn encode_text(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 * s.len().max(1));
    out.push(0);
    for (i, c) in s.chars().enumerate() {
        if i > 0 {
            out.push(0);
        }
        out.push(c as u32 as u8);
    }
    out
}

/// Whether `c` survives [`encode_text`] followed by [`decode_text`].
pub fn is_storable_char(c: char) -> bool {
    c != '\0' && c <= MAX_TEXT_CHAR
}

/// Drop every zero byte and read what is left as one character per byte.
///
/// Every character produced is storable, so decoded text always encodes.
pub fn decode_text(bytes: &[u8]) -> String {
    bytes.iter().filter(|&&b| b != 0).map(|&b| b as char).collect()
}

// ── Header ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub tag:    Tag,
    pub length: u32,
}

impl ChunkHeader {
    pub fn new(tag: Tag, length: u32) -> Self {
        Self { tag, length }
    }

    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.tag)?;
        writer.write_u32::<BigEndian>(self.length)?;
        Ok(())
    }

    pub fn read<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut tag = [0u8; 4];
        reader.read_exact(&mut tag)?;
        let length = reader.read_u32::<BigEndian>()?;
        Ok(Self { tag, length })
    }
}

// ── Structural walk ───────────────────────────────────────────────────────────

/// One chunk located inside a buffer.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// Absolute offset of the chunk header within the file.
    pub offset:  usize,
    pub tag:     Tag,
    pub payload: &'a [u8],
}

impl<'a> Chunk<'a> {
    /// Iterate the chunks nested in this chunk's payload.
    pub fn children(&self) -> Chunks<'a> {
        Chunks::nested(self.payload, self.offset + HEADER_LEN)
    }
}

/// Iterator over consecutive chunks in a buffer.
///
/// Reads a header at the cursor, yields the chunk, and advances by
/// `8 + length`. A header cut short or a length running past the end of the
/// buffer yields one `Malformed` error, after which the iterator is fused.
pub struct Chunks<'a> {
    buf:    &'a [u8],
    pos:    usize,
    base:   usize,
    failed: bool,
}

impl<'a> Chunks<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::nested(buf, 0)
    }

    /// `base` is the absolute file offset of `buf[0]`, used in error reports.
    pub fn nested(buf: &'a [u8], base: usize) -> Self {
        Self { buf, pos: 0, base, failed: false }
    }

    fn fail(&mut self, offset: usize, reason: String) -> Option<CrateResult<Chunk<'a>>> {
        self.failed = true;
        Some(Err(CrateError::malformed(self.base + offset, reason)))
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = CrateResult<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        let at = self.pos;
        let rest = &self.buf[at..];
        if rest.len() < HEADER_LEN {
            return self.fail(at, format!("truncated chunk header ({} of {HEADER_LEN} bytes)", rest.len()));
        }
        let header = match ChunkHeader::read(&rest[..HEADER_LEN]) {
            Ok(h) => h,
            Err(e) => {
                self.failed = true;
                return Some(Err(e.into()));
            }
        };

        let start = at + HEADER_LEN;
        let available = self.buf.len() - start;
        if header.length as usize > available {
            return self.fail(at, format!(
                "`{}` chunk declares {} payload bytes but only {} remain",
                tag_name(&header.tag), header.length, available,
            ));
        }
        let end = start + header.length as usize;
        self.pos = end;

        Some(Ok(Chunk {
            offset:  self.base + at,
            tag:     header.tag,
            payload: &self.buf[start..end],
        }))
    }
}
