pub mod error;
pub mod chunk;
pub mod header;
pub mod path;
pub mod decode;
pub mod encode;
pub mod recovery;
pub mod crate_file;
pub mod library;

pub use error::{CrateError, CrateResult};
pub use chunk::{decode_text, encode_text, encode_length, decode_length, Chunk, ChunkHeader, Chunks};
pub use header::{HEADER, VERSION_TEXT};
pub use decode::{decode, decode_lenient};
pub use encode::{encode, encode_to};
pub use crate_file::Crate;
pub use library::{list_crates, LibraryConfig};
