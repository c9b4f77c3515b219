//! [`Crate`]: a named crate file on disk with a load-once track list.
//!
//! ```no_run
//! use seratocrate::Crate;
//!
//! let mut c = Crate::new("Warmup", "/Users/dj/Music/_Serato_/Subcrates");
//! for p in c.song_paths()? {
//!     println!("{p}");
//! }
//! c.add_song("/Users/dj/Music/new.mp3")?;
//! c.save()?;
//! # Ok::<(), seratocrate::CrateError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::decode::decode;
use crate::encode::encode;
use crate::error::{CrateError, CrateResult};
use crate::path::{absolutize, stored_text};

/// File extension of crate files.
pub const CRATE_EXTENSION: &str = "crate";

#[derive(Debug, Clone)]
pub struct Crate {
    name:  String,
    path:  PathBuf,
    /// `None` until the file is read or a song is added.
    songs: Option<Vec<String>>,
}

impl Crate {
    /// Crate `name` inside `dir`. Nothing is read until the track list is needed.
    pub fn new<P: AsRef<Path>>(name: &str, dir: P) -> Self {
        let path = dir.as_ref().join(format!("{name}.{CRATE_EXTENSION}"));
        Self { name: name.to_owned(), path, songs: None }
    }

    /// Crate backed by an explicit file path; the name is the file stem.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_owned();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path, songs: None }
    }

    pub fn name(&self) -> &str { &self.name }

    pub fn path(&self) -> &Path { &self.path }

    pub fn is_loaded(&self) -> bool { self.songs.is_some() }

    /// Track paths in crate order. The file is read and decoded on the first
    /// call only; later calls return the cached list.
    pub fn song_paths(&mut self) -> CrateResult<&[String]> {
        Ok(self.songs_mut()?.as_slice())
    }

    /// Like [`song_paths`](Self::song_paths), but decodes from `raw` instead of
    /// reading the file. A crate that is already loaded ignores `raw`.
    pub fn load_from(&mut self, raw: &[u8]) -> CrateResult<&[String]> {
        if self.songs.is_none() {
            self.songs = Some(decode(raw)?);
        }
        Ok(self.songs.as_deref().unwrap_or_default())
    }

    fn songs_mut(&mut self) -> CrateResult<&mut Vec<String>> {
        if self.songs.is_none() {
            let raw = fs::read(&self.path)?;
            let songs = decode(&raw)?;
            debug!(crate_name = %self.name, tracks = songs.len(), "loaded crate");
            self.songs = Some(songs);
        }
        Ok(self.songs.get_or_insert_with(Vec::new))
    }

    /// Append a track. Relative paths are resolved against the current
    /// working directory. A path that cannot be stored fails with
    /// `InvalidPath` and leaves the list untouched.
    ///
    /// Adding to a crate that has not been loaded starts a fresh list
    /// without reading the file, so a later [`save`](Self::save) replaces
    /// the file contents.
    pub fn add_song(&mut self, song: &str) -> CrateResult<()> {
        let resolved = resolve_song(song)?;
        self.songs.get_or_insert_with(Vec::new).push(resolved);
        Ok(())
    }

    /// Remove every entry equal to `song` (resolved like [`add_song`](Self::add_song)).
    /// Returns whether anything was removed.
    pub fn remove_song(&mut self, song: &str) -> CrateResult<bool> {
        let resolved = resolve_song(song)?;
        let songs = self.songs_mut()?;
        let before = songs.len();
        songs.retain(|s| *s != resolved);
        Ok(songs.len() != before)
    }

    /// Encoded file contents for the current track list.
    pub fn to_bytes(&self) -> CrateResult<Vec<u8>> {
        encode(self.songs.as_deref().unwrap_or_default())
    }

    /// Write the crate to its file, replacing what was there.
    pub fn save(&self) -> CrateResult<()> {
        let bytes = self.to_bytes()?;
        fs::write(&self.path, &bytes)?;
        info!(crate_name = %self.name, path = %self.path.display(), bytes = bytes.len(), "saved crate");
        Ok(())
    }
}

fn resolve_song(song: &str) -> CrateResult<String> {
    let resolved = if song.starts_with('/') {
        absolutize(song, "/")
    } else {
        let cwd = std::env::current_dir()?;
        let cwd = cwd
            .to_str()
            .ok_or_else(|| CrateError::InvalidPath(format!("working directory {} is not UTF-8", cwd.display())))?;
        absolutize(song, cwd)
    };
    stored_text(&resolved)?;
    Ok(resolved)
}
