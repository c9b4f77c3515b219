//! Locating crate files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::crate_file::{Crate, CRATE_EXTENSION};
use crate::error::CrateResult;

/// Where the Serato library lives.
#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Serato's data folder, usually `~/Music/_Serato_`.
    pub serato_dir:    PathBuf,
    /// Folder holding the `.crate` files.
    pub subcrates_dir: PathBuf,
}

impl LibraryConfig {
    pub fn new<P: Into<PathBuf>>(serato_dir: P) -> Self {
        let serato_dir = serato_dir.into();
        let subcrates_dir = serato_dir.join("SubCrates");
        Self { serato_dir, subcrates_dir }
    }

    /// Config for a bare crate folder; its parent is taken as the Serato
    /// folder, or the folder itself when it has no parent.
    pub fn from_subcrates_dir<P: Into<PathBuf>>(subcrates_dir: P) -> Self {
        let subcrates_dir = subcrates_dir.into();
        let serato_dir = subcrates_dir
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| subcrates_dir.clone(), Path::to_path_buf);
        Self { serato_dir, subcrates_dir }
    }

    /// `~/Music/_Serato_`, or `None` when the home directory is unknown.
    pub fn default_for_user() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(home.join("Music").join("_Serato_")))
    }

    /// Use `dir` for crate files instead of `<serato_dir>/SubCrates`.
    pub fn with_subcrates_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.subcrates_dir = dir.into();
        self
    }

    pub fn crate_named(&self, name: &str) -> Crate {
        Crate::new(name, &self.subcrates_dir)
    }

    pub fn list_crates(&self) -> CrateResult<Vec<Crate>> {
        list_crates(&self.subcrates_dir)
    }
}

/// Every `.crate` file directly inside `dir`, sorted by name, unloaded.
pub fn list_crates(dir: &Path) -> CrateResult<Vec<Crate>> {
    let mut crates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let is_crate = path.extension().map_or(false, |e| e == CRATE_EXTENSION);
        if is_crate && entry.file_type()?.is_file() {
            crates.push(Crate::open(path));
        }
    }
    crates.sort_by(|a, b| a.name().cmp(b.name()));
    debug!(dir = %dir.display(), count = crates.len(), "listed crates");
    Ok(crates)
}

/// Load every crate's track list. Stops at the first failure.
#[cfg(not(feature = "parallel"))]
pub fn load_all(crates: &mut [Crate]) -> CrateResult<()> {
    for c in crates.iter_mut() {
        c.song_paths()?;
    }
    Ok(())
}

/// Load every crate's track list across the rayon pool.
#[cfg(feature = "parallel")]
pub fn load_all(crates: &mut [Crate]) -> CrateResult<()> {
    use rayon::prelude::*;
    crates.par_iter_mut().try_for_each(|c| c.song_paths().map(|_| ()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcrates_live_under_serato_dir() {
        let cfg = LibraryConfig::new("/Users/dj/Music/_Serato_");
        assert_eq!(cfg.subcrates_dir, Path::new("/Users/dj/Music/_Serato_/SubCrates"));
        let cfg = cfg.with_subcrates_dir("/tmp/crates");
        assert_eq!(cfg.crate_named("a").path(), Path::new("/tmp/crates/a.crate"));
    }

    #[test]
    fn bare_crate_folder_keeps_its_parent_as_serato_dir() {
        let cfg = LibraryConfig::from_subcrates_dir("/Users/dj/Music/_Serato_/SubCrates");
        assert_eq!(cfg.serato_dir, Path::new("/Users/dj/Music/_Serato_"));
        assert_eq!(cfg.subcrates_dir, Path::new("/Users/dj/Music/_Serato_/SubCrates"));
        assert_eq!(LibraryConfig::from_subcrates_dir("crates").serato_dir, Path::new("crates"));
    }
}
