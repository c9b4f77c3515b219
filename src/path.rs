//! Conversion between the absolute paths callers work with and the
//! root-relative text stored in `ptrk` chunks.
//!
//! Paths are handled lexically with `/` separators; nothing here touches
//! the filesystem.

use crate::chunk::is_storable_char;
use crate::error::{CrateError, CrateResult};

/// Resolve `path` against the filesystem root.
///
/// The result always starts with `/`, has no empty or `.` components, and
/// applies `..` lexically (never climbing above the root). A trailing
/// separator is dropped.
pub fn resolve_from_root(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for comp in path.split('/') {
        match comp {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            c => parts.push(c),
        }
    }

    let mut out = String::with_capacity(path.len() + 1);
    for c in parts {
        out.push('/');
        out.push_str(c);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn absolutize(path: &str, base: &str) -> String {
    if path.starts_with('/') {
        resolve_from_root(path)
    } else {
        resolve_from_root(&format!("{base}/{path}"))
    }
}

/// Normalize an absolute path and strip the leading root separator.
pub fn relative_to_root(path: &str) -> CrateResult<String> {
    if !path.starts_with('/') {
        return Err(CrateError::InvalidPath(format!("{path:?} is not absolute")));
    }
    let resolved = resolve_from_root(path);
    Ok(resolved[1..].to_owned())
}

/// Root-relative text for `path` as it is stored in a `ptrk` chunk.
///
/// Fails with `InvalidPath` when `path` is not absolute or holds a
/// character the one-byte text form cannot carry back unchanged.
pub fn stored_text(path: &str) -> CrateResult<String> {
    let rel = relative_to_root(path)?;
    if let Some(bad) = rel.chars().find(|c| !is_storable_char(*c)) {
        return Err(CrateError::InvalidPath(format!("{path:?} contains {bad:?}")));
    }
    Ok(rel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_the_root_separator() {
        assert_eq!(resolve_from_root("Users/dj/Music/track1.mp3"), "/Users/dj/Music/track1.mp3");
        assert_eq!(resolve_from_root(""), "/");
    }

    #[test]
    fn normalizes_lexically() {
        assert_eq!(resolve_from_root("a//b/./c/"), "/a/b/c");
        assert_eq!(resolve_from_root("a/../../b"), "/b");
    }

    #[test]
    fn relative_form_drops_the_root() {
        assert_eq!(relative_to_root("/music/song.mp3").unwrap(), "music/song.mp3");
        assert_eq!(relative_to_root("/").unwrap(), "");
        assert!(matches!(relative_to_root("music/song.mp3"), Err(CrateError::InvalidPath(_))));
    }

    #[test]
    fn stored_text_accepts_latin1_only() {
        assert_eq!(stored_text("/caf\u{e9}.mp3").unwrap(), "caf\u{e9}.mp3");
        assert!(matches!(stored_text("/\u{65e5}\u{672c}.mp3"), Err(CrateError::InvalidPath(_))));
        assert!(matches!(stored_text("/bad\0name"), Err(CrateError::InvalidPath(_))));
        assert!(matches!(stored_text("rel.mp3"), Err(CrateError::InvalidPath(_))));
    }

    #[test]
    fn absolutize_joins_relative_input() {
        assert_eq!(absolutize("b.mp3", "/home/dj"), "/home/dj/b.mp3");
        assert_eq!(absolutize("../x.mp3", "/home/dj"), "/home/x.mp3");
        assert_eq!(absolutize("/abs.mp3", "/home/dj"), "/abs.mp3");
    }
}
