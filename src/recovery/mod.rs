//! Tag-pattern recovery for crates whose chunk lengths cannot be trusted.

pub mod scanner;

pub use scanner::{scan, scan_file, scan_paths, tag_offsets, RecoveryQuality, ScanReport, ScannedPath};
