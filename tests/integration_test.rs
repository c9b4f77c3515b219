use seratocrate::chunk::{decode_length, HEADER_LEN};
use seratocrate::library::{list_crates, load_all};
use seratocrate::{decode, encode, Crate, CrateError, LibraryConfig, HEADER};
use std::fs;
use tempfile::{tempdir, NamedTempFile};

#[test]
fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let tracks = ["/Users/dj/Music/track1.mp3", "/Users/dj/Music/track2.flac"];

    {
        let mut c = Crate::new("Warmup", dir.path());
        for t in &tracks {
            c.add_song(t).unwrap();
        }
        c.save().unwrap();
    }

    {
        let mut c = Crate::new("Warmup", dir.path());
        assert!(!c.is_loaded());
        assert_eq!(c.song_paths().unwrap(), tracks.map(String::from));
    }
}

#[test]
fn test_file_bytes_are_written_verbatim() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut c = Crate::open(temp_file.path());
    c.add_song("/music/song.mp3").unwrap();
    c.save().unwrap();

    let raw = fs::read(temp_file.path()).unwrap();
    assert_eq!(&raw[..HEADER.len()], &HEADER[..]);
    let track = &raw[HEADER.len()..];
    assert_eq!(&track[0..4], b"otrk");
    assert_eq!(decode_length(&track[4..8]).unwrap(), 36);
    assert_eq!(&track[8..12], b"ptrk");
    assert_eq!(decode_length(&track[12..16]).unwrap(), 28);
    assert_eq!(track.len(), 2 * HEADER_LEN + 28);
}

#[test]
fn test_add_then_remove() {
    let dir = tempdir().unwrap();
    let mut c = Crate::new("Set", dir.path());
    c.add_song("/a.mp3").unwrap();
    c.add_song("/b.mp3").unwrap();
    c.add_song("/a.mp3").unwrap();
    c.save().unwrap();

    let mut c = Crate::new("Set", dir.path());
    assert!(c.remove_song("/a.mp3").unwrap());
    assert!(!c.remove_song("/missing.mp3").unwrap());
    c.save().unwrap();

    let raw = fs::read(dir.path().join("Set.crate")).unwrap();
    assert_eq!(decode(&raw).unwrap(), vec!["/b.mp3"]);
}

#[test]
fn test_emptied_crate_is_header_only() {
    let dir = tempdir().unwrap();
    let mut c = Crate::new("Gone", dir.path());
    c.add_song("/only.mp3").unwrap();
    c.save().unwrap();

    let mut c = Crate::new("Gone", dir.path());
    c.remove_song("/only.mp3").unwrap();
    c.save().unwrap();
    assert_eq!(fs::read(c.path()).unwrap(), HEADER.to_vec());
}

#[test]
fn test_list_crates_filters_and_sorts() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("b.crate"), encode(&["/x.mp3"]).unwrap()).unwrap();
    fs::write(dir.path().join("a.crate"), encode(&["/y.mp3", "/z.mp3"]).unwrap()).unwrap();
    fs::write(dir.path().join("notes.txt"), b"not a crate").unwrap();
    fs::create_dir(dir.path().join("sub.crate")).unwrap();

    let mut crates = list_crates(dir.path()).unwrap();
    let names: Vec<&str> = crates.iter().map(|c| c.name()).collect();
    assert_eq!(names, ["a", "b"]);

    load_all(&mut crates).unwrap();
    assert!(crates.iter().all(Crate::is_loaded));
    assert_eq!(crates[0].song_paths().unwrap().len(), 2);
}

#[test]
fn test_library_config_points_at_subcrates() {
    let dir = tempdir().unwrap();
    let cfg = LibraryConfig::new(dir.path());
    fs::create_dir(&cfg.subcrates_dir).unwrap();
    let mut c = cfg.crate_named("Peak");
    c.add_song("/p.mp3").unwrap();
    c.save().unwrap();
    assert_eq!(cfg.list_crates().unwrap().len(), 1);
}

#[test]
fn test_corrupt_file_reports_malformed() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut raw = encode(&["/a/b.mp3"]).unwrap();
    raw.truncate(raw.len() - 1);
    fs::write(temp_file.path(), &raw).unwrap();

    let mut c = Crate::open(temp_file.path());
    assert!(matches!(c.song_paths(), Err(CrateError::Malformed { .. })));

    let report = seratocrate::recovery::scan_file(temp_file.path()).unwrap();
    assert_eq!(report.paths(), vec!["/a/b.mp"]);
}

#[test]
fn test_end_to_end_scenario() {
    let raw = encode(&["/Users/dj/Music/track1.mp3"]).unwrap();
    assert_eq!(decode(&raw).unwrap(), vec!["/Users/dj/Music/track1.mp3"]);
}

#[test]
fn test_track_length_disagreeing_with_its_path_chunk() {
    let temp_file = NamedTempFile::new().unwrap();
    let mut raw = encode(&["/a/b.mp3"]).unwrap();
    raw[HEADER.len() + 7] += 4;
    raw.extend_from_slice(b"junk");
    fs::write(temp_file.path(), &raw).unwrap();

    let mut c = Crate::open(temp_file.path());
    match c.song_paths() {
        Err(CrateError::Malformed { offset, .. }) => assert_eq!(offset, HEADER.len() + 2 * HEADER_LEN + 14),
        other => panic!("expected malformed, got {other:?}"),
    }
    assert!(!c.is_loaded());
}

#[test]
fn test_latin1_crate_survives_edit_and_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Accents.crate");
    fs::write(&path, encode(&["/Music/caf\u{e9}.mp3"]).unwrap()).unwrap();

    let mut c = Crate::open(&path);
    c.song_paths().unwrap();
    c.add_song("/Music/ok.mp3").unwrap();
    c.save().unwrap();

    let raw = fs::read(&path).unwrap();
    assert_eq!(decode(&raw).unwrap(), vec!["/Music/caf\u{e9}.mp3", "/Music/ok.mp3"]);
}
