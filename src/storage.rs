use std::ffi::{OsStr, OsString};
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::domain::{Journal, JournalHeader};

const NOTES_MARKER: &str = "\n=== NOTES ===\n";

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    TomlEncode(toml::ser::Error),
    JsonEncode(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "io error: {err}"),
            StorageError::TomlEncode(err) => write!(f, "failed to encode TOML header: {err}"),
            StorageError::JsonEncode(err) => write!(f, "failed to encode JSONL note: {err}"),
        }
    }
}

impl std::error::Error for StorageError {}

/// Loads the journal at `path`. A missing file is a fresh journal. Corrupt
/// data is treated as absence: an unparseable header yields a fresh journal,
/// an unparseable note line is skipped.
pub fn load_journal(path: &Path) -> Result<Journal, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Journal::new()),
        Err(err) => return Err(StorageError::Io(err)),
    };

    if raw.trim().is_empty() {
        return Ok(Journal::new());
    }

    let (header_blob, notes_blob) = if let Some((header, notes)) = raw.split_once(NOTES_MARKER) {
        (header, notes)
    } else {
        (raw.as_str(), "")
    };

    let header: JournalHeader = match toml::from_str(header_blob) {
        Ok(header) => header,
        Err(_) => return Ok(Journal::new()),
    };

    let mut notes = Vec::new();
    for line in notes_blob.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Ok(record) = serde_json::from_str(line) {
            notes.push(record);
        }
    }

    Ok(Journal { header, notes })
}

/// Saves via a scratch sibling and a rename, so an interrupted write leaves
/// the previous journal intact.
pub fn save_journal(path: &Path, journal: &Journal) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }
    }

    let mut blob = toml::to_string_pretty(&journal.header).map_err(StorageError::TomlEncode)?;
    blob.push_str(NOTES_MARKER);
    for record in &journal.notes {
        blob.push_str(&serde_json::to_string(record).map_err(StorageError::JsonEncode)?);
        blob.push('\n');
    }

    let scratch = scratch_path(path);
    fs::write(&scratch, blob).map_err(StorageError::Io)?;
    fs::rename(&scratch, path).map_err(StorageError::Io)
}

fn scratch_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from("journal"));
    name.push(".partial");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::fs;
    use std::path::PathBuf;

    use crate::domain::Journal;

    use super::{load_journal, save_journal};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("test date should be valid")
    }

    #[test]
    fn round_trips_toml_and_jsonl() {
        let mut journal = Journal::new();
        journal.set_start(Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap());
        journal.add_note(date(2024, 1, 2), "rough morning");
        journal.add_note(date(2024, 1, 2), "better by evening");
        journal.add_note(date(2024, 1, 5), "rough morning");

        let path = temp_file("clearday_storage_roundtrip.journal");
        save_journal(&path, &journal).expect("save should succeed");
        let loaded = load_journal(&path).expect("load should succeed");

        assert_eq!(loaded.start_instant(), journal.start_instant());
        assert_eq!(
            loaded.notes_for(date(2024, 1, 2)),
            vec!["rough morning", "better by evening"]
        );
        assert_eq!(loaded.notes.len(), 3);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_loads_as_fresh_journal() {
        let path = temp_file("clearday_storage_missing.journal");
        let _ = fs::remove_file(&path);
        let loaded = load_journal(&path).expect("load should succeed");
        assert!(loaded.start_instant().is_none());
        assert!(loaded.notes.is_empty());
    }

    #[test]
    fn corrupt_header_loads_as_fresh_journal() {
        let path = temp_file("clearday_storage_corrupt_header.journal");
        fs::write(&path, "this is not toml at all {{{").expect("write should succeed");
        let loaded = load_journal(&path).expect("load should not fail");
        assert!(loaded.start_instant().is_none());
        assert!(loaded.notes.is_empty());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_note_lines_are_skipped() {
        let mut journal = Journal::new();
        journal.add_note(date(2024, 1, 2), "kept");
        let path = temp_file("clearday_storage_corrupt_line.journal");
        save_journal(&path, &journal).expect("save should succeed");

        let mut raw = fs::read_to_string(&path).expect("read should succeed");
        raw.push_str("{not json\n");
        raw.push_str("{\"day\":\"2024-01-03\",\"text\":\"also kept\"}\n");
        fs::write(&path, raw).expect("write should succeed");

        let loaded = load_journal(&path).expect("load should not fail");
        assert_eq!(loaded.notes_for(date(2024, 1, 2)), vec!["kept"]);
        assert_eq!(loaded.notes_for(date(2024, 1, 3)), vec!["also kept"]);
        assert_eq!(loaded.notes.len(), 2);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn save_replaces_the_file_without_leaving_scratch() {
        let mut journal = Journal::new();
        journal.add_note(date(2024, 1, 2), "one");
        let path = temp_file("clearday_storage_atomic.journal");
        save_journal(&path, &journal).expect("first save should succeed");
        journal.add_note(date(2024, 1, 2), "two");
        save_journal(&path, &journal).expect("second save should succeed");

        let loaded = load_journal(&path).expect("load should succeed");
        assert_eq!(loaded.notes_for(date(2024, 1, 2)), vec!["one", "two"]);
        assert!(!super::scratch_path(&path).exists());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_file_loads_as_fresh_journal() {
        let path = temp_file("clearday_storage_empty.journal");
        fs::write(&path, "").expect("write should succeed");
        let loaded = load_journal(&path).expect("load should succeed");
        assert!(loaded.notes.is_empty());
        let _ = fs::remove_file(path);
    }

    fn temp_file(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("{}_{}", name, std::process::id()));
        path
    }
}
