use std::env;
use std::fs;
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::StorageError;

const HISTORY_FILE: &str = "history.toml";
const HISTORY_CAP: usize = 12;

/// Journals this machine has opened, newest first. Stored as TOML in the
/// state directory; a corrupt or missing file reads as an empty history, the
/// same rule the journal loader applies to its own file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
	#[serde(default)]
	pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
	pub path: PathBuf,
	pub last_opened: DateTime<Utc>,
}

impl History {
	/// Records an open of `path` at `now`. Entries are ordered by open
	/// timestamp and the oldest fall off past the cap.
	pub fn touch(&mut self, path: PathBuf, now: DateTime<Utc>) {
		match self.entries.iter_mut().find(|entry| entry.path == path) {
			Some(entry) => entry.last_opened = now,
			None => self.entries.push(HistoryEntry {
				path,
				last_opened: now,
			}),
		}

		self.entries.sort_by(|a, b| b.last_opened.cmp(&a.last_opened));
		self.entries.truncate(HISTORY_CAP);
	}

	pub fn most_recent(&self) -> Option<&HistoryEntry> {
		self.entries.iter().max_by_key(|entry| entry.last_opened)
	}
}

/// Explicit flag wins, then the environment, then whatever was opened last.
pub fn resolve_journal_path(cli_path: Option<PathBuf>) -> Result<PathBuf, IoError> {
	if let Some(path) = cli_path {
		return Ok(absolutize(&path));
	}

	if let Ok(value) = env::var("CLEARDAY_JOURNAL") {
		let value = value.trim();
		if !value.is_empty() {
			return Ok(absolutize(Path::new(value)));
		}
	}

	load_history()
		.most_recent()
		.map(|entry| entry.path.clone())
		.ok_or_else(|| {
			IoError::new(
				ErrorKind::NotFound,
				"no journal selected: pass --journal <path>, set CLEARDAY_JOURNAL, or open one once to seed the history",
			)
		})
}

pub fn record_open(path: &Path, now: DateTime<Utc>) -> Result<(), StorageError> {
	let mut history = load_history();
	history.touch(absolutize(path), now);
	write_history(&history_path(), &history)
}

pub fn load_history() -> History {
	read_history(&history_path())
}

fn read_history(path: &Path) -> History {
	match fs::read_to_string(path) {
		Ok(raw) => toml::from_str(&raw).unwrap_or_default(),
		Err(_) => History::default(),
	}
}

fn write_history(path: &Path, history: &History) -> Result<(), StorageError> {
	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent).map_err(StorageError::Io)?;
		}
	}

	let blob = toml::to_string_pretty(history).map_err(StorageError::TomlEncode)?;
	fs::write(path, blob).map_err(StorageError::Io)
}

fn history_path() -> PathBuf {
	state_dir().join(HISTORY_FILE)
}

fn state_dir() -> PathBuf {
	if let Some(path) = env::var_os("CLEARDAY_STATE_DIR") {
		return PathBuf::from(path);
	}

	let base = env::var_os("XDG_STATE_HOME").map(PathBuf::from).or_else(|| {
		env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
	});

	match base {
		Some(base) => base.join("clearday"),
		None => PathBuf::from(".clearday"),
	}
}

fn absolutize(path: &Path) -> PathBuf {
	let joined = if path.is_absolute() {
		path.to_path_buf()
	} else {
		env::current_dir()
			.map(|cwd| cwd.join(path))
			.unwrap_or_else(|_| path.to_path_buf())
	};

	fs::canonicalize(&joined).unwrap_or(joined)
}

#[cfg(test)]
mod tests {
	use chrono::{Duration, TimeZone, Utc};
	use std::fs;
	use std::path::PathBuf;

	use super::{read_history, write_history, History, HISTORY_CAP};

	fn temp_file(name: &str) -> PathBuf {
		let mut path = std::env::temp_dir();
		path.push(format!("{}_{}", name, std::process::id()));
		path
	}

	#[test]
	fn touch_orders_by_open_time_and_dedupes() {
		let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
		let mut history = History::default();
		history.touch(PathBuf::from("/tmp/a.journal"), t0);
		history.touch(PathBuf::from("/tmp/b.journal"), t0 + Duration::minutes(1));
		history.touch(PathBuf::from("/tmp/a.journal"), t0 + Duration::minutes(2));

		assert_eq!(history.entries.len(), 2);
		assert_eq!(
			history.most_recent().map(|entry| entry.path.clone()),
			Some(PathBuf::from("/tmp/a.journal"))
		);
		assert_eq!(history.entries[1].path, PathBuf::from("/tmp/b.journal"));
	}

	#[test]
	fn touch_drops_the_oldest_past_the_cap() {
		let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
		let mut history = History::default();
		for offset in 0..20i64 {
			history.touch(
				PathBuf::from(format!("/tmp/{offset}.journal")),
				t0 + Duration::minutes(offset),
			);
		}

		assert_eq!(history.entries.len(), HISTORY_CAP);
		assert!(history
			.entries
			.iter()
			.all(|entry| entry.path != PathBuf::from("/tmp/0.journal")));
		assert_eq!(history.entries[0].path, PathBuf::from("/tmp/19.journal"));
	}

	#[test]
	fn empty_history_has_no_most_recent() {
		assert!(History::default().most_recent().is_none());
	}

	#[test]
	fn history_round_trips_through_toml() {
		let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
		let mut history = History::default();
		history.touch(PathBuf::from("/tmp/a.journal"), t0);

		let path = temp_file("clearday_history_roundtrip.toml");
		write_history(&path, &history).expect("write should succeed");
		let loaded = read_history(&path);

		assert_eq!(loaded.entries.len(), 1);
		assert_eq!(loaded.entries[0].path, PathBuf::from("/tmp/a.journal"));
		assert_eq!(loaded.entries[0].last_opened, t0);
		let _ = fs::remove_file(path);
	}

	#[test]
	fn corrupt_history_reads_as_empty() {
		let path = temp_file("clearday_history_corrupt.toml");
		fs::write(&path, "entries = \"nope\"").expect("write should succeed");
		assert!(read_history(&path).entries.is_empty());
		let _ = fs::remove_file(path);
	}

	#[test]
	fn missing_history_reads_as_empty() {
		let path = temp_file("clearday_history_missing.toml");
		let _ = fs::remove_file(&path);
		assert!(read_history(&path).entries.is_empty());
	}
}
