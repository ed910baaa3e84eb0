use std::collections::HashSet;

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_SECOND: i64 = 1_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalHeader {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub start_instant: Option<DateTime<Utc>>,
}

impl JournalHeader {
    pub fn new() -> Self {
        Self {
            schema_version: 1,
            created_at: Utc::now(),
            start_instant: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteRecord {
    pub day: NaiveDate,
    pub text: String,
}

/// The persisted aggregate: sobriety start instant plus the day-keyed notes,
/// in insertion order.
#[derive(Debug, Clone)]
pub struct Journal {
    pub header: JournalHeader,
    pub notes: Vec<NoteRecord>,
}

impl Journal {
    pub fn new() -> Self {
        Self {
            header: JournalHeader::new(),
            notes: Vec::new(),
        }
    }

    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.header.start_instant
    }

    /// Local calendar day of the start instant, for calendar markers.
    pub fn start_day(&self) -> Option<NaiveDate> {
        self.header.start_instant.map(local_day)
    }

    pub fn set_start(&mut self, instant: DateTime<Utc>) {
        self.header.start_instant = Some(instant);
    }

    pub fn elapsed_since_start(&self, now: DateTime<Utc>) -> Option<ElapsedBreakdown> {
        self.header
            .start_instant
            .map(|start| ElapsedBreakdown::from_duration(now - start))
    }

    /// Appends a note to the given day. Whitespace-only input is dropped and
    /// `false` is returned; the store is unchanged.
    pub fn add_note(&mut self, day: NaiveDate, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.notes.push(NoteRecord {
            day,
            text: text.to_string(),
        });
        true
    }

    /// Notes for a day, oldest first. Returns an owned copy so callers cannot
    /// alias internal storage.
    pub fn notes_for(&self, day: NaiveDate) -> Vec<String> {
        self.notes
            .iter()
            .filter(|record| record.day == day)
            .map(|record| record.text.clone())
            .collect()
    }

    pub fn days_with_notes(&self) -> HashSet<NaiveDate> {
        self.notes.iter().map(|record| record.day).collect()
    }
}

/// Elapsed time since the start instant, decomposed for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedBreakdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl ElapsedBreakdown {
    pub fn from_duration(duration: Duration) -> Self {
        let ms = duration.num_milliseconds().max(0);
        Self {
            days: ms / MS_PER_DAY,
            hours: ms % MS_PER_DAY / MS_PER_HOUR,
            minutes: ms % MS_PER_HOUR / MS_PER_MINUTE,
            seconds: ms % MS_PER_MINUTE / MS_PER_SECOND,
        }
    }
}

/// A pausable stopwatch anchored to wall clock. While running, elapsed time is
/// re-derived from `now - anchor` on every read, so a delayed or throttled
/// refresh tick cannot lose time. Never persisted.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    running: bool,
    accumulated_seconds: i64,
    anchor: Option<DateTime<Utc>>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            running: false,
            accumulated_seconds: 0,
            anchor: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// No-op if already running. The anchor is backdated by the accumulated
    /// seconds so resuming continues where pause left off.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.running {
            return;
        }

        self.anchor = Some(now - Duration::seconds(self.accumulated_seconds));
        self.running = true;
    }

    /// No-op if already paused.
    pub fn pause(&mut self, now: DateTime<Utc>) {
        if !self.running {
            return;
        }

        self.accumulated_seconds = self.elapsed_seconds(now);
        self.running = false;
        self.anchor = None;
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.accumulated_seconds = 0;
        self.anchor = None;
    }

    /// Side-effect free; callable at any polling frequency.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        match self.anchor {
            Some(anchor) if self.running => (now - anchor).num_seconds().max(0),
            _ => self.accumulated_seconds,
        }
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Canonical `YYYY-MM-DD` key for one local calendar day.
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

pub fn local_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

pub fn local_day_key(instant: DateTime<Utc>) -> String {
    day_key(local_day(instant))
}

/// Hours field is always shown, every field zero-padded to width 2.
pub fn format_seconds(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

pub fn format_breakdown(breakdown: &ElapsedBreakdown) -> String {
    let unit = if breakdown.days == 1 { "day" } else { "days" };
    format!(
        "{} {unit}, {:02}:{:02}:{:02}",
        breakdown.days, breakdown.hours, breakdown.minutes, breakdown.seconds
    )
}

/// User-entered start instant: empty means `now`, otherwise RFC3339 or a
/// plain date meaning local midnight of that day.
pub fn parse_start_input(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(now);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(input) {
        return Ok(timestamp.with_timezone(&Utc));
    }

    match NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        Ok(day) => Ok(local_midnight_utc(day)),
        Err(_) => Err(format!(
            "invalid start '{input}', expected YYYY-MM-DD or RFC3339"
        )),
    }
}

fn local_naive_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(local_datetime) => Some(local_datetime.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, second) => Some(first.min(second).with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Local midnight of `day` as UTC, sliding forward past DST gaps.
pub fn local_midnight_utc(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_hms_opt(0, 0, 0).expect("midnight must be valid");
    if let Some(timestamp) = local_naive_to_utc(midnight) {
        return timestamp;
    }

    let mut cursor = midnight + Duration::minutes(1);
    for _ in 0..120 {
        if let Some(timestamp) = local_naive_to_utc(cursor) {
            return timestamp;
        }
        cursor += Duration::minutes(1);
    }

    panic!("local day boundary does not exist");
}
