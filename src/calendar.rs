use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};

/// The month currently displayed, independent of the selected day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        Self { year, month }
    }

    pub fn from_date(day: NaiveDate) -> Self {
        Self {
            year: day.year(),
            month: day.month(),
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("first of month must be valid")
    }

    /// A date in this month keeping `day` where possible, clamped to the
    /// month's length (jumping from Jan 31 lands on Feb 29/28).
    pub fn clamp_day(&self, day: u32) -> NaiveDate {
        let day = day.min(days_in_month(self.year, self.month)).max(1);
        NaiveDate::from_ymd_opt(self.year, self.month, day).expect("clamped day must be valid")
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.first_day().format("%B"), self.year)
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).expect("next year date should be valid")
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).expect("next month date should be valid")
    };
    (first_of_next - Duration::days(1)).day()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub day: u32,
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_note: bool,
    pub is_anchor_day: bool,
}

/// One month laid out for a Monday-first week: `leading_blanks` empty slots,
/// then one cell per day.
#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub cursor: MonthCursor,
    pub leading_blanks: usize,
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn build(
        cursor: MonthCursor,
        today: NaiveDate,
        selected: NaiveDate,
        note_days: &HashSet<NaiveDate>,
        anchor_day: Option<NaiveDate>,
    ) -> Self {
        let first_day = cursor.first_day();
        // Monday lands on slot 0, Sunday on slot 6.
        let leading_blanks = first_day.weekday().number_from_monday() as usize - 1;

        let cells = (1..=days_in_month(cursor.year, cursor.month))
            .map(|day| {
                let date = NaiveDate::from_ymd_opt(cursor.year, cursor.month, day)
                    .expect("calendar day must be valid");
                DayCell {
                    day,
                    date,
                    is_today: date == today,
                    is_selected: date == selected,
                    has_note: note_days.contains(&date),
                    is_anchor_day: anchor_day == Some(date),
                }
            })
            .collect();

        Self {
            cursor,
            leading_blanks,
            cells,
        }
    }

    /// Occupied slots: leading blanks plus one per day of the month.
    pub fn slot_count(&self) -> usize {
        self.leading_blanks + self.cells.len()
    }

    /// Cells padded with `None` slots into Monday-first weeks of seven.
    pub fn weeks(&self) -> Vec<Vec<Option<DayCell>>> {
        let mut slots: Vec<Option<DayCell>> = Vec::with_capacity(self.slot_count() + 6);
        slots.resize(self.leading_blanks, None);
        slots.extend(self.cells.iter().copied().map(Some));
        while slots.len() % 7 != 0 {
            slots.push(None);
        }
        slots.chunks(7).map(|week| week.to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;

    use super::{days_in_month, MonthCursor, MonthGrid};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("test date should be valid")
    }

    #[test]
    fn month_navigation_is_cyclic() {
        for month in 1..=12 {
            let cursor = MonthCursor::new(2024, month);
            assert_eq!(cursor.next().prev(), cursor);
            assert_eq!(cursor.prev().next(), cursor);
        }
    }

    #[test]
    fn month_navigation_rolls_over_year_boundaries() {
        let december = MonthCursor::new(2024, 12);
        assert_eq!(december.next(), MonthCursor::new(2025, 1));
        assert_eq!(MonthCursor::new(2025, 1).prev(), december);

        let january = MonthCursor::new(2024, 1);
        assert_eq!(january.prev(), MonthCursor::new(2023, 12));
    }

    #[test]
    fn days_in_month_matches_known_values() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
    }

    #[test]
    fn clamp_day_shortens_into_february() {
        let february = MonthCursor::new(2023, 2);
        assert_eq!(february.clamp_day(31), date(2023, 2, 28));
        assert_eq!(february.clamp_day(10), date(2023, 2, 10));
    }

    #[test]
    fn grid_slot_count_is_blanks_plus_days() {
        let empty = HashSet::new();
        // January 2024 starts on a Monday.
        let january = MonthGrid::build(
            MonthCursor::new(2024, 1),
            date(2024, 1, 1),
            date(2024, 1, 1),
            &empty,
            None,
        );
        assert_eq!(january.leading_blanks, 0);
        assert_eq!(january.slot_count(), 31);

        // September 2024 starts on a Sunday.
        let september = MonthGrid::build(
            MonthCursor::new(2024, 9),
            date(2024, 9, 1),
            date(2024, 9, 1),
            &empty,
            None,
        );
        assert_eq!(september.leading_blanks, 6);
        assert_eq!(september.slot_count(), 36);
    }

    #[test]
    fn grid_cells_carry_overlay_flags() {
        let mut note_days = HashSet::new();
        note_days.insert(date(2024, 2, 14));

        let grid = MonthGrid::build(
            MonthCursor::new(2024, 2),
            date(2024, 2, 10),
            date(2024, 2, 14),
            &note_days,
            Some(date(2024, 2, 1)),
        );
        assert_eq!(grid.cells.len(), 29);

        let cell = |day: u32| grid.cells[(day - 1) as usize];
        assert!(cell(10).is_today);
        assert!(!cell(10).is_selected);
        assert!(cell(14).is_selected);
        assert!(cell(14).has_note);
        assert!(cell(1).is_anchor_day);
        assert!(!cell(2).is_anchor_day);
    }

    #[test]
    fn weeks_pad_to_full_rows() {
        let empty = HashSet::new();
        let grid = MonthGrid::build(
            MonthCursor::new(2024, 9),
            date(2024, 9, 1),
            date(2024, 9, 1),
            &empty,
            None,
        );
        let weeks = grid.weeks();
        assert!(weeks.iter().all(|week| week.len() == 7));
        assert_eq!(weeks[0][6].map(|cell| cell.day), Some(1));
        let total: usize = weeks.iter().flatten().filter(|slot| slot.is_some()).count();
        assert_eq!(total, 30);
    }
}
