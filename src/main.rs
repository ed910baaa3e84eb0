mod calendar;
mod domain;
mod journals;
mod storage;
mod ui;

use std::error::Error;
use std::path::PathBuf;

use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::calendar::{MonthCursor, MonthGrid};
use crate::domain::{day_key, format_breakdown, local_day_key, parse_start_input, Journal};
use crate::journals::{load_history, record_open, resolve_journal_path};
use crate::storage::{load_journal, save_journal};
use crate::ui::run_dashboard;

#[derive(Debug, Parser)]
#[command(name = "clearday", about = "Terminal sobriety tracker and stopwatch")]
struct Cli {
	#[arg(long)]
	journal: Option<PathBuf>,
	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
	Init,
	Dashboard,
	SetStart {
		#[arg(long)]
		at: Option<String>,
	},
	Status,
	AddNote {
		#[arg(long)]
		text: String,
		#[arg(long)]
		day: Option<String>,
	},
	Notes {
		#[arg(long)]
		day: Option<String>,
	},
	Month {
		#[arg(long)]
		month: Option<String>,
	},
	Journals {
		#[arg(long, default_value_t = 20)]
		limit: usize,
	},
}

fn main() {
	if let Err(err) = run() {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run() -> Result<(), Box<dyn Error>> {
	let cli = Cli::parse();

	if let Some(Command::Journals { limit }) = &cli.command {
		print_journal_history(*limit);
		return Ok(());
	}

	let mut journal_path = resolve_journal_path(cli.journal)?;
	let mut journal = load_journal(&journal_path)?;
	if let Err(err) = record_open(&journal_path, Utc::now()) {
		eprintln!("warning: failed to update journal history: {err}");
	}

	match cli.command.unwrap_or(Command::Dashboard) {
		Command::Init => {
			save_journal(&journal_path, &journal)?;
			println!("initialized journal at {}", journal_path.display());
		}
		Command::Dashboard => {
			run_dashboard(&mut journal, &mut journal_path)?;
		}
		Command::SetStart { at } => {
			let instant = parse_start_input(at.as_deref().unwrap_or(""), Utc::now())?;
			journal.set_start(instant);
			save_journal(&journal_path, &journal)?;
			println!(
				"start date set to {}",
				journal.start_instant().map(local_day_key).unwrap_or_default()
			);
		}
		Command::Status => {
			print_status(&journal);
		}
		Command::AddNote { text, day } => {
			let day = parse_day(day.as_deref())?;
			if journal.add_note(day, &text) {
				save_journal(&journal_path, &journal)?;
				println!("added note for {}", day_key(day));
			} else {
				println!("nothing to add");
			}
		}
		Command::Notes { day } => {
			let day = parse_day(day.as_deref())?;
			print_notes(&journal, day);
		}
		Command::Month { month } => {
			let cursor = parse_month(month.as_deref())?;
			print_month(&journal, cursor);
		}
		Command::Journals { .. } => {}
	}

	Ok(())
}

fn print_journal_history(limit: usize) {
	let history = load_history();
	if history.entries.is_empty() {
		println!("no journals opened yet");
		return;
	}

	for (index, entry) in history.entries.iter().take(limit).enumerate() {
		println!(
			"{:>2}. {}  opened {}",
			index + 1,
			entry.path.display(),
			local_day_key(entry.last_opened)
		);
	}
}

fn parse_day(input: Option<&str>) -> Result<NaiveDate, Box<dyn Error>> {
	if let Some(raw) = input {
		Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")?)
	} else {
		Ok(Local::now().date_naive())
	}
}

fn parse_month(input: Option<&str>) -> Result<MonthCursor, Box<dyn Error>> {
	let Some(raw) = input else {
		return Ok(MonthCursor::from_date(Local::now().date_naive()));
	};

	let (year, month) = raw
		.split_once('-')
		.ok_or("invalid month, expected YYYY-MM")?;
	let year: i32 = year.parse()?;
	let month: u32 = month.parse()?;
	if !(1..=12).contains(&month) {
		return Err(format!("invalid month: {raw}").into());
	}

	Ok(MonthCursor::new(year, month))
}

fn print_status(journal: &Journal) {
	match journal.elapsed_since_start(Utc::now()) {
		Some(breakdown) => {
			println!(
				"sober for {} (since {})",
				format_breakdown(&breakdown),
				journal.start_instant().map(local_day_key).unwrap_or_default()
			);
		}
		None => {
			println!("no start date set; run `clearday set-start`");
		}
	}
}

fn print_notes(journal: &Journal, day: NaiveDate) {
	let notes = journal.notes_for(day);
	println!("notes for {}", day_key(day));
	if notes.is_empty() {
		println!("(none)");
		return;
	}

	for note in notes {
		println!("- {note}");
	}
}

fn print_month(journal: &Journal, cursor: MonthCursor) {
	let today = Local::now().date_naive();
	let grid = MonthGrid::build(
		cursor,
		today,
		today,
		&journal.days_with_notes(),
		journal.start_day(),
	);

	println!("{}", cursor.label());
	println!(" Mo  Tu  We  Th  Fr  Sa  Su");
	for week in grid.weeks() {
		let mut row = String::new();
		for slot in week {
			match slot {
				Some(cell) => {
					let marker = if cell.is_anchor_day {
						'@'
					} else if cell.has_note {
						'*'
					} else {
						' '
					};
					row.push_str(&format!("{:>3}{marker}", cell.day));
				}
				None => row.push_str("    "),
			}
		}
		println!("{}", row.trim_end());
	}

	println!("@ start date, * day with notes");
}
