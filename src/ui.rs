use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::{Datelike, Duration, Local, NaiveDate, Utc};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};

use crate::calendar::{MonthCursor, MonthGrid};
use crate::domain::{
	day_key, format_breakdown, format_seconds, local_day_key, parse_start_input, ElapsedBreakdown,
	Journal, Stopwatch,
};
use crate::journals::{load_history, record_open, History, HistoryEntry};
use crate::storage::{load_journal, save_journal};

// Refresh period of the dashboard; elapsed values re-derive from wall clock
// on every pass, so the exact period only affects display smoothness.
const TICK_RATE_MS: u64 = 250;
const FOCUSED_PANEL_BORDER_COLOR: Color = Color::Yellow;
const INACTIVE_PANEL_BORDER_COLOR: Color = Color::DarkGray;
const HIGHLIGHT_BACKGROUND_COLOR: Color = Color::Rgb(42, 45, 52);

pub fn run_dashboard(journal: &mut Journal, journal_path: &mut PathBuf) -> Result<(), Box<dyn Error>> {
	enable_raw_mode()?;
	let mut stdout = io::stdout();
	stdout.execute(EnterAlternateScreen)?;
	let backend = CrosstermBackend::new(stdout);
	let mut terminal = Terminal::new(backend)?;

	let result = run_event_loop(&mut terminal, journal, journal_path);

	disable_raw_mode()?;
	execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
	terminal.show_cursor()?;

	result
}

fn run_event_loop(
	terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
	journal: &mut Journal,
	journal_path: &mut PathBuf,
) -> Result<(), Box<dyn Error>> {
	let mut app = App::default();

	loop {
		let now = Utc::now();
		let view = build_view(&app, journal, now);
		app.clamp_selection(&view);
		terminal.draw(|frame| draw_dashboard(frame, &app, &view))?;

		// The poll timeout doubles as the refresh tick. Key handling runs to
		// completion before the next draw, so a pause or reset can never race
		// a stale tick, and breaking the loop tears the tick down with the
		// terminal.
		if event::poll(StdDuration::from_millis(TICK_RATE_MS))? {
			if let CEvent::Key(key) = event::read()? {
				if key.kind != KeyEventKind::Press {
					continue;
				}

				let should_quit = match &app.mode {
					InputMode::Prompt(_) => handle_prompt_key(&mut app, key.code, journal, journal_path),
					InputMode::Select(_) => handle_select_key(&mut app, key.code, journal, journal_path),
					InputMode::Normal => handle_normal_key(&mut app, key.code, journal_path),
				};

				if should_quit {
					break;
				}
			}
		}
	}

	Ok(())
}

fn build_view(app: &App, journal: &Journal, now: chrono::DateTime<Utc>) -> ViewModel {
	let today = Local::now().date_naive();
	let note_days = journal.days_with_notes();
	let grid = MonthGrid::build(app.cursor, today, app.selected_day, &note_days, journal.start_day());

	ViewModel {
		grid,
		day_notes: journal.notes_for(app.selected_day),
		tracker: journal.elapsed_since_start(now),
		start_day: journal.start_day(),
		stopwatch_seconds: app.stopwatch.elapsed_seconds(now),
		stopwatch_running: app.stopwatch.is_running(),
	}
}

fn draw_dashboard(frame: &mut Frame, app: &App, view: &ViewModel) {
	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Min(12), Constraint::Length(4)])
		.split(frame.area());

	let body = Layout::default()
		.direction(Direction::Horizontal)
		.constraints([
			Constraint::Percentage(32),
			Constraint::Percentage(40),
			Constraint::Percentage(28),
		])
		.split(layout[0]);

	let right = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Min(6), Constraint::Length(6)])
		.split(body[2]);

	render_calendar_panel(frame, body[0], app, view);
	render_notes_panel(frame, body[1], app, view);
	render_tracker_panel(frame, right[0], view);
	render_stopwatch_panel(frame, right[1], app, view);
	render_footer(frame, layout[1], app);

	if let InputMode::Select(select) = &app.mode {
		render_select_popup(frame, select);
	}
}

fn render_calendar_panel(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel) {
	let mut lines = Vec::new();
	lines.push(Line::from(view.grid.cursor.label()));
	lines.push(Line::from("Mo Tu We Th Fr Sa Su"));

	for week in view.grid.weeks() {
		let mut spans = Vec::new();
		for slot in week {
			let Some(cell) = slot else {
				spans.push(Span::raw("   "));
				continue;
			};

			let mut style = Style::default();
			if cell.has_note {
				style = style.fg(Color::LightYellow).add_modifier(Modifier::BOLD);
			}
			if cell.is_anchor_day {
				style = style.fg(Color::LightGreen).add_modifier(Modifier::BOLD);
			}
			if cell.is_today {
				style = style.add_modifier(Modifier::UNDERLINED);
			}
			if cell.is_selected {
				style = Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD);
			}

			spans.push(Span::styled(format!("{:>2} ", cell.day), style));
		}
		lines.push(Line::from(spans));
	}

	lines.push(Line::from(""));
	lines.push(Line::from(Span::styled(
		"note * yellow | start green | today underlined",
		Style::default().fg(Color::DarkGray),
	)));

	let block = Block::default()
		.borders(Borders::ALL)
		.title("Calendar")
		.border_style(border_style(app.focus == FocusPane::Calendar));
	let calendar = Paragraph::new(lines).block(block);
	frame.render_widget(calendar, area);
}

fn render_notes_panel(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel) {
	let items = if view.day_notes.is_empty() {
		vec![ListItem::new("(no notes for this day)")]
	} else {
		view.day_notes
			.iter()
			.map(|note| ListItem::new(note.clone()))
			.collect::<Vec<_>>()
	};

	let mut state = ListState::default();
	if !view.day_notes.is_empty() {
		state.select(Some(app.note_index.min(view.day_notes.len() - 1)));
	}

	let title = format!(
		"{} | {} notes",
		app.selected_day.format("%A, %d %B %Y"),
		view.day_notes.len()
	);
	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title(title)
				.border_style(border_style(app.focus == FocusPane::Notes)),
		)
		.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR).add_modifier(Modifier::BOLD));

	frame.render_stateful_widget(list, area, &mut state);
}

fn render_tracker_panel(frame: &mut Frame, area: Rect, view: &ViewModel) {
	let lines = match &view.tracker {
		Some(breakdown) => vec![
			Line::from("Sober for"),
			Line::from(Span::styled(
				format_breakdown(breakdown),
				Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
			)),
			Line::from(""),
			Line::from(format!(
				"since {}",
				view.start_day.map(day_key).unwrap_or_default()
			)),
		],
		None => vec![
			Line::from("No start date set"),
			Line::from(""),
			Line::from(Span::styled(
				"press 's' to set one",
				Style::default().fg(Color::DarkGray),
			)),
		],
	};

	let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Tracker"));
	frame.render_widget(panel, area);
}

fn render_stopwatch_panel(frame: &mut Frame, area: Rect, app: &App, view: &ViewModel) {
	let state_label = if view.stopwatch_running { "running" } else { "paused" };
	let value_style = if view.stopwatch_running {
		Style::default().fg(Color::LightYellow).add_modifier(Modifier::BOLD)
	} else {
		Style::default().add_modifier(Modifier::BOLD)
	};

	let lines = vec![
		Line::from(Span::styled(format_seconds(view.stopwatch_seconds), value_style)),
		Line::from(state_label),
		Line::from(Span::styled(
			"space start/pause | r reset",
			Style::default().fg(Color::DarkGray),
		)),
	];

	let block = Block::default()
		.borders(Borders::ALL)
		.title("Stopwatch")
		.border_style(border_style(app.focus == FocusPane::Stopwatch));
	frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
	let footer_lines = match &app.mode {
		InputMode::Normal => vec![
			Line::from("Tab pane | arrows/hjkl move day | n/N month | t today | q quit"),
			Line::from("a add note | s set start date | space start/pause | r reset | g switch journal"),
			Line::from(app.status.clone()),
		],
		InputMode::Prompt(prompt) => vec![
			Line::from(prompt.title.clone()),
			Line::from(format!("> {}", prompt.input)),
			Line::from("Enter submit | Esc cancel"),
		],
		InputMode::Select(select) => vec![
			Line::from(select.title.clone()),
			Line::from(format!(
				"Selected: {}",
				select
					.selected_option()
					.map(|option| option.label.as_str())
					.unwrap_or("(none)")
			)),
			Line::from("j/k or arrows move | Enter choose | Esc cancel"),
		],
	};

	let footer = Paragraph::new(footer_lines).block(Block::default().borders(Borders::ALL).title("Shortcuts"));
	frame.render_widget(footer, area);
}

fn render_select_popup(frame: &mut Frame, select: &SelectState) {
	let area = centered_rect(62, 55, frame.area());
	frame.render_widget(Clear, area);

	let items = if select.options.is_empty() {
		vec![ListItem::new("(no choices)")]
	} else {
		select
			.options
			.iter()
			.map(|option| ListItem::new(option.label.clone()).style(option.style))
			.collect::<Vec<_>>()
	};

	let current = if select.options.is_empty() {
		0
	} else {
		select.selected.saturating_add(1)
	};
	let total = select.options.len();
	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title(format!("{} ({current}/{total})", select.title)),
		)
		.highlight_symbol(">> ")
		.highlight_style(Style::default().bg(HIGHLIGHT_BACKGROUND_COLOR));

	let mut state = ListState::default();
	if !select.options.is_empty() {
		state.select(Some(select.selected.min(select.options.len().saturating_sub(1))));
	}
	frame.render_stateful_widget(list, area, &mut state);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
	let popup_layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Percentage((100 - percent_y) / 2),
			Constraint::Percentage(percent_y),
			Constraint::Percentage((100 - percent_y) / 2),
		])
		.split(area);
	Layout::default()
		.direction(Direction::Horizontal)
		.constraints([
			Constraint::Percentage((100 - percent_x) / 2),
			Constraint::Percentage(percent_x),
			Constraint::Percentage((100 - percent_x) / 2),
		])
		.split(popup_layout[1])[1]
}

fn handle_normal_key(app: &mut App, code: KeyCode, journal_path: &mut PathBuf) -> bool {
	match code {
		KeyCode::Char('q') | KeyCode::Esc => true,
		KeyCode::Tab => {
			app.focus = app.focus.next();
			false
		}
		KeyCode::BackTab => {
			app.focus = app.focus.prev();
			false
		}
		KeyCode::Up | KeyCode::Char('k') => {
			match app.focus {
				FocusPane::Calendar => app.shift_selected_day(-7),
				FocusPane::Notes => app.move_note_selection(-1),
				FocusPane::Stopwatch => {}
			}
			false
		}
		KeyCode::Down | KeyCode::Char('j') => {
			match app.focus {
				FocusPane::Calendar => app.shift_selected_day(7),
				FocusPane::Notes => app.move_note_selection(1),
				FocusPane::Stopwatch => {}
			}
			false
		}
		KeyCode::Left | KeyCode::Char('h') => {
			if app.focus == FocusPane::Calendar {
				app.shift_selected_day(-1);
			}
			false
		}
		KeyCode::Right | KeyCode::Char('l') => {
			if app.focus == FocusPane::Calendar {
				app.shift_selected_day(1);
			}
			false
		}
		KeyCode::Char('n') => {
			app.shift_month(1);
			false
		}
		KeyCode::Char('N') => {
			app.shift_month(-1);
			false
		}
		KeyCode::Char('t') => {
			app.jump_to_today();
			false
		}
		KeyCode::Char('a') => {
			app.mode = InputMode::Prompt(PromptState::new(
				format!("Note for {}", day_key(app.selected_day)),
				PromptKind::AddNote {
					day: app.selected_day,
				},
			));
			false
		}
		KeyCode::Char('s') => {
			app.mode = InputMode::Prompt(PromptState::new(
				"Start date (YYYY-MM-DD or RFC3339, empty = now)",
				PromptKind::SetStartDate,
			));
			false
		}
		KeyCode::Char('g') => {
			match build_journal_switch_select(journal_path.as_path(), &load_history()) {
				Ok(select) => app.mode = InputMode::Select(select),
				Err(err) => app.status = err,
			}
			false
		}
		KeyCode::Char(' ') => {
			// Applied before the next tick can observe the old state.
			let now = Utc::now();
			if app.stopwatch.is_running() {
				app.stopwatch.pause(now);
				app.status = format!("stopwatch paused at {}", format_seconds(app.stopwatch.elapsed_seconds(now)));
			} else {
				app.stopwatch.start(now);
				app.status = "stopwatch running".to_string();
			}
			false
		}
		KeyCode::Char('r') => {
			app.stopwatch.reset();
			app.status = "stopwatch reset".to_string();
			false
		}
		_ => false,
	}
}

fn handle_prompt_key(
	app: &mut App,
	code: KeyCode,
	journal: &mut Journal,
	journal_path: &mut PathBuf,
) -> bool {
	match code {
		KeyCode::Esc => {
			app.mode = InputMode::Normal;
			app.status = "Input cancelled".to_string();
		}
		KeyCode::Backspace => {
			if let InputMode::Prompt(prompt) = &mut app.mode {
				prompt.input.pop();
			}
		}
		KeyCode::Char(value) => {
			if let InputMode::Prompt(prompt) = &mut app.mode {
				prompt.input.push(value);
			}
		}
		KeyCode::Enter => {
			let prompt = match std::mem::replace(&mut app.mode, InputMode::Normal) {
				InputMode::Prompt(prompt) => prompt,
				InputMode::Normal | InputMode::Select(_) => return false,
			};

			match submit_prompt(&prompt, journal, journal_path.as_path()) {
				Ok(message) => {
					app.mode = InputMode::Normal;
					app.status = message;
				}
				Err(err) => {
					app.mode = InputMode::Prompt(prompt);
					app.status = format!("error: {err}");
				}
			}
		}
		_ => {}
	}

	false
}

fn handle_select_key(
	app: &mut App,
	code: KeyCode,
	journal: &mut Journal,
	journal_path: &mut PathBuf,
) -> bool {
	match code {
		KeyCode::Esc => {
			app.mode = InputMode::Normal;
			app.status = "Selection cancelled".to_string();
		}
		KeyCode::Up | KeyCode::Char('k') => {
			if let InputMode::Select(select) = &mut app.mode {
				select.move_selection(-1);
			}
		}
		KeyCode::Down | KeyCode::Char('j') => {
			if let InputMode::Select(select) = &mut app.mode {
				select.move_selection(1);
			}
		}
		KeyCode::Enter => {
			let select = match std::mem::replace(&mut app.mode, InputMode::Normal) {
				InputMode::Select(select) => select,
				_ => return false,
			};

			match submit_select(&select, journal, journal_path) {
				Ok(message) => {
					app.mode = InputMode::Normal;
					app.status = message;
				}
				Err(err) => {
					app.mode = InputMode::Select(select);
					app.status = format!("error: {err}");
				}
			}
		}
		_ => {}
	}

	false
}

fn submit_prompt(prompt: &PromptState, journal: &mut Journal, journal_path: &Path) -> Result<String, String> {
	match &prompt.kind {
		PromptKind::AddNote { day } => {
			if !journal.add_note(*day, &prompt.input) {
				return Ok("nothing to add".to_string());
			}
			save_journal(journal_path, journal).map_err(|err| err.to_string())?;
			Ok(format!("added note for {}", day_key(*day)))
		}
		PromptKind::SetStartDate => {
			let instant = parse_start_input(&prompt.input, Utc::now())?;
			journal.set_start(instant);
			save_journal(journal_path, journal).map_err(|err| err.to_string())?;
			Ok(format!(
				"start date set to {}",
				journal.start_day().map(day_key).unwrap_or_default()
			))
		}
	}
}

fn submit_select(
	select: &SelectState,
	journal: &mut Journal,
	journal_path: &mut PathBuf,
) -> Result<String, String> {
	let selected_value = select
		.selected_option()
		.and_then(|option| option.value.clone())
		.ok_or_else(|| "that entry cannot be opened".to_string())?;

	match select.kind {
		SelectKind::JournalSwitch => {
			switch_journal(journal, journal_path, PathBuf::from(selected_value))
		}
	}
}

/// Candidates are the history minus the journal already open. Entries whose
/// file has vanished stay visible but carry no value, so they cannot be
/// chosen.
fn build_journal_switch_select(current: &Path, history: &History) -> Result<SelectState, String> {
	let options = history
		.entries
		.iter()
		.filter(|entry| entry.path.as_path() != current)
		.map(journal_option)
		.collect::<Vec<_>>();

	if options.is_empty() {
		return Err("history has no other journals; open one with --journal <path> first".to_string());
	}

	Ok(SelectState::new("Open journal", SelectKind::JournalSwitch, options))
}

fn journal_option(entry: &HistoryEntry) -> SelectOption {
	let name = entry
		.path
		.file_stem()
		.map(|stem| stem.to_string_lossy().into_owned())
		.unwrap_or_else(|| entry.path.display().to_string());

	if entry.path.exists() {
		SelectOption::new(
			format!("{name}  opened {}", local_day_key(entry.last_opened)),
			Some(entry.path.display().to_string()),
			Style::default(),
		)
	} else {
		SelectOption::new(
			format!("{name}  (file gone)"),
			None,
			Style::default().fg(Color::DarkGray),
		)
	}
}

fn switch_journal(journal: &mut Journal, journal_path: &mut PathBuf, next_path: PathBuf) -> Result<String, String> {
	let next_journal = load_journal(&next_path)
		.map_err(|err| format!("could not open {}: {err}", next_path.display()))?;

	*journal = next_journal;
	*journal_path = next_path;

	if let Err(err) = record_open(journal_path.as_path(), Utc::now()) {
		return Ok(format!(
			"opened {} (history not updated: {err})",
			journal_path.display()
		));
	}

	Ok(format!("opened {}", journal_path.display()))
}

fn border_style(focused: bool) -> Style {
	if focused {
		Style::default()
			.fg(FOCUSED_PANEL_BORDER_COLOR)
			.add_modifier(Modifier::BOLD)
	} else {
		Style::default().fg(INACTIVE_PANEL_BORDER_COLOR)
	}
}

#[derive(Debug, Clone)]
struct PromptState {
	title: String,
	input: String,
	kind: PromptKind,
}

impl PromptState {
	fn new(title: impl Into<String>, kind: PromptKind) -> Self {
		Self {
			title: title.into(),
			input: String::new(),
			kind,
		}
	}
}

#[derive(Debug, Clone)]
enum PromptKind {
	AddNote { day: NaiveDate },
	SetStartDate,
}

#[derive(Debug, Clone)]
struct SelectState {
	title: String,
	options: Vec<SelectOption>,
	selected: usize,
	kind: SelectKind,
}

impl SelectState {
	fn new(title: impl Into<String>, kind: SelectKind, options: Vec<SelectOption>) -> Self {
		Self {
			title: title.into(),
			options,
			selected: 0,
			kind,
		}
	}

	fn move_selection(&mut self, delta: i32) {
		if self.options.is_empty() {
			self.selected = 0;
			return;
		}

		if delta > 0 {
			self.selected = (self.selected + delta as usize).min(self.options.len() - 1);
		} else {
			self.selected = self.selected.saturating_sub(delta.unsigned_abs() as usize);
		}
	}

	fn selected_option(&self) -> Option<&SelectOption> {
		self.options.get(self.selected)
	}
}

#[derive(Debug, Clone)]
struct SelectOption {
	label: String,
	value: Option<String>,
	style: Style,
}

impl SelectOption {
	fn new(label: impl Into<String>, value: Option<String>, style: Style) -> Self {
		Self {
			label: label.into(),
			value,
			style,
		}
	}
}

#[derive(Debug, Clone)]
enum SelectKind {
	JournalSwitch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusPane {
	Calendar,
	Notes,
	Stopwatch,
}

impl FocusPane {
	fn next(self) -> Self {
		match self {
			FocusPane::Calendar => FocusPane::Notes,
			FocusPane::Notes => FocusPane::Stopwatch,
			FocusPane::Stopwatch => FocusPane::Calendar,
		}
	}

	fn prev(self) -> Self {
		match self {
			FocusPane::Calendar => FocusPane::Stopwatch,
			FocusPane::Notes => FocusPane::Calendar,
			FocusPane::Stopwatch => FocusPane::Notes,
		}
	}
}

#[derive(Debug, Clone)]
enum InputMode {
	Normal,
	Prompt(PromptState),
	Select(SelectState),
}

#[derive(Debug, Clone)]
struct App {
	focus: FocusPane,
	selected_day: NaiveDate,
	cursor: MonthCursor,
	note_index: usize,
	stopwatch: Stopwatch,
	mode: InputMode,
	status: String,
}

impl Default for App {
	fn default() -> Self {
		let today = Local::now().date_naive();
		Self {
			focus: FocusPane::Calendar,
			selected_day: today,
			cursor: MonthCursor::from_date(today),
			note_index: 0,
			stopwatch: Stopwatch::new(),
			mode: InputMode::Normal,
			status: "Ready".to_string(),
		}
	}
}

impl App {
	fn clamp_selection(&mut self, view: &ViewModel) {
		if view.day_notes.is_empty() {
			self.note_index = 0;
		} else {
			self.note_index = self.note_index.min(view.day_notes.len() - 1);
		}
	}

	fn shift_selected_day(&mut self, delta_days: i64) {
		self.selected_day += Duration::days(delta_days);
		self.cursor = MonthCursor::from_date(self.selected_day);
		self.note_index = 0;
	}

	fn shift_month(&mut self, delta_months: i32) {
		self.cursor = if delta_months >= 0 {
			self.cursor.next()
		} else {
			self.cursor.prev()
		};
		self.selected_day = self.cursor.clamp_day(self.selected_day.day());
		self.note_index = 0;
	}

	fn jump_to_today(&mut self) {
		self.selected_day = Local::now().date_naive();
		self.cursor = MonthCursor::from_date(self.selected_day);
		self.note_index = 0;
	}

	fn move_note_selection(&mut self, delta: i32) {
		if delta > 0 {
			self.note_index = self.note_index.saturating_add(delta as usize);
		} else {
			self.note_index = self.note_index.saturating_sub(delta.unsigned_abs() as usize);
		}
	}
}

struct ViewModel {
	grid: MonthGrid,
	day_notes: Vec<String>,
	tracker: Option<ElapsedBreakdown>,
	start_day: Option<NaiveDate>,
	stopwatch_seconds: i64,
	stopwatch_running: bool,
}

#[cfg(test)]
mod tests {
	use chrono::{TimeZone, Utc};
	use std::fs;
	use std::path::PathBuf;

	use crate::journals::History;

	use super::build_journal_switch_select;

	fn temp_file(name: &str) -> PathBuf {
		let mut path = std::env::temp_dir();
		path.push(format!("{}_{}", name, std::process::id()));
		path
	}

	#[test]
	fn switch_list_skips_the_open_journal() {
		let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
		let current = temp_file("clearday_ui_current.journal");
		let other = temp_file("clearday_ui_other.journal");
		fs::write(&other, "").expect("write should succeed");

		let mut history = History::default();
		history.touch(current.clone(), t0);
		history.touch(other.clone(), t0);

		let select = build_journal_switch_select(&current, &history).expect("one candidate remains");
		assert_eq!(select.options.len(), 1);
		assert_eq!(select.options[0].value, Some(other.display().to_string()));
		assert!(select.options[0].label.contains("opened 2026-03-"));
		let _ = fs::remove_file(other);
	}

	#[test]
	fn switch_list_requires_another_journal() {
		let current = PathBuf::from("/tmp/clearday_only.journal");
		let mut history = History::default();
		history.touch(
			current.clone(),
			Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
		);
		assert!(build_journal_switch_select(&current, &history).is_err());
		assert!(build_journal_switch_select(&current, &History::default()).is_err());
	}

	#[test]
	fn gone_journal_files_are_not_selectable() {
		let t0 = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
		let current = PathBuf::from("/tmp/clearday_ui_open.journal");
		let gone = temp_file("clearday_ui_gone.journal");
		let _ = fs::remove_file(&gone);

		let mut history = History::default();
		history.touch(gone.clone(), t0);

		let select = build_journal_switch_select(&current, &history).expect("entry stays listed");
		assert_eq!(select.options[0].value, None);
		assert!(select.options[0].label.contains("file gone"));
	}
}
