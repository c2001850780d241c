//! Terminal calendar client for the diary.
//!
//! Renders one civil month as a Sunday-first grid and drives every diary
//! operation through the HTTP API. All view state lives in [`CalendarView`];
//! at most one dialog is open at a time.
//!
//! # Module Structure
//!
//! - `client`: blocking HTTP client for the entries API
//! - `ui`: ratatui rendering
//!
//! Month entries are cached per month and replaced wholesale after every
//! month switch and every successful mutation, so the has-entry marks never
//! go stale.

pub mod client;
mod ui;

use crate::config::Config;
use crate::db::entries::{DiaryEntry, Mood};
use crate::errors::AppResult;
use chrono::{Datelike, Local, Months, NaiveDate, Weekday};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashSet;

// Re-export commonly used types
pub use client::{ApiClient, EntryForm};

/// Number of days in the given civil month, honoring leap years.
///
/// Returns 0 for an invalid year/month pair.
///
/// # Examples
///
/// ```
/// use daybook::calendar::days_in_month;
///
/// assert_eq!(days_in_month(2024, 2), 29);
/// assert_eq!(days_in_month(2023, 2), 28);
/// ```
pub fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

/// Sunday-first weekday index of the 1st of the month (0 = Sunday).
///
/// The grid places this many leading blanks before day 1.
pub fn first_weekday_offset(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Lays the month out as Sunday-first weeks; `None` cells are blanks.
pub fn month_grid(year: i32, month: u32) -> Vec<[Option<u32>; 7]> {
    let offset = first_weekday_offset(year, month) as usize;
    let days = days_in_month(year, month);

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    let mut slot = offset;
    for day in 1..=days {
        week[slot] = Some(day);
        slot += 1;
        if slot == 7 {
            weeks.push(week);
            week = [None; 7];
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }
    weeks
}

/// True for Saturday and Sunday.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Which entry form field currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Content,
    Mood,
    Tags,
}

/// State of the entry form dialog, used for both create and edit.
///
/// `entry_id` decides the submit route: `None` creates (POST), `Some` updates
/// (PUT). The date is fixed when the form opens; an update never changes it.
#[derive(Debug, Clone)]
pub struct EntryFormState {
    pub entry_id: Option<String>,
    pub date: String,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub tags: String,
    pub field: FormField,
}

impl EntryFormState {
    /// Blank form for a new entry on the given date.
    pub fn create(date: NaiveDate) -> Self {
        Self {
            entry_id: None,
            date: date.to_string(),
            title: String::new(),
            content: String::new(),
            mood: Mood::default(),
            tags: String::new(),
            field: FormField::Title,
        }
    }

    /// Form prefilled from an existing entry; tags join back into one
    /// comma-separated string.
    pub fn edit(entry: &DiaryEntry) -> Self {
        Self {
            entry_id: Some(entry.id.clone()),
            date: entry.date.to_string(),
            title: entry.title.clone(),
            content: entry.content.clone(),
            mood: entry.mood,
            tags: entry.tags.join(", "),
            field: FormField::Title,
        }
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Content,
            FormField::Content => FormField::Mood,
            FormField::Mood => FormField::Tags,
            FormField::Tags => FormField::Title,
        };
    }

    pub fn prev_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Tags,
            FormField::Content => FormField::Title,
            FormField::Mood => FormField::Content,
            FormField::Tags => FormField::Mood,
        };
    }

    /// Steps through the six moods, wrapping at both ends.
    pub fn cycle_mood(&mut self, step: isize) {
        let len = Mood::ALL.len() as isize;
        let idx = Mood::ALL
            .iter()
            .position(|m| *m == self.mood)
            .unwrap_or(0) as isize;
        self.mood = Mood::ALL[(idx + step).rem_euclid(len) as usize];
    }

    fn active_text(&mut self) -> Option<&mut String> {
        match self.field {
            FormField::Title => Some(&mut self.title),
            FormField::Content => Some(&mut self.content),
            FormField::Tags => Some(&mut self.tags),
            FormField::Mood => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.active_text() {
            text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.active_text() {
            text.pop();
        }
    }

    /// The wire payload for submit.
    pub fn form(&self) -> EntryForm {
        EntryForm {
            date: self.date.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            mood: self.mood.as_str().to_string(),
            tags: self.tags.clone(),
        }
    }
}

/// The single active dialog; `None` means the bare grid.
#[derive(Debug)]
pub enum Dialog {
    None,
    View { entry: DiaryEntry },
    Form(EntryFormState),
    MonthList { selected: usize },
    ConfirmDelete { entry: DiaryEntry },
}

/// Everything the calendar screen needs to draw itself.
#[derive(Debug)]
pub struct CalendarView {
    pub year: i32,
    /// 1 through 12; navigation keeps it in range.
    pub month: u32,
    /// Day cursor, 1 through the month's length.
    pub day: u32,
    pub today: NaiveDate,
    pub holidays: HashSet<NaiveDate>,
    /// Cached entries of the shown month, replaced wholesale on reload.
    pub entries: Vec<DiaryEntry>,
    pub dialog: Dialog,
    /// Last error shown on the status line, cleared by the next API call.
    pub status: Option<String>,
}

impl CalendarView {
    pub fn new(cursor: NaiveDate, today: NaiveDate, holidays: &[NaiveDate]) -> Self {
        Self {
            year: cursor.year(),
            month: cursor.month(),
            day: cursor.day(),
            today,
            holidays: holidays.iter().copied().collect(),
            entries: Vec::new(),
            dialog: Dialog::None,
            status: None,
        }
    }

    /// The date under the cursor.
    pub fn selected_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).unwrap_or(self.today)
    }

    /// Moves the day cursor, clamped to the current month.
    pub fn move_day(&mut self, delta: i32) {
        let days = days_in_month(self.year, self.month) as i32;
        self.day = (self.day as i32 + delta).clamp(1, days.max(1)) as u32;
    }

    /// Switches month, carrying the year and clamping the day cursor to the
    /// new month's length.
    pub fn shift_month(&mut self, delta: i32) {
        let total = self.year * 12 + (self.month as i32 - 1) + delta;
        self.year = total.div_euclid(12);
        self.month = (total.rem_euclid(12) + 1) as u32;
        self.day = self.day.min(days_in_month(self.year, self.month)).max(1);
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn is_today(&self, date: NaiveDate) -> bool {
        date == self.today
    }

    /// True when the cached month has at least one entry on that date.
    pub fn has_entry(&self, date: NaiveDate) -> bool {
        self.entries.iter().any(|e| e.date == date)
    }
}

/// Calendar state machine plus its API client.
pub struct CalendarApp {
    pub view: CalendarView,
    pub client: ApiClient,
}

impl CalendarApp {
    /// Handles one key event. Returns `false` when the user quits.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.view.dialog {
            Dialog::None => self.handle_grid_key(key),
            Dialog::View { .. } => {
                self.handle_view_key(key);
                true
            }
            Dialog::Form(_) => {
                self.handle_form_key(key);
                true
            }
            Dialog::MonthList { .. } => {
                self.handle_list_key(key);
                true
            }
            Dialog::ConfirmDelete { .. } => {
                self.handle_confirm_key(key);
                true
            }
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Left => self.view.move_day(-1),
            KeyCode::Right => self.view.move_day(1),
            KeyCode::Up => self.view.move_day(-7),
            KeyCode::Down => self.view.move_day(7),
            KeyCode::Char('[') | KeyCode::PageUp => {
                self.view.shift_month(-1);
                self.reload_month();
            }
            KeyCode::Char(']') | KeyCode::PageDown => {
                self.view.shift_month(1);
                self.reload_month();
            }
            KeyCode::Enter => self.activate_day(),
            KeyCode::Char('m') => self.view.dialog = Dialog::MonthList { selected: 0 },
            _ => {}
        }
        true
    }

    fn handle_view_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('e') => {
                if let Dialog::View { entry } = &self.view.dialog {
                    let form = EntryFormState::edit(entry);
                    self.view.dialog = Dialog::Form(form);
                }
            }
            KeyCode::Char('d') => {
                if let Dialog::View { entry } = &self.view.dialog {
                    let entry = entry.clone();
                    self.view.dialog = Dialog::ConfirmDelete { entry };
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => self.view.dialog = Dialog::None,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.submit_form();
            return;
        }
        if key.code == KeyCode::Esc {
            self.view.dialog = Dialog::None;
            return;
        }

        if let Dialog::Form(form) = &mut self.view.dialog {
            match key.code {
                KeyCode::Tab => form.next_field(),
                KeyCode::BackTab => form.prev_field(),
                KeyCode::Left if form.field == FormField::Mood => form.cycle_mood(-1),
                KeyCode::Right if form.field == FormField::Mood => form.cycle_mood(1),
                KeyCode::Char(' ') if form.field == FormField::Mood => form.cycle_mood(1),
                KeyCode::Char(c) => form.push_char(c),
                KeyCode::Backspace => form.pop_char(),
                KeyCode::Enter if form.field == FormField::Content => form.push_char('\n'),
                _ => {}
            }
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let selected = match self.view.dialog {
            Dialog::MonthList { selected } => selected,
            _ => return,
        };

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.view.dialog = Dialog::None,
            KeyCode::Up => {
                self.view.dialog = Dialog::MonthList {
                    selected: selected.saturating_sub(1),
                }
            }
            KeyCode::Down => {
                let last = self.view.entries.len().saturating_sub(1);
                self.view.dialog = Dialog::MonthList {
                    selected: (selected + 1).min(last),
                };
            }
            KeyCode::Enter | KeyCode::Char('v') => {
                if let Some(entry) = self.view.entries.get(selected).cloned() {
                    self.view.dialog = Dialog::View { entry };
                }
            }
            KeyCode::Char('e') => {
                if let Some(entry) = self.view.entries.get(selected) {
                    self.view.dialog = Dialog::Form(EntryFormState::edit(entry));
                }
            }
            KeyCode::Char('d') => {
                if let Some(entry) = self.view.entries.get(selected).cloned() {
                    self.view.dialog = Dialog::ConfirmDelete { entry };
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') => self.delete_confirmed(),
            KeyCode::Char('n') | KeyCode::Esc => self.view.dialog = Dialog::None,
            _ => {}
        }
    }

    /// Replaces the month cache from the API; failures land on the status
    /// line and keep the previous cache.
    fn reload_month(&mut self) {
        self.view.status = None;
        match self.client.entries_for_month(self.view.year, self.view.month) {
            Ok(entries) => self.view.entries = entries,
            Err(e) => self.view.status = Some(e.to_string()),
        }
    }

    /// Enter on a day: entries there open the first one for viewing, an
    /// empty day opens the create form prefilled with the date.
    fn activate_day(&mut self) {
        self.view.status = None;
        let date = self.view.selected_date();
        match self.client.entries_for_date(date) {
            Ok(entries) => match entries.into_iter().next() {
                Some(entry) => self.view.dialog = Dialog::View { entry },
                None => self.view.dialog = Dialog::Form(EntryFormState::create(date)),
            },
            Err(e) => self.view.status = Some(e.to_string()),
        }
    }

    fn submit_form(&mut self) {
        let form = match &self.view.dialog {
            Dialog::Form(form) => form.clone(),
            _ => return,
        };

        self.view.status = None;
        let payload = form.form();
        let result = match &form.entry_id {
            Some(id) => self.client.update_entry(id, &payload),
            None => self.client.create_entry(&payload),
        };

        match result {
            Ok(_) => {
                self.view.dialog = Dialog::None;
                self.reload_month();
            }
            // Form stays open so nothing typed is lost.
            Err(e) => self.view.status = Some(e.to_string()),
        }
    }

    fn delete_confirmed(&mut self) {
        let id = match &self.view.dialog {
            Dialog::ConfirmDelete { entry } => entry.id.clone(),
            _ => return,
        };

        self.view.status = None;
        self.view.dialog = Dialog::None;
        match self.client.delete_entry(&id) {
            Ok(()) => self.reload_month(),
            Err(e) => self.view.status = Some(e.to_string()),
        }
    }
}

/// Runs the calendar client until the user quits.
///
/// The first month is fetched before the terminal switches to the alternate
/// screen, so an unreachable API fails with a readable error on stderr.
///
/// # Errors
///
/// Returns an error when the initial fetch fails or the terminal cannot be
/// driven.
pub fn run(config: &Config, start: Option<NaiveDate>) -> AppResult<()> {
    let today = Local::now().date_naive();
    let cursor = start.unwrap_or(today);

    let client = ApiClient::new(config.api_base());
    let entries = client.entries_for_month(cursor.year(), cursor.month())?;

    let mut view = CalendarView::new(cursor, today, &config.holidays);
    view.entries = entries;
    let mut app = CalendarApp { view, client };

    let mut ui = ui::Ui::new()?;
    loop {
        ui.draw(&app.view)?;
        if let Event::Key(key) = event::read()? {
            if !app.handle_key(key) {
                break;
            }
        }
    }

    Ok(())
}
