//! Ratatui rendering for the calendar client.
//!
//! One screen per dialog state: the month grid, the entry view, the entry
//! form, the month list and the delete confirmation. [`Ui`] owns the
//! terminal and restores it on drop, so the shell survives error exits.

use super::{is_weekend, month_grid, CalendarView, Dialog, EntryFormState, FormField};
use crate::db::entries::DiaryEntry;
use crate::errors::AppResult;
use chrono::NaiveDate;
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap},
    Frame, Terminal,
};
use std::io::{stdout, Stdout};

pub struct Ui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Ui {
    /// Enters raw mode and the alternate screen.
    pub fn new() -> AppResult<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Ui { terminal })
    }

    /// Draws the screen matching the active dialog.
    pub fn draw(&mut self, view: &CalendarView) -> AppResult<()> {
        self.terminal.draw(|f| match &view.dialog {
            Dialog::None => draw_grid(f, view),
            Dialog::View { entry } => draw_view_dialog(f, entry),
            Dialog::Form(form) => draw_form(f, view, form),
            Dialog::MonthList { selected } => draw_month_list(f, view, *selected),
            Dialog::ConfirmDelete { entry } => draw_confirm(f, entry),
        })?;

        Ok(())
    }
}

impl Drop for Ui {
    fn drop(&mut self) {
        // Restore the terminal on every exit path; drop cannot report errors.
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

fn draw_title(f: &mut Frame, area: Rect, text: &str) {
    let title = Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, area);
}

fn draw_instructions(f: &mut Frame, area: Rect, text: &str) {
    let instructions = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center);
    f.render_widget(instructions, area);
}

fn draw_status(f: &mut Frame, area: Rect, view: &CalendarView) {
    if let Some(message) = &view.status {
        let status = Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::LightRed))
            .alignment(Alignment::Center);
        f.render_widget(status, area);
    }
}

fn month_label(view: &CalendarView) -> String {
    NaiveDate::from_ymd_opt(view.year, view.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", view.year, view.month))
}

fn day_cell(view: &CalendarView, day: u32) -> Cell<'static> {
    let date = match NaiveDate::from_ymd_opt(view.year, view.month, day) {
        Some(d) => d,
        None => return Cell::from(""),
    };

    let marker = if view.has_entry(date) { "•" } else { " " };
    let text = format!("{:>2}{}", day, marker);

    let mut style = Style::default();
    if view.is_holiday(date) {
        style = style.fg(Color::Red);
    } else if is_weekend(date) {
        style = style.fg(Color::Yellow);
    }
    if view.is_today(date) {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    if day == view.day {
        style = style.add_modifier(Modifier::REVERSED);
    }

    Cell::from(text).style(style)
}

fn draw_grid(f: &mut Frame, view: &CalendarView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.area());

    draw_title(f, chunks[0], "Daybook");

    let header = Row::new(["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = month_grid(view.year, view.month)
        .iter()
        .map(|week| {
            let cells: Vec<Cell> = week
                .iter()
                .map(|slot| match slot {
                    Some(day) => day_cell(view, *day),
                    None => Cell::from(""),
                })
                .collect();
            Row::new(cells)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(4); 7])
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(month_label(view)));
    f.render_widget(table, chunks[1]);

    draw_status(f, chunks[2], view);

    let footer = Paragraph::new(vec![
        Line::from("Arrows: Move, [/]: Month, Enter: Open day, m: Month entries, q: Quit"),
        Line::from("Red: holiday, Yellow: weekend, •: has entry, Underline: today"),
    ])
    .style(Style::default().fg(Color::Yellow))
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);
}

fn draw_view_dialog(f: &mut Frame, entry: &DiaryEntry) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.area());

    let heading = if entry.title.is_empty() {
        "Diary Entry"
    } else {
        entry.title.as_str()
    };
    draw_title(f, chunks[0], heading);

    let mut lines = vec![
        Line::from(format!("Date: {}", entry.date.format("%a %b %d %Y"))),
        Line::from(format!("Mood: {}", entry.mood.as_str())),
        Line::from(format!("Tags: {}", entry.tags.join(", "))),
        Line::from(""),
    ];
    lines.extend(entry.content.lines().map(|l| Line::from(l.to_string())));

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("Entry"));
    f.render_widget(body, chunks[1]);

    draw_instructions(f, chunks[2], "e: Edit, d: Delete, Esc: Back");
}

fn input_block(title: &'static str, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

fn draw_form(f: &mut Frame, view: &CalendarView, form: &EntryFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(15),
                Constraint::Length(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.area());

    let heading = if form.entry_id.is_some() {
        "Edit Entry"
    } else {
        "New Entry"
    };
    draw_title(f, chunks[0], heading);

    let fields = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(chunks[1]);

    let date_line = Paragraph::new(format!("Date: {}", form.date));
    f.render_widget(date_line, fields[0]);

    let title_input = Paragraph::new(form.title.as_str())
        .block(input_block("Title", form.field == FormField::Title));
    f.render_widget(title_input, fields[1]);

    let content_input = Paragraph::new(form.content.as_str())
        .wrap(Wrap { trim: false })
        .block(input_block("Content", form.field == FormField::Content));
    f.render_widget(content_input, fields[2]);

    let mood_text = if form.field == FormField::Mood {
        format!("< {} >", form.mood.as_str())
    } else {
        form.mood.as_str().to_string()
    };
    let mood_input =
        Paragraph::new(mood_text).block(input_block("Mood", form.field == FormField::Mood));
    f.render_widget(mood_input, fields[3]);

    let tags_input = Paragraph::new(form.tags.as_str()).block(input_block(
        "Tags (comma-separated)",
        form.field == FormField::Tags,
    ));
    f.render_widget(tags_input, fields[4]);

    draw_status(f, chunks[2], view);
    draw_instructions(
        f,
        chunks[3],
        "Tab: Next field, Space: Change mood, Ctrl+S: Save, Esc: Cancel",
    );
}

fn draw_month_list(f: &mut Frame, view: &CalendarView, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.area());

    let heading = format!("Entries for {}", month_label(view));
    draw_title(f, chunks[0], &heading);

    let items: Vec<ListItem> = if view.entries.is_empty() {
        vec![ListItem::new("No entries yet this month.")]
    } else {
        view.entries
            .iter()
            .map(|e| {
                let title = if e.title.is_empty() {
                    "Untitled"
                } else {
                    e.title.as_str()
                };
                ListItem::new(vec![
                    Line::from(format!("{}  {}", e.date, title)),
                    Line::from(format!(
                        "Mood: {} | Tags: {}",
                        e.mood.as_str(),
                        e.tags.join(", ")
                    )),
                ])
            })
            .collect()
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Entries"))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    f.render_stateful_widget(
        list,
        chunks[1],
        &mut ListState::default().with_selected(Some(selected)),
    );

    draw_instructions(
        f,
        chunks[2],
        "Up/Down: Navigate, Enter: View, e: Edit, d: Delete, Esc: Back",
    );
}

fn draw_confirm(f: &mut Frame, entry: &DiaryEntry) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(f.area());

    draw_title(f, chunks[0], "Delete Entry");

    let title = if entry.title.is_empty() {
        "Untitled"
    } else {
        entry.title.as_str()
    };
    let body = Paragraph::new(vec![
        Line::from("Delete this entry?"),
        Line::from(""),
        Line::from(format!("{}  {}", entry.date, title)),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, chunks[1]);

    draw_instructions(f, chunks[2], "y: Delete, n: Cancel");
}
