//! Diary entry model and CRUD operations.
//!
//! This module defines the `DiaryEntry` model, the `Mood` enumeration, tag
//! parsing, and the functions for creating, reading, updating, and deleting
//! entries in the database.

use crate::constants::DATE_FORMAT_ISO;
use crate::errors::{AppError, AppResult, DatabaseError};
use chrono::{DateTime, Months, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

/// Mood attached to a diary entry.
///
/// Serialized in lowercase on the wire and in the database. Writes carrying
/// anything outside these six values are rejected where text is parsed into
/// this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Sad,
    #[default]
    Neutral,
    Angry,
    Excited,
    Tired,
}

impl Mood {
    /// All moods in presentation order.
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Neutral,
        Mood::Angry,
        Mood::Excited,
        Mood::Tired,
    ];

    /// The lowercase wire and storage form of this mood.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Neutral => "neutral",
            Mood::Angry => "angry",
            Mood::Excited => "excited",
            Mood::Tired => "tired",
        }
    }
}

impl FromStr for Mood {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "happy" => Ok(Mood::Happy),
            "sad" => Ok(Mood::Sad),
            "neutral" => Ok(Mood::Neutral),
            "angry" => Ok(Mood::Angry),
            "excited" => Ok(Mood::Excited),
            "tired" => Ok(Mood::Tired),
            other => Err(DatabaseError::InvalidMood(other.to_string())),
        }
    }
}

/// Represents a diary entry.
///
/// The `date` is the civil day the entry belongs to; any number of entries may
/// share a date. Timestamps are RFC 3339 text with millisecond precision and
/// `Z` suffix, so their text order is their time order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub tags: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Input for inserting a new entry. Defaults for title, mood, and tags are
/// applied by the caller before construction.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
    pub mood: Mood,
    pub tags: Vec<String>,
}

/// Partial update for an entry. `None` fields are left untouched; the entry's
/// date cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub mood: Option<Mood>,
    pub tags: Option<Vec<String>>,
}

/// Accepted wire shapes for the tags field: a list of strings or one
/// comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Csv(String),
}

/// Normalizes a tags input into the stored tag list.
///
/// Every element (list shape) or comma-separated piece (string shape) is
/// trimmed of surrounding whitespace and dropped when empty. Order is
/// preserved and duplicates are kept.
///
/// # Examples
///
/// ```
/// use daybook::db::entries::{parse_tags, TagsInput};
///
/// let tags = parse_tags(&TagsInput::Csv("a, b, b ".to_string()));
/// assert_eq!(tags, vec!["a", "b", "b"]);
/// ```
pub fn parse_tags(input: &TagsInput) -> Vec<String> {
    match input {
        TagsInput::List(items) => items
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        TagsInput::Csv(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

/// Parses an entry date from its wire form, normalizing to the UTC civil day.
///
/// Accepts a bare `YYYY-MM-DD` date or a full RFC 3339 timestamp; a timestamp
/// is converted to UTC and truncated to its date, so two writes at different
/// wall-clock moments of the same UTC day land on the same date value.
///
/// # Errors
///
/// Returns `AppError::Validation` when the input parses as neither form.
pub fn parse_entry_date(input: &str) -> AppResult<NaiveDate> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT_ISO) {
        return Ok(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }

    Err(AppError::Validation(format!("invalid date '{}'", input)))
}

/// Current UTC time in the stored timestamp form.
fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Maps a database row onto a `DiaryEntry`.
fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<DiaryEntry> {
    let date_text: String = row.get(1)?;
    let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT_ISO).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let mood_text: String = row.get(4)?;
    let mood = Mood::from_str(&mood_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let tags_text: String = row.get(5)?;
    let tags: Vec<String> = serde_json::from_str(&tags_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(DiaryEntry {
        id: row.get(0)?,
        date,
        title: row.get(2)?,
        content: row.get(3)?,
        mood,
        tags,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

const ENTRY_COLUMNS: &str = "id, date, title, content, mood, tags, created_at, updated_at";

/// Inserts a new diary entry.
///
/// Assigns the id and both timestamps, then returns the stored entry.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `new` - The entry to insert
///
/// # Errors
///
/// Returns `AppError::Validation` if the content is empty; nothing is
/// persisted in that case. Returns a database error if the insert fails.
pub fn insert_entry(conn: &Connection, new: NewEntry) -> AppResult<DiaryEntry> {
    if new.content.is_empty() {
        return Err(AppError::Validation("content must not be empty".to_string()));
    }

    let now = current_timestamp();
    let entry = DiaryEntry {
        id: Uuid::new_v4().to_string(),
        date: new.date,
        title: new.title,
        content: new.content,
        mood: new.mood,
        tags: new.tags,
        created_at: now.clone(),
        updated_at: now,
    };

    debug!("Inserting entry {} for date {}", entry.id, entry.date);

    let tags_json = serde_json::to_string(&entry.tags).map_err(DatabaseError::Tags)?;

    conn.execute(
        r#"
        INSERT INTO entries (id, date, title, content, mood, tags, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            entry.id,
            entry.date.to_string(),
            entry.title,
            entry.content,
            entry.mood.as_str(),
            tags_json,
            entry.created_at,
            entry.updated_at,
        ],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(entry)
}

/// Retrieves every entry whose date falls within the given civil month,
/// first day through last day inclusive.
///
/// Entries are ordered by date, then by creation time within a date.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `year` - Calendar year
/// * `month` - Calendar month, 1-12
///
/// # Errors
///
/// Returns `AppError::Validation` if year and month do not form a valid
/// month. Returns a database error if the query fails.
pub fn entries_for_month(conn: &Connection, year: i32, month: u32) -> AppResult<Vec<DiaryEntry>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::Validation(format!("invalid year or month: {}-{}", year, month)))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| AppError::Validation(format!("invalid year or month: {}-{}", year, month)))?;

    debug!("Listing entries from {} through {}", first, last);

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM entries WHERE date >= ?1 AND date <= ?2 \
             ORDER BY date ASC, created_at ASC, rowid ASC",
            ENTRY_COLUMNS
        ))
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map(params![first.to_string(), last.to_string()], row_to_entry)
        .map_err(DatabaseError::Sqlite)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row.map_err(DatabaseError::Sqlite)?);
    }
    Ok(entries)
}

/// Retrieves the entries of exactly one date, in creation order.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `date` - The civil day to list
///
/// # Errors
///
/// Returns a database error if the query fails.
pub fn entries_for_date(conn: &Connection, date: NaiveDate) -> AppResult<Vec<DiaryEntry>> {
    debug!("Listing entries for date {}", date);

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM entries WHERE date = ?1 ORDER BY created_at ASC, rowid ASC",
            ENTRY_COLUMNS
        ))
        .map_err(DatabaseError::Sqlite)?;

    let rows = stmt
        .query_map(params![date.to_string()], row_to_entry)
        .map_err(DatabaseError::Sqlite)?;

    let mut entries = Vec::new();
    for row in rows {
        entries.push(row.map_err(DatabaseError::Sqlite)?);
    }
    Ok(entries)
}

/// Retrieves an entry by id.
///
/// # Errors
///
/// Returns an error if the database operation fails.
/// Returns `Ok(None)` if no entry exists with the given id.
pub fn entry_by_id(conn: &Connection, id: &str) -> AppResult<Option<DiaryEntry>> {
    debug!("Getting entry {}", id);

    let result = conn.query_row(
        &format!("SELECT {} FROM entries WHERE id = ?1", ENTRY_COLUMNS),
        params![id],
        row_to_entry,
    );

    match result {
        Ok(entry) => Ok(Some(entry)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DatabaseError::Sqlite(e).into()),
    }
}

/// Applies a partial update to an entry.
///
/// Only the supplied fields change; omitted fields keep their stored values.
/// The `updated_at` timestamp is refreshed on success.
///
/// # Arguments
///
/// * `conn` - Database connection
/// * `id` - Id of the entry to update
/// * `patch` - Fields to change
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if the entry does not exist and
/// `AppError::Validation` if the patch sets content to the empty string.
pub fn update_entry(conn: &Connection, id: &str, patch: EntryPatch) -> AppResult<DiaryEntry> {
    let mut entry = match entry_by_id(conn, id)? {
        Some(entry) => entry,
        None => {
            return Err(DatabaseError::NotFound(format!("Entry with id {} not found", id)).into())
        }
    };

    if let Some(content) = patch.content {
        if content.is_empty() {
            return Err(AppError::Validation("content must not be empty".to_string()));
        }
        entry.content = content;
    }
    if let Some(title) = patch.title {
        entry.title = title;
    }
    if let Some(mood) = patch.mood {
        entry.mood = mood;
    }
    if let Some(tags) = patch.tags {
        entry.tags = tags;
    }
    entry.updated_at = current_timestamp();

    debug!("Updating entry {}", id);

    let tags_json = serde_json::to_string(&entry.tags).map_err(DatabaseError::Tags)?;

    conn.execute(
        r#"
        UPDATE entries
        SET title = ?1, content = ?2, mood = ?3, tags = ?4, updated_at = ?5
        WHERE id = ?6
        "#,
        params![
            entry.title,
            entry.content,
            entry.mood.as_str(),
            tags_json,
            entry.updated_at,
            id,
        ],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(entry)
}

/// Deletes an entry by id.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no entry exists with the given id.
pub fn delete_entry(conn: &Connection, id: &str) -> AppResult<()> {
    debug!("Deleting entry {}", id);

    let rows_affected = conn
        .execute("DELETE FROM entries WHERE id = ?1", params![id])
        .map_err(DatabaseError::Sqlite)?;

    if rows_affected == 0 {
        return Err(DatabaseError::NotFound(format!("Entry with id {} not found", id)).into());
    }

    Ok(())
}
