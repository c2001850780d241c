//! Handlers for the diary entries API.
//!
//! Thin translation layer between HTTP and the entry store: query and payload
//! validation happens here, everything else is delegated to `db::entries`.

use crate::constants::MONTHS_PER_YEAR;
use crate::db::entries::{
    self, parse_entry_date, parse_tags, DiaryEntry, EntryPatch, Mood, NewEntry, TagsInput,
};
use crate::db::Database;
use crate::errors::{AppError, AppResult, DatabaseError};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    year: Option<String>,
    month: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEntryPayload {
    date: Option<String>,
    title: Option<String>,
    content: Option<String>,
    mood: Option<String>,
    tags: Option<TagsInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEntryPayload {
    title: Option<String>,
    content: Option<String>,
    mood: Option<String>,
    tags: Option<TagsInput>,
}

/// Parses an optional mood string, defaulting empty and absent values.
fn mood_or_default(raw: Option<String>) -> AppResult<Mood> {
    match raw.filter(|m| !m.is_empty()) {
        Some(m) => m
            .parse::<Mood>()
            .map_err(|e| AppError::Validation(e.to_string())),
        None => Ok(Mood::default()),
    }
}

/// `GET /api/entries/month?year=YYYY&month=M`
pub async fn list_by_month(
    State(db): State<Database>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<Vec<DiaryEntry>>> {
    let year_raw = query.year.filter(|y| !y.is_empty());
    let month_raw = query.month.filter(|m| !m.is_empty());
    let (year_raw, month_raw) = match (year_raw, month_raw) {
        (Some(y), Some(m)) => (y, m),
        _ => {
            return Err(AppError::Validation(
                "year and month are required".to_string(),
            ))
        }
    };

    let year: i32 = year_raw
        .parse()
        .map_err(|_| AppError::Validation("invalid year or month".to_string()))?;
    let month: u32 = month_raw
        .parse()
        .map_err(|_| AppError::Validation("invalid year or month".to_string()))?;
    if !(1..=MONTHS_PER_YEAR).contains(&month) {
        return Err(AppError::Validation("invalid year or month".to_string()));
    }

    let conn = db.get_conn()?;
    let entries = entries::entries_for_month(&conn, year, month)?;
    Ok(Json(entries))
}

/// `GET /api/entries?date=YYYY-MM-DD`
pub async fn list_by_date(
    State(db): State<Database>,
    Query(query): Query<DateQuery>,
) -> AppResult<Json<Vec<DiaryEntry>>> {
    let date_raw = query
        .date
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::Validation("date is required".to_string()))?;
    let date = parse_entry_date(&date_raw)?;

    let conn = db.get_conn()?;
    let entries = entries::entries_for_date(&conn, date)?;
    Ok(Json(entries))
}

/// `GET /api/entries/{id}`
pub async fn get_one(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<DiaryEntry>> {
    let conn = db.get_conn()?;
    match entries::entry_by_id(&conn, &id)? {
        Some(entry) => Ok(Json(entry)),
        None => Err(DatabaseError::NotFound(format!("Entry with id {} not found", id)).into()),
    }
}

/// `POST /api/entries`
pub async fn create(
    State(db): State<Database>,
    Json(payload): Json<CreateEntryPayload>,
) -> AppResult<(StatusCode, Json<DiaryEntry>)> {
    let date_raw = payload.date.filter(|d| !d.is_empty());
    let content = payload.content.filter(|c| !c.is_empty());
    let (date_raw, content) = match (date_raw, content) {
        (Some(d), Some(c)) => (d, c),
        _ => {
            return Err(AppError::Validation(
                "date and content are required".to_string(),
            ))
        }
    };

    let new = NewEntry {
        date: parse_entry_date(&date_raw)?,
        title: payload.title.unwrap_or_default(),
        content,
        mood: mood_or_default(payload.mood)?,
        tags: payload.tags.as_ref().map(parse_tags).unwrap_or_default(),
    };

    let conn = db.get_conn()?;
    let entry = entries::insert_entry(&conn, new)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// `PUT /api/entries/{id}`
pub async fn update(
    State(db): State<Database>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEntryPayload>,
) -> AppResult<Json<DiaryEntry>> {
    let mood = match payload.mood {
        Some(m) => Some(
            m.parse::<Mood>()
                .map_err(|e| AppError::Validation(e.to_string()))?,
        ),
        None => None,
    };

    let patch = EntryPatch {
        title: payload.title,
        content: payload.content,
        mood,
        tags: payload.tags.as_ref().map(parse_tags),
    };

    let conn = db.get_conn()?;
    let entry = entries::update_entry(&conn, &id, patch)?;
    Ok(Json(entry))
}

/// `DELETE /api/entries/{id}`
pub async fn remove(
    State(db): State<Database>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = db.get_conn()?;
    entries::delete_entry(&conn, &id)?;
    Ok(Json(json!({ "ok": true })))
}
