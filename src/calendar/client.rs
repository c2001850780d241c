//! Blocking HTTP client for the diary entries API.
//!
//! This is the calendar client's only route to the data: every read and
//! mutation goes through a running `daybook --serve` instance. One method per
//! API operation; error responses surface the server's `{"error": ...}`
//! message when one is present.

use crate::constants::API_ENTRIES_PATH;
use crate::db::entries::DiaryEntry;
use crate::errors::{ApiClientError, AppResult};
use chrono::NaiveDate;
use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Form fields collected by the entry dialog, sent verbatim as the request
/// body.
///
/// `tags` stays a single comma-separated string; the server owns tag parsing.
/// On update the server ignores `date`.
#[derive(Debug, Clone, Serialize)]
pub struct EntryForm {
    pub date: String,
    pub title: String,
    pub content: String,
    pub mood: String,
    pub tags: String,
}

/// Client for the diary entries API.
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the diary API (e.g., "http://127.0.0.1:3000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Fetches every entry of the given civil month.
    pub fn entries_for_month(&self, year: i32, month: u32) -> AppResult<Vec<DiaryEntry>> {
        let url = format!(
            "{}{}/month?year={}&month={}",
            self.base_url, API_ENTRIES_PATH, year, month
        );
        debug!("GET {}", url);

        let response = self.client.get(&url).send().map_err(ApiClientError::Http)?;
        Self::read_json(response)
    }

    /// Fetches the entries of a single date.
    pub fn entries_for_date(&self, date: NaiveDate) -> AppResult<Vec<DiaryEntry>> {
        let url = format!("{}{}?date={}", self.base_url, API_ENTRIES_PATH, date);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().map_err(ApiClientError::Http)?;
        Self::read_json(response)
    }

    /// Creates a new entry and returns the stored form.
    pub fn create_entry(&self, form: &EntryForm) -> AppResult<DiaryEntry> {
        let url = format!("{}{}", self.base_url, API_ENTRIES_PATH);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(form)
            .send()
            .map_err(ApiClientError::Http)?;
        Self::read_json(response)
    }

    /// Updates an existing entry and returns the stored form.
    pub fn update_entry(&self, id: &str, form: &EntryForm) -> AppResult<DiaryEntry> {
        let url = format!("{}{}/{}", self.base_url, API_ENTRIES_PATH, id);
        debug!("PUT {}", url);

        let response = self
            .client
            .put(&url)
            .json(form)
            .send()
            .map_err(ApiClientError::Http)?;
        Self::read_json(response)
    }

    /// Deletes an entry.
    pub fn delete_entry(&self, id: &str) -> AppResult<()> {
        let url = format!("{}{}/{}", self.base_url, API_ENTRIES_PATH, id);
        debug!("DELETE {}", url);

        let response = self
            .client
            .delete(&url)
            .send()
            .map_err(ApiClientError::Http)?;
        Self::check_status(response)?;
        Ok(())
    }

    /// Turns a non-success response into an error carrying the server's
    /// message when the body is the usual `{"error": ...}` shape.
    fn check_status(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or(body);

        Err(ApiClientError::Status { status, message }.into())
    }

    fn read_json<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let response = Self::check_status(response)?;
        response.json().map_err(|e| {
            ApiClientError::InvalidResponse(format!("Failed to parse response: {}", e)).into()
        })
    }
}
