//! Constants used throughout the application.
//!
//! This module contains all constants used in the Daybook application, organized
//! into logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "daybook";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A personal diary with a calendar interface";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for the SQLite database path.
pub const ENV_VAR_DAYBOOK_DB: &str = "DAYBOOK_DB";
/// Environment variable for the API server bind address.
pub const ENV_VAR_DAYBOOK_ADDR: &str = "DAYBOOK_ADDR";
/// Environment variable for the API base URL used by the calendar client.
pub const ENV_VAR_DAYBOOK_API_URL: &str = "DAYBOOK_API_URL";
/// Environment variable for the comma-separated static holiday list.
pub const ENV_VAR_DAYBOOK_HOLIDAYS: &str = "DAYBOOK_HOLIDAYS";
/// Standard environment variable for the user's home directory.
pub const ENV_VAR_HOME: &str = "HOME";
/// Default database path relative to the user's home directory.
pub const DEFAULT_DB_SUBPATH: &str = ".daybook/diary.db";
/// Default bind address for the API server.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
/// Default API base URL for the calendar client.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

// File System Parameters
/// Default POSIX permissions for newly created directories (owner read/write/execute).
#[cfg(unix)]
pub const DEFAULT_DIR_PERMISSIONS: u32 = 0o700;

// Date/Time Logic
/// Date format string for ISO date format (YYYY-MM-DD).
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Number of months in a year.
pub const MONTHS_PER_YEAR: u32 = 12;

// API Surface
/// Route prefix for the diary entries API.
pub const API_ENTRIES_PATH: &str = "/api/entries";
/// Route for the liveness check.
pub const API_HEALTH_PATH: &str = "/health";
