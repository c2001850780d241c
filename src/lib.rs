/*!
# Daybook

Daybook is a personal diary with a calendar interface. Entries live in a local
SQLite database and are served over a small HTTP API; a full-screen terminal
calendar talks to that API to browse, write, and delete entries.

## Core Features

- Keep diary entries with a title, free-form content, a mood, and tags
- Browse a month calendar with holiday, weekend, and entry markers
- Create, edit, and delete entries from the terminal
- Serve entries over a REST API for other clients

## Architecture

The codebase follows a modular architecture with clear separation of concerns:

- `api`: HTTP API over the entry store using axum
- `calendar`: Terminal calendar client using ratatui
- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `constants`: Shared defaults, environment variable names, and formats
- `db`: SQLite entry store with connection pooling
- `errors`: Error handling infrastructure
- `setup`: Data directory creation

## Usage Example

```rust,no_run
use daybook::{Config, Database};
use daybook::setup;

fn main() -> daybook::AppResult<()> {
    // Load configuration
    let config = Config::load()?;

    // Ensure the data directory exists and open the entry store
    setup::ensure_data_directory_exists(&config.db_path)?;
    let db = Database::open(&config.db_path)?;
    db.initialize_schema()?;

    Ok(())
}
```
*/

/// HTTP API exposing the entry store
pub mod api;
/// Terminal calendar client for browsing and editing entries
pub mod calendar;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Shared constants for defaults, environment variables, and formats
pub mod constants;
/// SQLite storage for diary entries
pub mod db;
/// Error types and utilities for error handling
pub mod errors;
/// Data directory setup
pub mod setup;

// Re-export important types for convenience
pub use cli::CliArgs;
pub use config::Config;
pub use db::entries::DiaryEntry;
pub use db::Database;
pub use errors::{AppError, AppResult};
