/*!
# Daybook - A Personal Diary with a Calendar

Daybook keeps diary entries in a local SQLite database and serves them over a
small HTTP API. The same binary runs both sides: `daybook --serve` starts the
API server, and plain `daybook` opens a full-screen terminal calendar that
talks to it.

This file contains the main application flow, coordinating the various
components to implement the two modes.

## Usage

```
daybook [OPTIONS]

Options:
      --serve                Runs the entries API server instead of the calendar
      --bind <ADDR>          Overrides the server bind address (with --serve)
      --api-url <URL>        Overrides the API base URL used by the calendar
  -d, --date <DATE>          Opens the calendar on a specific date (format: YYYY-MM-DD or YYYYMMDD)
      --log-format <FORMAT>  Log output format: text or json
  -v, --verbose              Enable verbose output
  -h, --help                 Print help information
  -V, --version              Print version information
```

## Configuration

The application can be configured with the following environment variables:
- `DAYBOOK_DB`: Path to the SQLite database (defaults to ~/.daybook/diary.db)
- `DAYBOOK_ADDR`: Bind address for the API server (defaults to 127.0.0.1:3000)
- `DAYBOOK_API_URL`: API base URL for the calendar client (defaults to http://127.0.0.1:3000)
- `DAYBOOK_HOLIDAYS`: Comma-separated YYYY-MM-DD dates marked as holidays
*/

use daybook::api;
use daybook::calendar;
use daybook::cli::CliArgs;
use daybook::config::Config;
use daybook::constants::{DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON};
use daybook::db::Database;
use daybook::errors::{AppError, AppResult};
use daybook::setup;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the tracing subscriber for the selected mode.
///
/// Server logs go to stdout at `info` by default, or `debug` with `--verbose`.
/// Calendar mode owns the terminal, so its logs go to stderr and only errors
/// are shown unless `RUST_LOG` says otherwise. `--log-format json` switches
/// both modes to JSON lines.
fn init_tracing(args: &CliArgs) {
    let default_directive = if args.serve {
        if args.verbose {
            "debug"
        } else {
            DEFAULT_LOG_LEVEL
        }
    } else {
        "error"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let json = args.log_format == LOG_FORMAT_JSON;
    match (args.serve, json) {
        (true, false) => fmt().with_env_filter(filter).init(),
        (true, true) => fmt().with_env_filter(filter).json().init(),
        (false, false) => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        (false, true) => fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init(),
    }
}

/// The main entry point for the daybook application.
///
/// This function coordinates the overall application flow:
/// 1. Parses command-line arguments
/// 2. Initializes logging
/// 3. Loads and validates configuration, applying CLI overrides
/// 4. Resolves the optional start date
/// 5. Runs the API server or the terminal calendar
///
/// # Returns
///
/// A Result that is Ok(()) if the application ran successfully,
/// or an AppError if an error occurred at any point in the flow.
///
/// # Errors
///
/// This function can return various types of errors, including:
/// - Configuration errors (missing or invalid configuration)
/// - I/O errors (cannot bind the listener, cannot create the data directory)
/// - Validation errors (invalid date format)
/// - Database errors (cannot open or initialize the entry store)
/// - API client errors (calendar cannot reach the server)
fn main() -> AppResult<()> {
    // Parse command-line arguments
    let args = CliArgs::parse();

    init_tracing(&args);
    info!("Starting daybook");
    debug!("CLI arguments: {:?}", args);

    // Load and validate configuration, with CLI flags taking precedence
    info!("Loading configuration");
    let mut config = Config::load()?;

    if let Some(bind) = &args.bind {
        config.bind_addr = bind
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid bind address '{}': {}", bind, e)))?;
    }
    if let Some(url) = &args.api_url {
        config.api_url = url.clone();
    }
    config.validate()?;

    // Resolve the optional start date before touching the terminal
    let start_date = match args.parse_date() {
        Some(Ok(date)) => Some(date),
        Some(Err(_)) => {
            return Err(AppError::Validation(format!(
                "Invalid date '{}': expected format YYYY-MM-DD or YYYYMMDD",
                args.date.as_deref().unwrap_or_default()
            )))
        }
        None => None,
    };

    if args.serve {
        debug!("Database path: {:?}", config.db_path);
        setup::ensure_data_directory_exists(&config.db_path)?;

        let db = Database::open(&config.db_path)?;
        db.initialize_schema()?;

        // The calendar client uses blocking I/O, so the async runtime only
        // exists in server mode.
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(api::serve(&config, db))
    } else {
        calendar::run(&config, start_date)
    }
}
