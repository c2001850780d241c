//! Configuration management for the daybook application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults. It supports configuring the database location,
//! the API server bind address, the API base URL used by the calendar client, and
//! the static holiday list shown on the calendar.
//!
//! # Environment Variables
//!
//! - `DAYBOOK_DB`: Path to the SQLite database (defaults to ~/.daybook/diary.db)
//! - `DAYBOOK_ADDR`: Bind address for the API server (defaults to 127.0.0.1:3000)
//! - `DAYBOOK_API_URL`: API base URL for the calendar client (defaults to http://127.0.0.1:3000)
//! - `DAYBOOK_HOLIDAYS`: Comma-separated YYYY-MM-DD dates marked as holidays
//! - `HOME`: Used for expanding the default database path

use crate::constants::{
    DATE_FORMAT_ISO, DEFAULT_API_URL, DEFAULT_BIND_ADDR, DEFAULT_DB_SUBPATH, ENV_VAR_DAYBOOK_ADDR,
    ENV_VAR_DAYBOOK_API_URL, ENV_VAR_DAYBOOK_DB, ENV_VAR_DAYBOOK_HOLIDAYS, ENV_VAR_HOME,
};
use crate::errors::{AppError, AppResult};
use chrono::NaiveDate;
use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the daybook application.
///
/// This struct holds the configuration settings needed for the application, including
/// where the entry database lives, where the API server listens, and which API the
/// calendar client talks to.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use daybook::Config;
/// use std::net::SocketAddr;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("/path/to/diary.db"),
///     bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
///     api_url: "http://127.0.0.1:3000".to_string(),
///     holidays: Vec::new(),
/// };
/// ```
///
/// Loading configuration from environment variables:
/// ```no_run
/// use daybook::Config;
/// use std::env;
///
/// // Set environment variables
/// env::set_var("DAYBOOK_DB", "/custom/diary.db");
///
/// // Load configuration
/// let config = Config::load().expect("Failed to load configuration");
/// assert_eq!(config.db_path, std::path::PathBuf::from("/custom/diary.db"));
/// ```
pub struct Config {
    /// Path to the SQLite database holding diary entries.
    ///
    /// This is loaded from the DAYBOOK_DB environment variable with a fallback
    /// to ~/.daybook/diary.db if not specified.
    pub db_path: PathBuf,

    /// Address the API server binds to.
    ///
    /// This is loaded from the DAYBOOK_ADDR environment variable with a fallback
    /// to 127.0.0.1:3000 if not specified.
    pub bind_addr: SocketAddr,

    /// Base URL of the entries API, used by the calendar client.
    ///
    /// This is loaded from the DAYBOOK_API_URL environment variable with a fallback
    /// to http://127.0.0.1:3000 if not specified.
    pub api_url: String,

    /// Static holiday dates marked on the calendar grid.
    ///
    /// Loaded from DAYBOOK_HOLIDAYS as a comma-separated list of YYYY-MM-DD dates,
    /// empty when unset.
    pub holidays: Vec<NaiveDate>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_path", &"[REDACTED_PATH]")
            .field("bind_addr", &self.bind_addr)
            .field("api_url", &self.api_url)
            .field("holidays", &self.holidays.len())
            .finish()
    }
}

impl Default for Config {
    /// Creates a new Config with default values.
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(""),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_url: DEFAULT_API_URL.to_string(),
            holidays: Vec::new(),
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    ///
    /// This is primarily useful for testing or when you want to start with defaults
    /// and then modify specific fields.
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the comma-separated holiday list from the environment value.
    ///
    /// Pieces are trimmed, empty pieces dropped; every remaining piece must be a
    /// valid YYYY-MM-DD date.
    fn parse_holidays(raw: &str) -> AppResult<Vec<NaiveDate>> {
        let mut holidays = Vec::new();
        for piece in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let date = NaiveDate::parse_from_str(piece, DATE_FORMAT_ISO).map_err(|_| {
                AppError::Config(format!(
                    "Invalid holiday date '{}': expected YYYY-MM-DD",
                    piece
                ))
            })?;
            holidays.push(date);
        }
        Ok(holidays)
    }

    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// This method reads configuration from environment variables, with fallbacks
    /// for missing values. It will expand the database path using `shellexpand`
    /// to handle `~` and environment variable references.
    ///
    /// # Environment Variables
    ///
    /// - `DAYBOOK_DB`: Database path (defaults to ~/.daybook/diary.db)
    /// - `DAYBOOK_ADDR`: Server bind address (defaults to 127.0.0.1:3000)
    /// - `DAYBOOK_API_URL`: API base URL for the client (defaults to http://127.0.0.1:3000)
    /// - `DAYBOOK_HOLIDAYS`: Comma-separated YYYY-MM-DD holiday dates
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The database path expansion fails or expands to an empty path
    /// - The bind address does not parse as a socket address
    /// - A holiday date does not parse as YYYY-MM-DD
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use daybook::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Serving on {}", config.bind_addr),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        // Get database path from DAYBOOK_DB env var, fallback to ~/.daybook/diary.db
        let db_path_str = env::var(ENV_VAR_DAYBOOK_DB).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_else(|_| "".to_string());
            format!("{}/{}", home, DEFAULT_DB_SUBPATH)
        });

        // Expand the path (handles ~ and environment variables)
        let expanded_path = shellexpand::full(&db_path_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let db_path = PathBuf::from(expanded_path.into_owned());

        if db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }

        let bind_raw =
            env::var(ENV_VAR_DAYBOOK_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_raw
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid bind address '{}': {}", bind_raw, e)))?;

        let api_url =
            env::var(ENV_VAR_DAYBOOK_API_URL).unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let holidays =
            Config::parse_holidays(&env::var(ENV_VAR_DAYBOOK_HOLIDAYS).unwrap_or_default())?;

        let config = Config {
            db_path,
            bind_addr,
            api_url,
            holidays,
        };

        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// This method checks if the configuration meets the minimum requirements:
    /// - Database path is not empty and is absolute
    /// - API base URL is a http or https URL without a trailing slash issue
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` with one of the following messages:
    /// - "Database path is empty" if the database path is empty
    /// - "Database path must be an absolute path" if the path is relative
    /// - "API URL must start with http:// or https://" for malformed URLs
    ///
    /// # Examples
    ///
    /// ```
    /// use daybook::Config;
    /// use std::net::SocketAddr;
    /// use std::path::PathBuf;
    ///
    /// let valid_config = Config {
    ///     db_path: PathBuf::from("/absolute/diary.db"),
    ///     bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
    ///     api_url: "http://127.0.0.1:3000".to_string(),
    ///     holidays: Vec::new(),
    /// };
    /// assert!(valid_config.validate().is_ok());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }

        if !self.db_path.is_absolute() {
            return Err(AppError::Config(
                "Database path must be an absolute path".to_string(),
            ));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(AppError::Config(
                "API URL must start with http:// or https://".to_string(),
            ));
        }

        Ok(())
    }

    /// The API base URL without any trailing slash, ready for path concatenation.
    pub fn api_base(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn setup() {
        // Clear relevant environment variables before each test
        env::remove_var("DAYBOOK_DB");
        env::remove_var("DAYBOOK_ADDR");
        env::remove_var("DAYBOOK_API_URL");
        env::remove_var("DAYBOOK_HOLIDAYS");
    }

    #[test]
    fn test_debug_impl_redacts_db_path() {
        // Create config with a private path
        let config = Config {
            db_path: PathBuf::from("/home/username/private/diary.db"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_url: "http://127.0.0.1:3000".to_string(),
            holidays: Vec::new(),
        };

        // Format it with debug
        let debug_output = format!("{:?}", config);

        // Verify the path is redacted
        assert!(debug_output.contains("[REDACTED_PATH]"));
        assert!(!debug_output.contains("/home/username/private/diary.db"));
    }

    #[test]
    fn test_new_config_defaults() {
        let config = Config::new();
        assert_eq!(config.db_path, PathBuf::from(""));
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.api_url, "http://127.0.0.1:3000");
        assert!(config.holidays.is_empty());
    }

    #[test]
    #[serial]
    fn test_load_with_defaults() {
        setup();

        // Store original environment variables to restore later
        let orig_home = env::var("HOME").ok();

        env::set_var("HOME", "/tmp");
        let config = Config::load().unwrap();

        // Restore environment
        if let Some(val) = orig_home {
            env::set_var("HOME", val);
        } else {
            env::remove_var("HOME");
        }

        assert_eq!(config.db_path, PathBuf::from("/tmp/.daybook/diary.db"));
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.api_url, "http://127.0.0.1:3000");
        assert!(config.holidays.is_empty());
    }

    #[test]
    #[serial]
    fn test_load_with_custom_env() {
        setup();

        let orig_db = env::var("DAYBOOK_DB").ok();
        let orig_addr = env::var("DAYBOOK_ADDR").ok();
        let orig_url = env::var("DAYBOOK_API_URL").ok();

        env::set_var("DAYBOOK_DB", "/custom/diary.db");
        env::set_var("DAYBOOK_ADDR", "0.0.0.0:8080");
        env::set_var("DAYBOOK_API_URL", "http://example.test:8080");

        let config = Config::load().unwrap();

        // Restore environment
        setup();
        if let Some(val) = orig_db {
            env::set_var("DAYBOOK_DB", val);
        }
        if let Some(val) = orig_addr {
            env::set_var("DAYBOOK_ADDR", val);
        }
        if let Some(val) = orig_url {
            env::set_var("DAYBOOK_API_URL", val);
        }

        assert_eq!(config.db_path, PathBuf::from("/custom/diary.db"));
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.api_url, "http://example.test:8080");
    }

    #[test]
    #[serial]
    fn test_load_with_invalid_bind_addr() {
        setup();

        let orig_addr = env::var("DAYBOOK_ADDR").ok();

        env::set_var("DAYBOOK_ADDR", "not-an-address");
        let result = Config::load();

        // Restore environment
        env::remove_var("DAYBOOK_ADDR");
        if let Some(val) = orig_addr {
            env::set_var("DAYBOOK_ADDR", val);
        }

        assert!(result.is_err());
        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("Invalid bind address")),
            _ => panic!("Expected Config error for invalid bind address"),
        }
    }

    #[test]
    #[serial]
    fn test_load_with_holidays() {
        setup();

        let orig = env::var("DAYBOOK_HOLIDAYS").ok();

        env::set_var("DAYBOOK_HOLIDAYS", " 2025-01-01, 2025-08-15 ,,2025-10-02");
        let config = Config::load().unwrap();

        env::remove_var("DAYBOOK_HOLIDAYS");
        if let Some(val) = orig {
            env::set_var("DAYBOOK_HOLIDAYS", val);
        }

        assert_eq!(
            config.holidays,
            vec![
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 8, 15).unwrap(),
                NaiveDate::from_ymd_opt(2025, 10, 2).unwrap(),
            ]
        );
    }

    #[test]
    #[serial]
    fn test_load_with_invalid_holiday() {
        setup();

        let orig = env::var("DAYBOOK_HOLIDAYS").ok();

        env::set_var("DAYBOOK_HOLIDAYS", "2025-01-01,next tuesday");
        let result = Config::load();

        env::remove_var("DAYBOOK_HOLIDAYS");
        if let Some(val) = orig {
            env::set_var("DAYBOOK_HOLIDAYS", val);
        }

        assert!(result.is_err());
        match result {
            Err(AppError::Config(msg)) => {
                assert!(msg.contains("Invalid holiday date"));
                assert!(msg.contains("next tuesday"));
            }
            _ => panic!("Expected Config error for invalid holiday"),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config {
            db_path: PathBuf::from("/some/diary.db"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_url: "http://127.0.0.1:3000".to_string(),
            holidays: Vec::new(),
        };

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_db_path() {
        let config = Config {
            db_path: PathBuf::from(""),
            ..Config::default()
        };

        let result = config.validate();
        assert!(result.is_err());
        match result {
            Err(AppError::Config(message)) => {
                assert!(message.contains("Database path is empty"));
            }
            _ => panic!("Expected Config error about empty database path"),
        }
    }

    #[test]
    fn test_validate_relative_db_path() {
        let config = Config {
            db_path: PathBuf::from("relative/diary.db"),
            ..Config::default()
        };

        let result = config.validate();
        assert!(result.is_err());
        match result {
            Err(AppError::Config(message)) => {
                assert!(message.contains("must be an absolute path"));
            }
            _ => panic!("Expected Config error about relative path"),
        }
    }

    #[test]
    fn test_validate_malformed_api_url() {
        let config = Config {
            db_path: PathBuf::from("/some/diary.db"),
            api_url: "ftp://example.test".to_string(),
            ..Config::default()
        };

        let result = config.validate();
        assert!(result.is_err());
        match result {
            Err(AppError::Config(message)) => {
                assert!(message.contains("http:// or https://"));
            }
            _ => panic!("Expected Config error about the API URL scheme"),
        }
    }

    #[test]
    fn test_api_base_strips_trailing_slash() {
        let config = Config {
            api_url: "http://127.0.0.1:3000/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.api_base(), "http://127.0.0.1:3000");
    }
}
