use crate::constants::{APP_DESCRIPTION, APP_NAME, LOG_FORMAT_JSON, LOG_FORMAT_TEXT};
use chrono::NaiveDate;
use clap::Parser;
use std::str::FromStr;

/// A personal diary with a calendar interface
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Runs the diary API server instead of the calendar client
    #[clap(long, conflicts_with_all = &["date", "api_url"])]
    pub serve: bool,

    /// Bind address for the API server (overrides DAYBOOK_ADDR)
    #[clap(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Base URL of the diary API for the calendar client (overrides DAYBOOK_API_URL)
    #[clap(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Opens the calendar on a specific date (format: YYYY-MM-DD or YYYYMMDD)
    #[clap(short = 'd', long, value_name = "DATE")]
    pub date: Option<String>,

    /// Print verbose output
    #[clap(short = 'v', long)]
    pub verbose: bool,

    /// Log output format
    #[clap(long, value_name = "FORMAT", default_value = LOG_FORMAT_TEXT, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON])]
    pub log_format: String,
}

impl CliArgs {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        CliArgs::parse_from(std::env::args())
    }

    /// Get the date if specified, parsing it into a NaiveDate
    pub fn parse_date(&self) -> Option<Result<NaiveDate, chrono::ParseError>> {
        self.date.as_ref().map(|date_str| {
            // Try parsing in YYYY-MM-DD format first
            NaiveDate::from_str(date_str).or_else(|_| {
                // Try parsing in YYYYMMDD format if the first format failed
                NaiveDate::parse_from_str(date_str, "%Y%m%d")
            })
        })
    }
}
