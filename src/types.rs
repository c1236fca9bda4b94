use serde_json::Value;
use structopt::StructOpt;
use thiserror::Error;

#[derive(Debug, StructOpt)]
#[structopt(about = "Query a currency exchange service and save rate snapshots as JSON")]
pub struct Opt {
    #[structopt(long = "from", help = "Currency to convert FROM (e.g. USD, EUR, RON, UAH)")]
    pub currency_from: Option<String>,

    #[structopt(long = "to", help = "Currency to convert TO (e.g. USD, EUR, RON, UAH)")]
    pub currency_to: Option<String>,

    #[structopt(long, help = "Date in format YYYY-MM-DD (single-query mode)")]
    pub date: Option<String>,

    #[structopt(long, help = "Start date in format YYYY-MM-DD (batch mode)")]
    pub start_date: Option<String>,

    #[structopt(long, help = "End date in format YYYY-MM-DD (batch mode)")]
    pub end_date: Option<String>,

    #[structopt(long, help = "Number of evenly spaced dates to query (>= 2, batch mode)")]
    pub num_dates: Option<i64>,

    #[structopt(
        long,
        env = "API_BASE_URL",
        default_value = "http://localhost:8080",
        help = "Service base URL"
    )]
    pub base_url: String,

    #[structopt(
        long,
        env = "API_KEY",
        hide_env_values = true,
        default_value = "EXAMPLE_API_KEY",
        help = "API key sent as form field 'key'"
    )]
    pub api_key: String,

    #[structopt(
        long,
        help = "Warn when a date is outside the advised data range 2025-01-01..2025-09-15"
    )]
    pub warn_outside_range: bool,
}

/// What went wrong with one query. `InvalidArgument` is always raised
/// before any network traffic for that query.
#[derive(Debug, Error, PartialEq)]
pub enum FetchError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {status}. Details: {details}")]
    Http { status: u16, details: String },

    #[error("{0}")]
    Protocol(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("{0}")]
    Io(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Performs the actual service call; the pipeline takes it as a value so
/// tests can substitute canned responses.
pub type ServiceCall = fn(url: &str, api_key: &str) -> FetchResult<Value>;
