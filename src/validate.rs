use chrono::naive::NaiveDate;

use crate::types::{FetchError, FetchResult};

//window the service is known to hold data for; queries outside it are
//allowed, we only warn when asked to
pub const ADVISED_MIN: &str = "2025-01-01";
pub const ADVISED_MAX: &str = "2025-09-15";

/*
 * Normalize a user-supplied currency code: trim, uppercase, and require
 * exactly three alphabetic characters. `field` names the flag in error
 * messages ("From", "To").
 */
pub fn validate_currency(code: &str, field: &str) -> FetchResult<String> {
    if code.is_empty() {
        return Err(FetchError::InvalidArgument(format!(
            "{} currency is required.",
            field
        )));
    }
    let code = code.trim().to_uppercase();
    if code.chars().count() != 3 || !code.chars().all(char::is_alphabetic) {
        return Err(FetchError::InvalidArgument(format!(
            "{} must be a 3-letter code (got '{}').",
            field, code
        )));
    }
    Ok(code)
}

/*
 * Parse a strict YYYY-MM-DD date. Anything else, including trailing
 * garbage, is an InvalidArgument naming `field`.
 */
pub fn parse_date(date_str: &str, field: &str) -> FetchResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|_| {
        FetchError::InvalidArgument(format!(
            "{} must be in YYYY-MM-DD format (got '{}').",
            field, date_str
        ))
    })
}

/*
 * Produce up to n evenly spaced dates across start..=end inclusive.
 *
 * Offsets are rounded per index (no accumulation), then the first and last
 * entries are forced back to the exact endpoints so rounding drift can
 * never drop them. Consecutive repeats that rounding produces collapse to
 * one entry, so the result can be shorter than n; it is always ascending
 * and always contains both endpoints.
 */
pub fn evenly_spaced_dates(start: NaiveDate, end: NaiveDate, n: i64) -> FetchResult<Vec<NaiveDate>> {
    if n < 2 {
        return Err(FetchError::InvalidArgument(
            "num-dates must be >= 2".to_string(),
        ));
    }
    let delta_days = end.signed_duration_since(start).num_days();
    if delta_days < 0 {
        return Err(FetchError::InvalidArgument(
            "end-date must be on or after start-date".to_string(),
        ));
    }

    let mut dates = if n == 2 {
        vec![start, end]
    } else {
        let step = delta_days as f64 / (n - 1) as f64;
        let mut dates = Vec::with_capacity(n as usize);
        for i in 0..n {
            let offset = (i as f64 * step).round() as i64;
            dates.push(start + chrono::Duration::days(offset));
        }
        dates[0] = start;
        let last = dates.len() - 1;
        dates[last] = end;
        dates
    };

    //offsets are nondecreasing, so every repeat is consecutive
    dates.dedup();
    Ok(dates)
}

pub fn outside_advised_range(date: NaiveDate) -> bool {
    let min = NaiveDate::from_ymd_opt(2025, 1, 1).expect("static date");
    let max = NaiveDate::from_ymd_opt(2025, 9, 15).expect("static date");
    date < min || date > max
}
