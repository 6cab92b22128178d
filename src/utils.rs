use chrono::{DateTime, Utc};

pub const TRENDS_CACHE_KEY: &str = "trends";

/// Format used for every timestamp handed back to API clients
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Generate the cache key for related queries of a keyword
pub fn related_cache_key(keyword: &str) -> String {
    format!("related_{}", keyword)
}

/// Parse timezone string and validate
pub fn parse_timezone(tz_str: &str) -> Result<chrono_tz::Tz, String> {
    tz_str
        .parse::<chrono_tz::Tz>()
        .map_err(|_| format!("Invalid timezone: {}", tz_str))
}

/// Render a UTC instant as local wall-clock time in the given timezone
pub fn format_timestamp(utc_time: DateTime<Utc>, timezone: &str) -> String {
    match parse_timezone(timezone) {
        Ok(tz) => utc_time.with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string(),
        Err(e) => {
            tracing::warn!("{}, falling back to UTC", e);
            utc_time.format(TIMESTAMP_FORMAT).to_string()
        }
    }
}
