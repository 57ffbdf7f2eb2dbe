use chrono::{DateTime, Duration, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Start of the window of `days` days ending at `at`.
pub fn days_before(at: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    at - Duration::days(days)
}
