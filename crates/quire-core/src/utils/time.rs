use chrono::{SecondsFormat, Utc};

/// Current time as an RFC 3339 timestamp, the format stored in `updated_at`.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
