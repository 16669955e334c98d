use chrono::{DateTime, SecondsFormat, Utc};

/// 当前 UTC 时间，RFC 3339 毫秒精度，如 `2024-05-01T08:30:00.123Z`
pub fn now_rfc3339_millis() -> String {
    to_rfc3339_millis(Utc::now())
}

pub fn to_rfc3339_millis(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
