use serde_json::Value;
use time::macros::format_description;
use time::OffsetDateTime;

/// Epoch seconds from a `created_utc`-style value.
/// Older dumps store it as a string, some as a float; both are accepted.
/// Fractional seconds are floored, so pre-epoch values land on the earlier day.
pub fn epoch_seconds(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.floor() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.floor() as i64))
        }
        _ => None,
    }
}

/// `YYYY-MM-DD` of an epoch-seconds timestamp, interpreted as UTC.
pub fn utc_date(ts: i64) -> Option<String> {
    let dt = OffsetDateTime::from_unix_timestamp(ts).ok()?;
    dt.date().format(format_description!("[year]-[month]-[day]")).ok()
}

/// Derived `date` cell for a record's `created_utc`: NULL if absent or unparseable.
pub fn date_cell(created_utc: &Value) -> Value {
    epoch_seconds(created_utc)
        .and_then(utc_date)
        .map(Value::String)
        .unwrap_or(Value::Null)
}
