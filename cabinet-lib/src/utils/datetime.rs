use chrono::{Duration, NaiveDate, NaiveDateTime};

pub fn get_utc_iso_datetime() -> String {
    let timestamp = chrono::Utc::now().to_rfc3339();
    return timestamp;
}

/// Render an Excel serial date (days since 1899-12-30, fraction = time of day)
/// as `YYYY-MM-DDTHH:MM:SS`
pub fn excel_serial_to_iso(value: f64) -> String {
    let days = value.trunc() as i64;
    let seconds = ((value - days as f64) * 86400.0).round() as i64;
    let datetime = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|base| base.and_hms_opt(0, 0, 0))
        .and_then(|base: NaiveDateTime| base.checked_add_signed(Duration::days(days)))
        .and_then(|base| base.checked_add_signed(Duration::seconds(seconds)));

    match datetime {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        // Out of chrono's range; keep the raw serial so nothing is lost
        None => value.to_string(),
    }
}
