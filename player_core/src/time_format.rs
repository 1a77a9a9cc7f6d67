// MM:SS labels for the current-time and duration displays.

/// Formats seconds as `MM:SS`: both parts floored and zero padded to two
/// digits, minutes unbounded. An unknown time renders `NaN:NaN`, which is
/// what the page shows before `loadedmetadata`. An unbounded duration (live
/// streams report `Infinity`) renders `Infinity:NaN`.
pub fn format_time(seconds: f64) -> String {
    if seconds.is_nan() {
        return "NaN:NaN".to_string();
    }
    if seconds.is_infinite() {
        let sign = if seconds < 0.0 { "-" } else { "" };
        return format!("{}Infinity:NaN", sign);
    }
    let minutes = (seconds / 60.0).floor() as i64;
    let secs = (seconds % 60.0).floor() as i64;
    format!("{:02}:{:02}", minutes, secs)
}
