/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Start of the current UTC day in milliseconds
pub fn start_of_day_millis(now_millis: i64) -> i64 {
    const DAY_MS: i64 = 86_400_000;
    now_millis - now_millis.rem_euclid(DAY_MS)
}

/// Start of the current UTC month in milliseconds
pub fn start_of_month_millis(now_millis: i64) -> i64 {
    use chrono::{Datelike, TimeZone, Utc};
    let Some(now) = Utc.timestamp_millis_opt(now_millis).single() else {
        return start_of_day_millis(now_millis);
    };
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| start_of_day_millis(now_millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_of_day() {
        // 2024-03-15 13:45:10 UTC
        let ts = 1_710_510_310_000;
        assert_eq!(start_of_day_millis(ts), 1_710_460_800_000);
    }

    #[test]
    fn test_start_of_month() {
        // 2024-03-15 13:45:10 UTC -> 2024-03-01 00:00:00 UTC
        let ts = 1_710_510_310_000;
        assert_eq!(start_of_month_millis(ts), 1_709_251_200_000);
    }
}
