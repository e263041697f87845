//! 时间工具函数 — 日期/时段解析
//!
//! 店铺营业时间与预约时间统一为 `HH:MM` 字符串，日期为 `YYYY-MM-DD`。
//! 解析在 API handler 层完成，booking 引擎只接收 `NaiveTime` / `NaiveDate`。

use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// 解析时段字符串 (HH:MM)
///
/// Accepts `HH:MM:SS` too (database TIME defaults) — seconds are dropped.
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    let hhmm = time.get(..5).unwrap_or(time);
    NaiveTime::parse_from_str(hhmm, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time format: {time}")))
}

/// 格式化为 HH:MM
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// 格式化为 YYYY-MM-DD
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 当前营业时区的日期 (YYYY-MM-DD)
pub fn today(tz: Tz) -> NaiveDate {
    chrono::Utc::now().with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dates_and_times() {
        assert!(parse_date("2025-03-01").is_ok());
        assert!(parse_date("01/03/2025").is_err());
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        // seconds are dropped
        assert_eq!(
            parse_time("09:30:00").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("9h30").is_err());
    }

    #[test]
    fn formats_back_to_hhmm() {
        let t = NaiveTime::from_hms_opt(7, 5, 0).unwrap();
        assert_eq!(format_time(t), "07:05");
    }
}
