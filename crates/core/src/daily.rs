//! Weekday volume rollup over stock records.
//!
//! Every stock record lands in the bucket of the weekday its `Date` falls
//! on, regardless of week or year. The output always has seven entries,
//! Mon through Sun.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::record::{Stock, StockFields};

/// Bucket order of the series.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Weight credited for a record whose `Weight` is missing or zero.
///
/// NOTE: a genuine zero-weight delivery is also counted as 60. Kept because
/// the dashboard numbers have always been computed this way.
pub const FALLBACK_WEIGHT: f64 = 60.0;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%a %b %d %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// One point of the weekday series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyVolume {
    pub day: String,
    pub volume: f64,
}

/// Parse a stock `Date` string into a UTC calendar date.
///
/// Returns `None` for anything that is not a recognizable date; such records
/// are left out of the rollup.
pub fn parse_stock_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

impl StockFields {
    /// Weight this record contributes to its weekday bucket.
    pub fn effective_weight(&self) -> f64 {
        match self.weight {
            Some(w) if w != 0.0 && !w.is_nan() => w,
            _ => FALLBACK_WEIGHT,
        }
    }

    pub fn weekday(&self) -> Option<Weekday> {
        self.date.as_deref().and_then(parse_stock_date).map(|d| d.weekday())
    }
}

/// Sum stock weight per weekday.
pub fn daily_volume<'a, I>(stocks: I) -> Vec<DailyVolume>
where
    I: IntoIterator<Item = &'a Stock>,
{
    let mut totals = [0.0_f64; 7];

    for stock in stocks {
        let Some(day) = stock.fields.weekday() else {
            continue;
        };
        totals[day.num_days_from_monday() as usize] += stock.fields.effective_weight();
    }

    WEEK.iter()
        .zip(totals)
        .map(|(day, volume)| DailyVolume {
            day: day.to_string(),
            volume,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn stock(date: Option<&str>, weight: Option<f64>) -> Stock {
        Stock {
            id: Uuid::new_v4(),
            fields: StockFields {
                date: date.map(str::to_string),
                weight,
                ..StockFields::default()
            },
        }
    }

    fn volume_of(series: &[DailyVolume], day: &str) -> f64 {
        series.iter().find(|d| d.day == day).map(|d| d.volume).unwrap()
    }

    #[test]
    fn test_empty_input_is_seven_zeros() {
        let series = daily_volume(&Vec::<Stock>::new());
        let days: Vec<&str> = series.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        assert!(series.iter().all(|d| d.volume == 0.0));
    }

    #[test]
    fn test_monday_weight_accumulates() {
        let series = daily_volume(&[stock(Some("2024-01-01"), Some(100.0))]);
        assert_eq!(volume_of(&series, "Mon"), 100.0);
        assert_eq!(series.iter().map(|d| d.volume).sum::<f64>(), 100.0);
    }

    #[test]
    fn test_zero_weight_uses_fallback() {
        let series = daily_volume(&[stock(Some("2024-01-01"), Some(0.0))]);
        assert_eq!(volume_of(&series, "Mon"), 60.0);
    }

    #[test]
    fn test_missing_weight_uses_fallback() {
        let series = daily_volume(&[stock(Some("2024-01-07"), None)]);
        assert_eq!(volume_of(&series, "Sun"), 60.0);
    }

    #[test]
    fn test_unparseable_date_is_skipped() {
        let series = daily_volume(&[
            stock(Some(""), Some(100.0)),
            stock(Some("not a date"), Some(100.0)),
            stock(None, Some(100.0)),
        ]);
        assert_eq!(series.len(), 7);
        assert!(series.iter().all(|d| d.volume == 0.0));
    }

    #[test]
    fn test_weeks_collapse_into_weekday() {
        // 2024-01-02 and 2024-03-05 are both Tuesdays.
        let series = daily_volume(&[
            stock(Some("2024-01-02"), Some(10.0)),
            stock(Some("2024-03-05"), Some(15.5)),
            stock(Some("2024-01-06"), Some(1.0)),
        ]);
        assert_eq!(volume_of(&series, "Tue"), 25.5);
        assert_eq!(volume_of(&series, "Sat"), 1.0);
        assert_eq!(volume_of(&series, "Mon"), 0.0);
    }

    #[test]
    fn test_parse_stock_date_formats() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for raw in [
            "2024-01-01",
            " 2024-01-01 ",
            "2024/01/01",
            "01/01/2024",
            "2024-1-1",
            "2024-01-01T10:30:00Z",
            "2024-01-01T10:30:00.250Z",
            "2024-01-01T10:30",
            "2024-01-01 23:59:59",
            "Mon, 01 Jan 2024 08:00:00 +0000",
            "Mon Jan 01 2024",
            "Jan 01 2024",
            "January 1, 2024",
            "01 Jan 2024",
        ] {
            assert_eq!(parse_stock_date(raw), Some(monday), "failed on {raw:?}");
        }
    }

    #[test]
    fn test_offset_datetime_is_read_in_utc() {
        // 01:00 on Tuesday in +05:30 is still Monday in UTC.
        let date = parse_stock_date("2024-01-02T01:00:00+05:30").unwrap();
        assert_eq!(date.weekday(), Weekday::Mon);
    }

    #[test]
    fn test_parse_stock_date_rejects_garbage() {
        assert_eq!(parse_stock_date(""), None);
        assert_eq!(parse_stock_date("   "), None);
        assert_eq!(parse_stock_date("2024-13-01"), None);
        assert_eq!(parse_stock_date("yesterday"), None);
    }

    #[test]
    fn test_effective_weight() {
        assert_eq!(stock(None, Some(42.0)).fields.effective_weight(), 42.0);
        assert_eq!(stock(None, Some(-5.0)).fields.effective_weight(), -5.0);
        assert_eq!(stock(None, Some(f64::NAN)).fields.effective_weight(), FALLBACK_WEIGHT);
    }
}
