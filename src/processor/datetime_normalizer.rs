use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;
use regex::Regex;
use tracing::info;

use crate::error::PipelineError;

type DateAttempt = fn(&DatetimeNormalizer, &str) -> Option<NaiveDate>;
type TimeAttempt = fn(&DatetimeNormalizer, &str) -> Option<NaiveTime>;

/// Date parsers tried in order; the first success wins.
const DATE_ATTEMPTS: &[DateAttempt] = &[
    DatetimeNormalizer::date_from_calendar,
    DatetimeNormalizer::date_from_datetime,
    DatetimeNormalizer::date_from_epoch,
];

/// Time parsers tried in order. The three non-clock grammars are mutually
/// exclusive, so only their position after the clock formats matters.
const TIME_ATTEMPTS: &[TimeAttempt] = &[
    DatetimeNormalizer::time_from_clock,
    DatetimeNormalizer::time_from_short_clock,
    DatetimeNormalizer::time_from_epoch,
    DatetimeNormalizer::time_from_meridiem,
    DatetimeNormalizer::time_from_letter_clock,
];

/// Repairs the order-header table: drops rows with missing date or time,
/// then runs every remaining value through the parser cascades above. A
/// non-null value no cascade entry accepts aborts the run.
pub struct DatetimeNormalizer {
    epoch_pattern: Regex,
}

impl DatetimeNormalizer {
    pub fn new() -> Result<Self> {
        Ok(DatetimeNormalizer {
            epoch_pattern: Regex::new(r"^\d+(\.\d+)?$")?,
        })
    }

    pub fn normalize(&self, df: DataFrame) -> Result<DataFrame> {
        let before = df.height();
        let df = df
            .lazy()
            .filter(col("date").is_not_null().and(col("time").is_not_null()))
            .collect()?;
        let dropped = before - df.height();
        if dropped > 0 {
            info!("🧹 Dropped {} orders with missing date or time", dropped);
        }

        let dates = df
            .column("date")?
            .str()?
            .into_no_null_iter()
            .map(|raw| self.repair_date(raw).map(|d| d.format("%Y-%m-%d").to_string()))
            .collect::<Result<Vec<String>, PipelineError>>()?;
        let times = df
            .column("time")?
            .str()?
            .into_no_null_iter()
            .map(|raw| self.repair_time(raw).map(|t| t.format("%H:%M:%S").to_string()))
            .collect::<Result<Vec<String>, PipelineError>>()?;

        let mut df = df;
        df.with_column(Series::new("date".into(), dates))?;
        df.with_column(Series::new("time".into(), times))?;

        let df = df
            .lazy()
            .with_columns([col("order_id").cast(DataType::Int64)])
            .collect()?;
        // ISO strings sort lexicographically in calendar order
        let df = df.sort(
            ["order_id", "date", "time"],
            SortMultipleOptions::default().with_maintain_order(true),
        )?;

        info!("✅ Normalized {} orders", df.height());
        Ok(df)
    }

    /// Date column values carry only their date part forward, even when the
    /// raw value included a time of day.
    pub fn repair_date(&self, raw: &str) -> Result<NaiveDate, PipelineError> {
        DATE_ATTEMPTS
            .iter()
            .find_map(|attempt| attempt(self, raw.trim()))
            .ok_or_else(|| PipelineError::DateTimeExhausted {
                field: "date",
                value: raw.to_string(),
            })
    }

    /// Time column values carry only their time part forward.
    pub fn repair_time(&self, raw: &str) -> Result<NaiveTime, PipelineError> {
        TIME_ATTEMPTS
            .iter()
            .find_map(|attempt| attempt(self, raw.trim()))
            .ok_or_else(|| PipelineError::DateTimeExhausted {
                field: "time",
                value: raw.to_string(),
            })
    }

    fn date_from_calendar(&self, raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }

    fn date_from_datetime(&self, raw: &str) -> Option<NaiveDate> {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
            .ok()
            .map(|dt| dt.date())
    }

    fn date_from_epoch(&self, raw: &str) -> Option<NaiveDate> {
        self.epoch_seconds(raw).map(|dt| dt.date())
    }

    fn time_from_clock(&self, raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw, "%H:%M:%S").ok()
    }

    fn time_from_short_clock(&self, raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw, "%H:%M").ok()
    }

    fn time_from_epoch(&self, raw: &str) -> Option<NaiveTime> {
        self.epoch_seconds(raw).map(|dt| dt.time())
    }

    /// 12-hour clock with meridiem, e.g. "02:15 PM" -> 14:15:00.
    fn time_from_meridiem(&self, raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw, "%I:%M %p").ok()
    }

    /// Letter-suffixed clock, e.g. "02H 15M 00S" -> 02:15:00.
    fn time_from_letter_clock(&self, raw: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(raw, "%HH %MM %SS").ok()
    }

    /// Decimal Unix timestamps, with or without a fractional part. The
    /// pattern gate keeps exotic float spellings (exponents, infinities)
    /// out of the epoch conversion.
    fn epoch_seconds(&self, raw: &str) -> Option<NaiveDateTime> {
        if !self.epoch_pattern.is_match(raw) {
            return None;
        }
        let seconds = raw.parse::<f64>().ok()?;
        DateTime::from_timestamp(seconds as i64, 0).map(|dt| dt.naive_utc())
    }
}
