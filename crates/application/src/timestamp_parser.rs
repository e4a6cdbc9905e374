//! Local departure timestamp parsing
//!
//! The departure API reports naive wall-clock times in the operator's zone.
//! They are localized here into zone-aware instants.

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use domain::Timezone;
use tracing::debug;

use crate::error::ApplicationError;

/// Accepted naive date-time layouts; `%.f` also matches no fraction
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a naive ISO-8601 local timestamp and localize it to `timezone`
///
/// Daylight-saving edges resolve to standard time: the repeated hour when
/// clocks go back takes the later (standard) offset, and a wall-clock time
/// inside the spring-forward gap is kept as written with the offset in force
/// before the gap.
///
/// # Errors
///
/// Returns [`ApplicationError::TimestampParseFailure`] if the input is not an
/// ISO-8601 date or date-time without offset.
pub fn parse_local_timestamp(
    raw: &str,
    timezone: Timezone,
) -> Result<DateTime<FixedOffset>, ApplicationError> {
    let naive = parse_naive(raw.trim()).ok_or_else(|| ApplicationError::TimestampParseFailure {
        value: raw.to_string(),
        reason: "expected ISO-8601 local date-time without offset".to_string(),
    })?;

    let tz = timezone.tz();
    let localized = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt.fixed_offset()),
        LocalResult::Ambiguous(_, standard) => Some(standard.fixed_offset()),
        LocalResult::None => {
            debug!(%naive, zone = %timezone, "Local time falls in a DST gap");
            tz.from_local_datetime(&(naive - Duration::hours(1)))
                .earliest()
                .map(|before| *before.fixed_offset().offset())
                .and_then(|offset| offset.from_local_datetime(&naive).single())
        },
    };

    localized
        .ok_or_else(|| ApplicationError::TimestampParseFailure {
            value: raw.to_string(),
            reason: format!("time does not exist in {timezone}"),
        })
}

fn parse_naive(input: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}
