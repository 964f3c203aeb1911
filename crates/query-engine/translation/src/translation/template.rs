//! Time range macros.
//!
//! A query may reference the dashboard time range through `$__timeFrom()` and
//! `$__timeTo()`. Both are replaced textually by a quoted UTC timestamp, so
//! that `ts BETWEEN $__timeFrom() AND $__timeTo()` becomes
//! `ts BETWEEN '2024-01-01T00:00:00Z' AND '2024-01-01T06:00:00Z'`.
//! No other escaping is applied to the query text.

use chrono::{DateTime, SecondsFormat, Utc};

use super::query::TimeRange;

pub const TIME_FROM_MACRO: &str = "$__timeFrom()";
pub const TIME_TO_MACRO: &str = "$__timeTo()";

/// Format a timestamp as a SQL string literal.
pub fn time_literal(time: &DateTime<Utc>) -> String {
    format!("'{}'", time.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Replace every occurrence of the time range macros in `sql`.
pub fn interpolate(sql: &str, time_range: &TimeRange) -> String {
    sql.replace(TIME_FROM_MACRO, &time_literal(&time_range.from))
        .replace(TIME_TO_MACRO, &time_literal(&time_range.to))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use similar_asserts::assert_eq;

    use super::*;

    fn time_range() -> TimeRange {
        TimeRange {
            from: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            to: Utc.with_ymd_and_hms(2024, 3, 1, 16, 30, 15).unwrap(),
        }
    }

    #[test]
    fn replaces_both_macros() {
        let sql = interpolate(
            "SELECT * FROM v0 where ts BETWEEN $__timeFrom() AND $__timeTo() LIMIT 10",
            &time_range(),
        );
        assert_eq!(
            sql,
            "SELECT * FROM v0 where ts BETWEEN '2024-03-01T10:00:00Z' AND '2024-03-01T16:30:15Z' LIMIT 10"
        );
    }

    #[test]
    fn replaces_every_occurrence_identically() {
        let sql = interpolate(
            "$__timeFrom() $__timeTo() $__timeFrom() $__timeTo() $__timeFrom()",
            &time_range(),
        );
        let from = "'2024-03-01T10:00:00Z'";
        let to = "'2024-03-01T16:30:15Z'";
        assert_eq!(sql, format!("{from} {to} {from} {to} {from}"));
    }

    #[test]
    fn normalizes_to_utc_and_drops_subseconds() {
        let offset = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        let from = offset
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
            + chrono::Duration::milliseconds(250);
        assert_eq!(time_literal(&from), "'2024-03-01T10:00:00Z'");
    }

    #[test]
    fn leaves_text_without_macros_alone() {
        let sql = "SELECT '$__timeFrom' FROM v0";
        assert_eq!(interpolate(sql, &time_range()), sql);
    }
}
