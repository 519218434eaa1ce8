use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a CLI range bound.
///
/// A bare date resolves to the start of the day, or to its last second when
/// `end_of_day` is set (so `--to 2024-01-31` covers the whole 31st).
pub fn parse_bound(input: &str, end_of_day: bool) -> AppResult<NaiveDateTime> {
    let s = input.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }

    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidDate(input.to_string()))?;

    let time = if end_of_day {
        NaiveTime::from_hms_opt(23, 59, 59)
    } else {
        NaiveTime::from_hms_opt(0, 0, 0)
    }
    .ok_or_else(|| AppError::InvalidDate(input.to_string()))?;

    Ok(date.and_time(time))
}

pub fn parse_optional_bound(
    input: Option<&str>,
    end_of_day: bool,
) -> AppResult<Option<NaiveDateTime>> {
    input.map(|s| parse_bound(s, end_of_day)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn accepts_space_and_t_separators() {
        assert_eq!(
            parse_bound("2024-01-05 08:30:15", false).unwrap(),
            dt("2024-01-05 08:30:15")
        );
        assert_eq!(
            parse_bound("2024-01-05T08:30", false).unwrap(),
            dt("2024-01-05 08:30:00")
        );
    }

    #[test]
    fn bare_date_expands_to_day_edges() {
        assert_eq!(
            parse_bound("2024-01-31", false).unwrap(),
            dt("2024-01-31 00:00:00")
        );
        assert_eq!(
            parse_bound("2024-01-31", true).unwrap(),
            dt("2024-01-31 23:59:59")
        );
    }

    #[test]
    fn explicit_time_wins_over_end_of_day() {
        assert_eq!(
            parse_bound("2024-01-31 12:00", true).unwrap(),
            dt("2024-01-31 12:00:00")
        );
    }

    #[test]
    fn garbage_is_invalid_date() {
        assert!(matches!(
            parse_bound("31/01/2024", false),
            Err(AppError::InvalidDate(_))
        ));
        assert_eq!(parse_optional_bound(None, true).unwrap(), None);
    }
}
