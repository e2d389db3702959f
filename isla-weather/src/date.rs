//! Resolution of the date expressions a traveller (or the model) may use.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{Result, WeatherError};

/// Resolve `expression` to a calendar date relative to `today`.
///
/// Accepts ISO `YYYY-MM-DD` plus English and Spanish relative forms:
/// `today`/`hoy`, `tomorrow`/`mañana`, `day after tomorrow`/`pasado mañana`,
/// `weekend`/`fin de semana` and `in N days`/`en N días`, optionally preceded
/// by `this`, `este` or `el`.
pub fn resolve_date(expression: &str, today: NaiveDate) -> Result<NaiveDate> {
    let normalized = expression.trim().to_lowercase();
    let normalized = normalized
        .strip_prefix("this ")
        .or_else(|| normalized.strip_prefix("este "))
        .or_else(|| normalized.strip_prefix("el "))
        .unwrap_or(&normalized);

    if let Ok(date) = NaiveDate::parse_from_str(normalized, "%Y-%m-%d") {
        return Ok(date);
    }

    let offset = match normalized {
        "today" | "hoy" => 0,
        "day after tomorrow" | "pasado mañana" | "pasado manana" => 2,
        "tomorrow" | "mañana" | "manana" => 1,
        "weekend" | "fin de semana" => days_until_weekend(today),
        other => days_offset(other).ok_or_else(|| WeatherError::InvalidFormat(expression.trim().to_string()))?,
    };

    // beyond the calendar means beyond any forecast window
    Ok(today.checked_add_signed(Duration::days(offset)).unwrap_or(NaiveDate::MAX))
}

/// Zero on Saturday or Sunday, otherwise the distance to the coming Saturday.
fn days_until_weekend(today: NaiveDate) -> i64 {
    match today.weekday() {
        Weekday::Sat | Weekday::Sun => 0,
        day => i64::from(Weekday::Sat.num_days_from_monday() - day.num_days_from_monday()),
    }
}

/// Parse `in N days` / `en N días`.
fn days_offset(expression: &str) -> Option<i64> {
    let rest = expression.strip_prefix("in ").or_else(|| expression.strip_prefix("en "))?;
    let (count, unit) = rest.split_once(' ')?;
    if !matches!(unit, "day" | "days" | "día" | "días" | "dia" | "dias") {
        return None;
    }
    count.parse::<u32>().ok().map(i64::from)
}

/// Check that `date` lies within `[today, today + max_days]`.
pub fn validate_window(date: NaiveDate, today: NaiveDate, max_days: u32) -> Result<()> {
    if date < today {
        return Err(WeatherError::InPast);
    }
    if (date - today).num_days() > i64::from(max_days) {
        return Err(WeatherError::TooFar { max_days });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // a Monday
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn relative_expressions() {
        let today = monday();
        assert_eq!(resolve_date("hoy", today).unwrap(), today);
        assert_eq!(resolve_date("  Tomorrow ", today).unwrap(), today + Duration::days(1));
        assert_eq!(resolve_date("mañana", today).unwrap(), today + Duration::days(1));
        assert_eq!(resolve_date("pasado mañana", today).unwrap(), today + Duration::days(2));
        assert_eq!(resolve_date("en 3 días", today).unwrap(), today + Duration::days(3));
        assert_eq!(resolve_date("in 1 day", today).unwrap(), today + Duration::days(1));
    }

    #[test]
    fn weekend_is_next_saturday_or_today() {
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
        assert_eq!(resolve_date("este fin de semana", monday()).unwrap(), saturday);
        assert_eq!(resolve_date("weekend", saturday).unwrap(), saturday);
        let sunday = saturday + Duration::days(1);
        assert_eq!(resolve_date("this weekend", sunday).unwrap(), sunday);
    }

    #[test]
    fn article_prefix_is_ignored() {
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
        assert_eq!(resolve_date("el fin de semana", monday()).unwrap(), saturday);
        assert_eq!(resolve_date("El fin de semana", monday()).unwrap(), saturday);
    }

    #[test]
    fn huge_offsets_are_too_far_not_malformed() {
        let today = monday();
        let date = resolve_date("en 4000000000 días", today).unwrap();
        assert_eq!(validate_window(date, today, 7), Err(WeatherError::TooFar { max_days: 7 }));
    }

    #[test]
    fn iso_dates_pass_through() {
        let date = resolve_date("2026-10-22", monday()).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 10, 22).unwrap());
    }

    #[test]
    fn unknown_expressions_are_invalid() {
        for input in ["22/10/2026", "next month", "en muchos días", ""] {
            assert!(matches!(resolve_date(input, monday()), Err(WeatherError::InvalidFormat(_))), "{input}");
        }
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let today = monday();
        assert!(validate_window(today, today, 7).is_ok());
        assert!(validate_window(today + Duration::days(7), today, 7).is_ok());
        assert_eq!(validate_window(today + Duration::days(8), today, 7), Err(WeatherError::TooFar { max_days: 7 }));
        assert_eq!(validate_window(today - Duration::days(1), today, 7), Err(WeatherError::InPast));
    }
}
