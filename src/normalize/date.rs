//! Day-first date parsing

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Parse a date cell, reading ambiguous numeric dates day first.
///
/// Accepted shapes, each optionally followed by a time of day that is
/// discarded:
/// - `D/M/Y`, `D.M.Y`, `D-M-Y` with a two- or four-digit year
/// - `Y-M-D`, `Y/M/D`, `Y.M.D` when the first component has four digits
/// - any of `extra_formats`, tried in order as a date and then as a datetime
pub fn parse_day_first(raw: &str, extra_formats: &[String]) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(date) = parse_numeric(value) {
        return Some(date);
    }

    extra_formats.iter().find_map(|format| {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(value, format)
                    .ok()
                    .map(|dt| dt.date())
            })
    })
}

fn parse_numeric(value: &str) -> Option<NaiveDate> {
    let (date_part, time_part) = match value.find(|c: char| c == ' ' || c == 'T') {
        Some(pos) => (&value[..pos], Some(value[pos + 1..].trim())),
        None => (value, None),
    };

    if let Some(time) = time_part {
        if !is_time_of_day(time) {
            return None;
        }
    }

    let parts: Vec<&str> = date_part
        .split(|c: char| matches!(c, '/' | '.' | '-'))
        .collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    let (year, month, day) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else {
        (parts[2], parts[1], parts[0])
    };

    if day.len() > 2 || month.len() > 2 {
        return None;
    }

    NaiveDate::from_ymd_opt(expand_year(year)?, month.parse().ok()?, day.parse().ok()?)
}

// Two-digit years pivot the same way chrono's `%y` does.
fn expand_year(year: &str) -> Option<i32> {
    let value: i32 = year.parse().ok()?;
    match year.len() {
        4 => Some(value),
        2 if value < 70 => Some(2000 + value),
        2 => Some(1900 + value),
        _ => None,
    }
}

fn is_time_of_day(time: &str) -> bool {
    if time.is_empty() {
        return true;
    }
    let Some(time) = strip_zone(time) else {
        return false;
    };
    ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"]
        .iter()
        .any(|format| NaiveTime::parse_from_str(time, format).is_ok())
}

// The zone is dropped along with the time; the calendar date is kept as written.
fn strip_zone(time: &str) -> Option<&str> {
    if let Some(rest) = time.strip_suffix('Z') {
        return Some(rest.trim_end());
    }
    match time.rfind(|c: char| c == '+' || c == '-') {
        Some(pos) if is_utc_offset(&time[pos + 1..]) => Some(time[..pos].trim_end()),
        Some(_) => None,
        None => Some(time),
    }
}

/// `HH`, `HHMM` or `HH:MM`
fn is_utc_offset(offset: &str) -> bool {
    if !offset.is_ascii() {
        return false;
    }
    let (hours, minutes) = match offset.len() {
        2 => (offset, "00"),
        4 => offset.split_at(2),
        5 if offset.as_bytes()[2] == b':' => (&offset[..2], &offset[3..]),
        _ => return false,
    };
    if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!(
        (hours.parse::<u32>(), minutes.parse::<u32>()),
        (Ok(h), Ok(m)) if h <= 23 && m <= 59
    )
}
