//! Free-text date/time input for booking forms, plus the time grid used by
//! schedule pickers.
//!
//! Accepted forms (case-insensitive):
//! - `now`, `today`, `tomorrow`, `yesterday`
//! - `monday` .. `sunday` (today or later), `next friday` (strictly after today)
//! - `in 30 minutes`, `in 2 hours`, `in 3 days`, `in 1 week`
//! - `2024-06-01`, `2024-06-01 10:00`, `2024-06-01T10:00[:00]`
//! - any day form followed by an optional `at` and a time:
//!   `3pm`, `3:30 pm`, `15:00`, `noon`, `midnight`
//! - a time alone, meaning today
//!
//! Day forms without a time resolve to noon.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2}))?\s*(am|pm)?$").expect("time regex is valid")
});

static RELATIVE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^in\s+(\d+)\s*(minutes?|mins?|hours?|hrs?|days?|weeks?)$").expect("relative regex is valid")
});

const ISO_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Parse `input` relative to `now`. Returns `None` when nothing matches.
pub fn parse_datetime(input: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let text = input.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    if text.is_empty() {
        return None;
    }
    if text == "now" {
        return Some(now);
    }

    let iso = text.to_uppercase();
    if let Some(dt) = ISO_DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(&iso, f).ok())
    {
        return Some(dt);
    }

    if let Some(caps) = RELATIVE_REGEX.captures(&text) {
        let amount: i64 = caps[1].parse().ok()?;
        let unit = &caps[2];
        let offset = match unit.chars().next() {
            Some('m') => Duration::try_minutes(amount)?,
            Some('h') => Duration::try_hours(amount)?,
            Some('d') => Duration::try_days(amount)?,
            Some('w') => Duration::try_weeks(amount)?,
            _ => return None,
        };
        return now.checked_add_signed(offset);
    }

    if let Some(time) = parse_time(&text) {
        return Some(now.date().and_time(time));
    }

    let (day, rest) = parse_day(&text, now.date())?;
    let rest = rest.trim();
    let rest = rest.strip_prefix("at ").unwrap_or(rest).trim();
    let time = if rest.is_empty() {
        default_time()
    } else {
        parse_time(rest)?
    };
    Some(day.and_time(time))
}

/// Leading day expression and whatever follows it
fn parse_day(text: &str, today: NaiveDate) -> Option<(NaiveDate, &str)> {
    if let Some((date, rest)) = text.split_once(|c: char| c == ' ' || c == 't') {
        if let Ok(date) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            return Some((date, rest));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some((date, ""));
    }

    let (first, rest) = text.split_once(' ').unwrap_or((text, ""));
    match first {
        "today" => Some((today, rest)),
        "tomorrow" => Some((today.succ_opt()?, rest)),
        "yesterday" => Some((today.pred_opt()?, rest)),
        "next" => {
            let (name, rest) = rest.split_once(' ').unwrap_or((rest, ""));
            let weekday = parse_weekday(name)?;
            Some((upcoming(today, weekday, true), rest))
        }
        name => {
            let weekday = parse_weekday(name)?;
            Some((upcoming(today, weekday, false), rest))
        }
    }
}

fn parse_weekday(name: &str) -> Option<Weekday> {
    let weekday = match name {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// Next date falling on `weekday`. Today counts unless `strictly_after`.
fn upcoming(today: NaiveDate, weekday: Weekday, strictly_after: bool) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let target = weekday.num_days_from_monday() as i64;
    let mut ahead = (target - current).rem_euclid(7);
    if ahead == 0 && strictly_after {
        ahead = 7;
    }
    today + Duration::days(ahead)
}

/// `3pm`, `3:30 pm`, `12am`, `15:00`, `noon`, `midnight`
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim().to_lowercase();
    match text.as_str() {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        _ => {}
    }

    let caps = TIME_REGEX.captures(&text)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    let hour = match caps.get(3).map(|m| m.as_str()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (meridiem, hour) {
                ("am", 12) => 0,
                ("am", h) => h,
                ("pm", 12) => 12,
                (_, h) => h + 12,
            }
        }
        // A bare number is too ambiguous; 24h input needs the minutes
        None if caps.get(2).is_none() => return None,
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Index of the grid slot containing `time`
pub fn slot_index(time: NaiveTime, step_minutes: u32) -> usize {
    if step_minutes == 0 {
        return 0;
    }
    let minutes = time.hour() * 60 + time.minute();
    (minutes / step_minutes) as usize
}

/// Start time of slot `index`, `None` past the end of the day
pub fn slot_time(index: usize, step_minutes: u32) -> Option<NaiveTime> {
    let minutes = u32::try_from(index).ok()?.checked_mul(step_minutes)?;
    if step_minutes == 0 || minutes >= 24 * 60 {
        return None;
    }
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Every slot start in a day
pub fn time_slots(step_minutes: u32) -> Vec<NaiveTime> {
    (0..)
        .map_while(|index| slot_time(index, step_minutes))
        .collect()
}
