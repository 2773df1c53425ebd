//! Calendar date helpers shared by queries, layout and views.
//!
//! # Responsibility
//! - Serialize and parse fixed-width `YYYY-MM-DD` date keys.
//! - Compute Monday-start weeks and month grid offsets.
//! - Produce the English labels shown in widget headings.
//!
//! # Invariants
//! - Date keys are always zero-padded, so lexicographic order equals
//!   chronological order.
//! - `week_anchor` always returns a Monday.
//! - Week math is checked: dates whose week leaves chrono's range yield
//!   `None` instead of panicking.

use chrono::{Datelike, Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date key regex"));

/// Returns the English ordinal suffix for `n` (`st`, `nd`, `rd`, `th`).
///
/// 11, 12 and 13 take `th` before the last-digit rule applies.
pub fn ordinal_suffix(n: u32) -> &'static str {
    if (11..=13).contains(&n) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Formats a calendar date as a `YYYY-MM-DD` key.
pub fn to_date_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parses a strict `YYYY-MM-DD` key.
///
/// Returns `None` for anything that is not a zero-padded, existing date.
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    if !DATE_KEY_RE.is_match(key) {
        return None;
    }
    NaiveDate::parse_from_str(key, "%Y-%m-%d").ok()
}

/// Weekday index with 0 = Sunday through 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Returns the Monday that starts the week containing `date`.
///
/// Sunday belongs to the week that started six days earlier. `None` only
/// when that Monday precedes `NaiveDate::MIN`.
pub fn week_anchor(date: NaiveDate) -> Option<NaiveDate> {
    let back = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(u64::from(back)))
}

/// Number of days in `month` (1-12) of `year`.
///
/// Returns `None` for an out-of-range month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next_first.signed_duration_since(first).num_days()).ok()
}

/// Monday-based column (0-6) of the first day of `month` in `year`.
pub fn month_start_offset(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some((weekday_index(first) + 6) % 7)
}

/// "Today, June 9th 2025"
pub fn format_full_today(date: NaiveDate) -> String {
    format!(
        "Today, {} {}{} {}",
        date.format("%B"),
        date.day(),
        ordinal_suffix(date.day()),
        date.year()
    )
}

/// "Monday, 9th"
pub fn format_short_today(date: NaiveDate) -> String {
    format!(
        "{}, {}{}",
        date.format("%A"),
        date.day(),
        ordinal_suffix(date.day())
    )
}

/// "Monday the 9th", naming the Monday that anchors the week of `date`.
pub fn week_of_label(date: NaiveDate) -> Option<String> {
    week_anchor(date).map(monday_label)
}

fn monday_label(monday: NaiveDate) -> String {
    format!("Monday the {}{}", monday.day(), ordinal_suffix(monday.day()))
}

/// Seven consecutive days starting on a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Week {
    days: [NaiveDate; 7],
}

impl Week {
    /// Builds the Monday-start week that contains `date`.
    ///
    /// `None` when any day of that week falls outside chrono's date range.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        let monday = week_anchor(date)?;
        let mut days = [monday; 7];
        for index in 1..days.len() {
            days[index] = days[index - 1].succ_opt()?;
        }
        Some(Self { days })
    }

    /// Parses a week from seven ordered date keys.
    ///
    /// Returns `None` when any key is malformed or the days are not
    /// consecutive.
    pub fn from_keys(keys: &[&str; 7]) -> Option<Self> {
        let mut days = [NaiveDate::MIN; 7];
        for (slot, key) in days.iter_mut().zip(keys) {
            *slot = parse_date_key(key)?;
        }
        let consecutive = days
            .windows(2)
            .all(|pair| pair[0].succ_opt() == Some(pair[1]));
        consecutive.then_some(Self { days })
    }

    pub fn days(&self) -> &[NaiveDate; 7] {
        &self.days
    }

    pub fn start(&self) -> NaiveDate {
        self.days[0]
    }

    pub fn end(&self) -> NaiveDate {
        self.days[6]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start() <= date && date <= self.end()
    }

    /// Column index (0-6) of `date`, or `None` outside this week.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.days.iter().position(|day| *day == date)
    }

    pub fn keys(&self) -> [String; 7] {
        self.days.map(to_date_key)
    }

    /// Heading for the week strip, e.g. "Monday the 9th".
    pub fn label(&self) -> String {
        monday_label(self.start())
    }
}
