//! Calendar helpers: clocks, local dates and Portuguese month names.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

/// Source of the current instant.
///
/// Weekly windows are anchored at "now", and monthly planning falls back to
/// the current year; both read it through this trait so tests can pin it.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Portuguese name of `month` (1-12).
pub fn month_name(month: u32) -> &'static str {
    match month {
        1..=12 => MONTH_NAMES[(month - 1) as usize],
        _ => "?",
    }
}

/// Resolves a wall-clock time in `tz`.
///
/// Times skipped by a DST jump move forward one hour; ambiguous times take
/// the earlier instant.
pub fn local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive).earliest() {
        Some(dt) => dt,
        None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

fn local_date(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    local(tz, date.and_time(NaiveTime::MIN))
}

/// Midnight of the first day of `month` in `year`.
pub fn month_start(tz: Tz, year: i32, month: u32) -> Option<DateTime<Tz>> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| local_date(tz, d))
}

/// Midnight of the first day of the month after `month`.
pub fn next_month_start(tz: Tz, year: i32, month: u32) -> Option<DateTime<Tz>> {
    if month >= 12 {
        month_start(tz, year + 1, 1)
    } else {
        month_start(tz, year, month + 1)
    }
}

/// Midnight of January 1st of `year`.
pub fn year_start(tz: Tz, year: i32) -> Option<DateTime<Tz>> {
    month_start(tz, year, 1)
}

/// December 31st, 23:59:59 of `year`.
pub fn year_end(tz: Tz, year: i32) -> Option<DateTime<Tz>> {
    NaiveDate::from_ymd_opt(year, 12, 31)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|naive| local(tz, naive))
}
