//! Resolution of user date tokens into concrete, inclusive calendar ranges.

use crate::StravaError;
use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, TimeZone};
use std::fmt;
use std::str::FromStr;

/// "This month" is a rolling window, not the calendar month.
pub const THIS_MONTH_DAYS: u32 = 30;
/// Practical ceiling for "all time" so the query stays bounded.
pub const ALL_TIME_DAYS: u32 = 3650;
pub const MAX_DAYS_BACK: u32 = 36_500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    Last7Days,
    ThisWeek,
    ThisMonth,
    AllTime,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Last7Days,
        Preset::ThisWeek,
        Preset::ThisMonth,
        Preset::AllTime,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Preset::Last7Days => "Last 7 Days",
            Preset::ThisWeek => "This Week",
            Preset::ThisMonth => "This Month",
            Preset::AllTime => "All Time",
        }
    }

    /// Every preset ends today.
    pub fn resolve(self, today: NaiveDate) -> DateRange {
        let start = match self {
            Preset::Last7Days => days_before(today, 7),
            // Monday of the current week
            Preset::ThisWeek => days_before(today, today.weekday().num_days_from_monday()),
            Preset::ThisMonth => days_before(today, THIS_MONTH_DAYS),
            Preset::AllTime => days_before(today, ALL_TIME_DAYS),
        };
        DateRange { start, end: today }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        let key: String = word
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "last7" | "last7days" | "lastweek" | "week7" => Some(Preset::Last7Days),
            "thisweek" | "week" => Some(Preset::ThisWeek),
            "thismonth" | "month" | "last30" | "last30days" => Some(Preset::ThisMonth),
            "alltime" | "all" => Some(Preset::AllTime),
            _ => None,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn days_before(day: NaiveDate, n: u32) -> NaiveDate {
    day.checked_sub_days(Days::new(n.into()))
        .unwrap_or(NaiveDate::MIN)
}

/// What the user typed: an explicit start date, a preset or a day count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeSpec {
    Since(NaiveDate),
    Preset(Preset),
    DaysBack(u32),
}

impl FromStr for RangeSpec {
    type Err = StravaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(StravaError::InvalidDate("empty date input".into()));
        }
        if let Ok(n) = s.parse::<u32>() {
            return Ok(RangeSpec::DaysBack(n));
        }
        if let Some(preset) = Preset::from_keyword(s) {
            return Ok(RangeSpec::Preset(preset));
        }
        parse_date(s).map(RangeSpec::Since)
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, StravaError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        StravaError::InvalidDate(format!("'{}' is not a date in YYYY-MM-DD form", s.trim()))
    })
}

/// Today's date on the local wall clock.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Inclusive calendar interval; `start <= end` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, StravaError> {
        if start > end {
            return Err(StravaError::InvalidDate(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days` calendar days before `today`, through `today`.
    pub fn days_back(days: u32, today: NaiveDate) -> Result<Self, StravaError> {
        if days == 0 || days > MAX_DAYS_BACK {
            return Err(StravaError::InvalidDate(format!(
                "day count must be between 1 and {MAX_DAYS_BACK}, got {days}"
            )));
        }
        Ok(Self {
            start: days_before(today, days),
            end: today,
        })
    }

    /// Resolve a spec; `end` only applies to an explicit start date and
    /// defaults to `today`.
    pub fn resolve(
        spec: RangeSpec,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, StravaError> {
        match spec {
            RangeSpec::Since(start) => Self::new(start, end.unwrap_or(today)),
            RangeSpec::Preset(preset) => Ok(preset.resolve(today)),
            RangeSpec::DaysBack(days) => Self::days_back(days, today),
        }
    }

    /// Parse and resolve in one step, as the prompts do.
    pub fn parse(start: &str, end: Option<&str>, today: NaiveDate) -> Result<Self, StravaError> {
        let spec: RangeSpec = start.parse()?;
        let end = match end.map(str::trim).filter(|e| !e.is_empty()) {
            Some(e) => Some(parse_date(e)?),
            None => None,
        };
        Self::resolve(spec, end, today)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// `(after, before)` epoch seconds: midnight at `start` and midnight
    /// after `end`, both in `tz`.
    pub fn epoch_bounds_in<Tz: TimeZone>(&self, tz: &Tz) -> (i64, i64) {
        let after = midnight_epoch(tz, self.start);
        let before = midnight_epoch(tz, self.end.succ_opt().unwrap_or(self.end));
        (after, before)
    }

    pub fn epoch_bounds(&self) -> (i64, i64) {
        self.epoch_bounds_in(&Local)
    }

    pub fn default_filename(&self) -> String {
        format!(
            "strava_{}_{}.csv",
            self.start.format("%Y%m%d"),
            self.end.format("%Y%m%d")
        )
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

fn midnight_epoch<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> i64 {
    let naive: NaiveDateTime = day.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| naive.and_utc().timestamp())
}
