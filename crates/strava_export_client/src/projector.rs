//! Projection of raw activities onto the fixed CSV column sets.

use crate::utils::{date_only, iso_timestamp, round2};
use crate::{Activity, StravaError};
use std::fmt;
use std::str::FromStr;

/// Type label shown next to each column in the preview screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
    Date,
}

impl ColumnKind {
    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Text => "string",
            ColumnKind::Date => "date",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn col(name: &'static str, kind: ColumnKind) -> Column {
    Column { name, kind }
}

const COMPACT_COLUMNS: [Column; 10] = [
    col("id", ColumnKind::Integer),
    col("name", ColumnKind::Text),
    col("type", ColumnKind::Text),
    col("date", ColumnKind::Date),
    col("distance_km", ColumnKind::Float),
    col("moving_time_s", ColumnKind::Integer),
    col("elapsed_time_s", ColumnKind::Integer),
    col("elevation_gain_m", ColumnKind::Float),
    col("average_speed_kmh", ColumnKind::Float),
    col("average_hr", ColumnKind::Float),
];

const DETAILED_COLUMNS: [Column; 14] = [
    col("id", ColumnKind::Integer),
    col("name", ColumnKind::Text),
    col("distance", ColumnKind::Float),
    col("moving_time", ColumnKind::Float),
    col("elapsed_time", ColumnKind::Integer),
    col("total_elevation_gain", ColumnKind::Float),
    col("start_date", ColumnKind::Date),
    col("average_speed", ColumnKind::Float),
    col("max_speed", ColumnKind::Float),
    col("average_temp", ColumnKind::Float),
    col("elev_high", ColumnKind::Float),
    col("elev_low", ColumnKind::Float),
    col("calories", ColumnKind::Float),
    col("pr_count", ColumnKind::Integer),
];

/// Named CSV schema.
///
/// `Compact` keeps moving time in seconds and a date-only timestamp;
/// `Detailed` reports moving time in minutes and the full start timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportProfile {
    Compact,
    #[default]
    Detailed,
}

impl ExportProfile {
    pub fn columns(self) -> &'static [Column] {
        match self {
            ExportProfile::Compact => &COMPACT_COLUMNS,
            ExportProfile::Detailed => &DETAILED_COLUMNS,
        }
    }

    pub fn header(self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.name).collect()
    }

    pub fn name(self) -> &'static str {
        match self {
            ExportProfile::Compact => "compact",
            ExportProfile::Detailed => "detailed",
        }
    }
}

impl fmt::Display for ExportProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportProfile {
    type Err = StravaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" | "10" => Ok(ExportProfile::Compact),
            "detailed" | "14" => Ok(ExportProfile::Detailed),
            other => Err(StravaError::Config(format!(
                "unknown export profile '{other}' (expected compact or detailed)"
            ))),
        }
    }
}

/// A single CSV cell.
///
/// Every integer column (ids, durations, counts) is non-negative, so `Int`
/// holds a `u64` and Strava ids are written exactly.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Int(u64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Int(v) => write!(f, "{v}"),
            // Whole floats keep their decimal point so float columns read as floats.
            Cell::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<Option<f64>> for Cell {
    fn from(v: Option<f64>) -> Self {
        v.map(Cell::Float).unwrap_or(Cell::Empty)
    }
}

impl From<Option<u64>> for Cell {
    fn from(v: Option<u64>) -> Self {
        v.map(Cell::Int).unwrap_or(Cell::Empty)
    }
}

impl From<Option<u32>> for Cell {
    fn from(v: Option<u32>) -> Self {
        v.map(|n| Cell::Int(n.into())).unwrap_or(Cell::Empty)
    }
}

impl From<Option<String>> for Cell {
    fn from(v: Option<String>) -> Self {
        v.map(Cell::Text).unwrap_or(Cell::Empty)
    }
}

/// One projected activity; cells follow the profile's column order.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityRow {
    cells: Vec<Cell>,
}

impl ActivityRow {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn to_record(&self) -> Vec<String> {
        self.cells.iter().map(ToString::to_string).collect()
    }

    /// Cell for a column name, if the row's profile has that column.
    pub fn get(&self, profile: ExportProfile, column: &str) -> Option<&Cell> {
        profile
            .columns()
            .iter()
            .position(|c| c.name == column)
            .and_then(|i| self.cells.get(i))
    }
}

fn km(meters: Option<f64>) -> Option<f64> {
    meters.map(|m| round2(m / 1000.0))
}

fn kmh(speed_ms: Option<f64>) -> Option<f64> {
    speed_ms.map(|v| round2(v * 3.6))
}

fn minutes(seconds: Option<u64>) -> Option<f64> {
    seconds.map(|s| round2(s as f64 / 60.0))
}

/// Project a raw activity onto the columns of `profile`.
///
/// Missing upstream values become empty cells.
pub fn project(activity: &Activity, profile: ExportProfile) -> ActivityRow {
    let a = activity;
    let start = a.start_date.as_deref();
    let cells = match profile {
        ExportProfile::Compact => vec![
            Cell::Int(a.id),
            a.name.clone().into(),
            a.activity_type.clone().or_else(|| a.sport_type.clone()).into(),
            start.and_then(date_only).into(),
            km(a.distance).into(),
            a.moving_time.into(),
            a.elapsed_time.into(),
            a.total_elevation_gain.into(),
            kmh(a.average_speed).into(),
            a.average_heartrate.into(),
        ],
        ExportProfile::Detailed => vec![
            Cell::Int(a.id),
            a.name.clone().into(),
            km(a.distance).into(),
            minutes(a.moving_time).into(),
            a.elapsed_time.into(),
            a.total_elevation_gain.into(),
            start.and_then(iso_timestamp).into(),
            kmh(a.average_speed).into(),
            kmh(a.max_speed).into(),
            a.average_temp.into(),
            a.elev_high.into(),
            a.elev_low.into(),
            a.calories.into(),
            a.pr_count.into(),
        ],
    };
    debug_assert_eq!(cells.len(), profile.columns().len());
    ActivityRow { cells }
}

pub fn project_all(activities: &[Activity], profile: ExportProfile) -> Vec<ActivityRow> {
    activities.iter().map(|a| project(a, profile)).collect()
}
