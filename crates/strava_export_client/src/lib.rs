//! `StravaClient` trait, activity types and the export pipeline building blocks.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub mod config;
pub mod csv_writer;
pub mod date_range;
pub mod export;
pub mod fetcher;
pub mod health;
pub mod http_client;
pub mod projector;
pub mod utils;

#[derive(Debug, Error)]
pub enum StravaError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("invalid date: {0}")]
    InvalidDate(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("rate limit exceeded ({0})")]
    RateLimited(RateLimit),
    #[error("api error: HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("http error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl StravaError {
    /// Map a non-success status code and a body snippet to an error.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => StravaError::Auth(body),
            429 => StravaError::RateLimited(RateLimit::default()),
            _ => StravaError::Api { status, body },
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StravaError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Values of the `X-RateLimit-Limit` / `X-RateLimit-Usage` response headers.
///
/// Strava reports two comma-separated windows: 15 minutes, then daily.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: Option<String>,
    pub usage: Option<String>,
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(limit), Some(usage)) = (self.limit.as_deref(), self.usage.as_deref()) else {
            return f.write_str("limit window unknown");
        };
        let limits: Vec<&str> = limit.split(',').map(str::trim).collect();
        let usages: Vec<&str> = usage.split(',').map(str::trim).collect();
        if limits.len() == 2 && usages.len() == 2 {
            write!(
                f,
                "15-minute window {}/{}, daily window {}/{}",
                usages[0], limits[0], usages[1], limits[1]
            )
        } else {
            write!(f, "usage {usage} of limit {limit}")
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct AthleteProfile {
    pub id: u64,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
}

impl AthleteProfile {
    pub fn display_name(&self) -> String {
        let name = [self.firstname.as_deref(), self.lastname.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            format!("athlete {}", self.id)
        } else {
            name
        }
    }
}

/// One activity as returned by `GET /athlete/activities`.
///
/// Only `id` is guaranteed; everything else depends on the device, the
/// sport and the athlete's privacy settings.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Activity {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub activity_type: Option<String>,
    #[serde(default)]
    pub sport_type: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub start_date_local: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub moving_time: Option<u64>,
    #[serde(default)]
    pub elapsed_time: Option<u64>,
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
    #[serde(default)]
    pub average_speed: Option<f64>,
    #[serde(default)]
    pub max_speed: Option<f64>,
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    #[serde(default)]
    pub max_heartrate: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub average_temp: Option<f64>,
    #[serde(default)]
    pub elev_high: Option<f64>,
    #[serde(default)]
    pub elev_low: Option<f64>,
    #[serde(default)]
    pub pr_count: Option<u32>,
    #[serde(default)]
    pub kudos_count: Option<u32>,
    #[serde(default)]
    pub location_city: Option<String>,
    #[serde(default)]
    pub commute: Option<bool>,
    #[serde(default)]
    pub trainer: Option<bool>,
    #[serde(default)]
    pub manual: Option<bool>,
}

/// Query parameters of `GET /athlete/activities`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityQuery {
    pub after: Option<i64>,
    pub before: Option<i64>,
    pub page: u32,
    pub per_page: u32,
}

impl ActivityQuery {
    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(4);
        if let Some(after) = self.after {
            pairs.push(("after", after.to_string()));
        }
        if let Some(before) = self.before {
            pairs.push(("before", before.to_string()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("per_page", self.per_page.to_string()));
        pairs
    }
}

#[async_trait]
pub trait StravaClient: Send + Sync + 'static {
    /// `GET /athlete`: the athlete owning the access token.
    async fn get_athlete(&self) -> Result<AthleteProfile, StravaError>;

    /// `GET /athlete/activities`: one page of activities, most recent first.
    async fn list_activities(&self, query: &ActivityQuery) -> Result<Vec<Activity>, StravaError>;
}
