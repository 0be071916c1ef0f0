//! Token and connectivity checks that never touch the export path.

use crate::{Activity, ActivityQuery, AthleteProfile, StravaClient, StravaError};
use chrono::{Days, NaiveDate};

/// Window probed by [`check_activities_access`].
pub const ACTIVITY_PROBE_DAYS: u64 = 90;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionStatus {
    Ok(AthleteProfile),
    AuthFailed(String),
    Unreachable(String),
}

impl ConnectionStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ConnectionStatus::Ok(_))
    }

    fn from_error(e: StravaError) -> Self {
        match e {
            StravaError::Auth(body) => ConnectionStatus::AuthFailed(body),
            other => ConnectionStatus::Unreachable(other.to_string()),
        }
    }
}

/// One `GET /athlete` call: is the token accepted and the API reachable?
pub async fn check_connection(client: &dyn StravaClient) -> ConnectionStatus {
    match client.get_athlete().await {
        Ok(athlete) => {
            tracing::debug!("token accepted for athlete {}", athlete.id);
            ConnectionStatus::Ok(athlete)
        }
        Err(e) => {
            tracing::debug!("athlete check failed: {}", e);
            ConnectionStatus::from_error(e)
        }
    }
}

/// Result of probing the activities endpoint.
#[derive(Clone, Debug, PartialEq)]
pub enum ActivityAccess {
    /// The endpoint answered; `sample` is the most recent activity, if any.
    Ok { sample: Option<Activity> },
    AuthFailed(String),
    Unreachable(String),
}

/// Request a single activity from the last 90 days to confirm the token
/// carries activity read scope.
pub async fn check_activities_access(
    client: &dyn StravaClient,
    today: NaiveDate,
) -> ActivityAccess {
    let after = today
        .checked_sub_days(Days::new(ACTIVITY_PROBE_DAYS))
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp());
    let query = ActivityQuery {
        after,
        before: None,
        page: 1,
        per_page: 1,
    };
    match client.list_activities(&query).await {
        Ok(mut page) => ActivityAccess::Ok {
            sample: if page.is_empty() {
                None
            } else {
                Some(page.swap_remove(0))
            },
        },
        Err(StravaError::Auth(body)) => ActivityAccess::AuthFailed(body),
        Err(e) => ActivityAccess::Unreachable(e.to_string()),
    }
}
