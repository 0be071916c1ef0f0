//! Configuration → date range → fetch → project → write, end to end.

use crate::csv_writer::{ExportResult, write_csv};
use crate::date_range::DateRange;
use crate::fetcher::{ActivityFetcher, FetchOptions};
use crate::projector::{ExportProfile, project_all};
use crate::{Activity, StravaClient, StravaError};
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub profile: ExportProfile,
    pub fetch: FetchOptions,
}

/// Fetch every activity in `range`.
pub async fn fetch_activities(
    client: &dyn StravaClient,
    range: &DateRange,
    options: &ExportOptions,
) -> Result<Vec<Activity>, StravaError> {
    ActivityFetcher::new(client)
        .with_options(options.fetch.clone())
        .fetch_range(range)
        .await
}

/// Project already-fetched activities and write them to `path`.
pub fn write_activities(
    path: &Path,
    profile: ExportProfile,
    activities: &[Activity],
) -> Result<ExportResult, StravaError> {
    let rows = project_all(activities, profile);
    write_csv(path, profile, &rows)
}

/// Run the whole pipeline. Nothing is written unless every page was fetched.
pub async fn export_activities(
    client: &dyn StravaClient,
    range: &DateRange,
    options: &ExportOptions,
    path: &Path,
) -> Result<ExportResult, StravaError> {
    let activities = fetch_activities(client, range, options).await?;
    write_activities(path, options.profile, &activities)
}
