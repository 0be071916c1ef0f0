//! Paginated retrieval of the athlete's activities.

use crate::date_range::DateRange;
use crate::{Activity, ActivityQuery, StravaClient, StravaError};

/// Largest page the activities endpoint serves.
pub const PAGE_SIZE: u32 = 200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchOptions {
    /// Clamped to `1..=PAGE_SIZE`.
    pub per_page: u32,
    /// Stop once this many activities have been collected.
    pub max_activities: Option<usize>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            per_page: PAGE_SIZE,
            max_activities: None,
        }
    }
}

pub struct ActivityFetcher<'a> {
    client: &'a dyn StravaClient,
    options: FetchOptions,
}

impl<'a> ActivityFetcher<'a> {
    pub fn new(client: &'a dyn StravaClient) -> Self {
        Self {
            client,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    /// Fetch every activity that started inside `range` (local time).
    pub async fn fetch_range(&self, range: &DateRange) -> Result<Vec<Activity>, StravaError> {
        let (after, before) = range.epoch_bounds();
        tracing::info!("fetching activities from {} (after={}, before={})", range, after, before);
        self.fetch_between(Some(after), Some(before)).await
    }

    /// Request pages 1, 2, ... until a page comes back shorter than
    /// `per_page`. Results keep the endpoint's order (most recent first).
    ///
    /// A failing page fails the whole fetch; pages already collected are
    /// dropped with it.
    pub async fn fetch_between(
        &self,
        after: Option<i64>,
        before: Option<i64>,
    ) -> Result<Vec<Activity>, StravaError> {
        let per_page = self.options.per_page.clamp(1, PAGE_SIZE);
        let mut activities: Vec<Activity> = Vec::new();
        let mut page = 1u32;

        loop {
            let query = ActivityQuery {
                after,
                before,
                page,
                per_page,
            };
            let batch = self.client.list_activities(&query).await.map_err(|e| {
                tracing::warn!("page {} failed, discarding {} activities: {}", page, activities.len(), e);
                e
            })?;
            let received = batch.len();
            activities.extend(batch);
            tracing::debug!(
                "page {}: {} activities (total {})",
                page,
                received,
                activities.len()
            );

            if let Some(max) = self.options.max_activities {
                if activities.len() >= max {
                    activities.truncate(max);
                    break;
                }
            }
            if received < per_page as usize {
                break;
            }
            page += 1;
        }

        tracing::info!("fetched {} activities in {} page(s)", activities.len(), page);
        Ok(activities)
    }
}
