//! Human-readable connection report for `strava-check`.

use chrono::NaiveDate;
use console::style;
use std::io::{self, Write};

use strava_export_client::StravaClient;
use strava_export_client::health::{
    ACTIVITY_PROBE_DAYS, ActivityAccess, ConnectionStatus, check_activities_access,
    check_connection,
};

/// Exit status when a check fails.
pub const EXIT_CHECK_FAILED: u8 = 3;

/// Run both checks, printing one line per result. `Ok(true)` when all
/// passed; the activity probe is skipped when the token is rejected.
pub async fn run_checks<W: Write>(
    client: &dyn StravaClient,
    out: &mut W,
    today: NaiveDate,
) -> io::Result<bool> {
    let ok = style("✓").green();
    let failed = style("✗").red();

    writeln!(out, "Checking Strava API connection...")?;
    match check_connection(client).await {
        ConnectionStatus::Ok(athlete) => writeln!(
            out,
            "{ok} Token accepted for {} (athlete {})",
            athlete.display_name(),
            athlete.id
        )?,
        ConnectionStatus::AuthFailed(reason) => {
            writeln!(out, "{failed} Token rejected: {reason}")?;
            writeln!(
                out,
                "  Generate a new access token and update STRAVA_ACCESS_TOKEN in .env."
            )?;
            return Ok(false);
        }
        ConnectionStatus::Unreachable(reason) => {
            writeln!(out, "{failed} Strava API unreachable: {reason}")?;
            return Ok(false);
        }
    }

    writeln!(
        out,
        "Checking activity access (last {ACTIVITY_PROBE_DAYS} days)..."
    )?;
    match check_activities_access(client, today).await {
        ActivityAccess::Ok { sample: Some(activity) } => {
            writeln!(
                out,
                "{ok} Activity access OK, most recent: {} ({})",
                activity.name.as_deref().unwrap_or("unnamed"),
                activity.start_date.as_deref().unwrap_or("no date")
            )?;
            Ok(true)
        }
        ActivityAccess::Ok { sample: None } => {
            writeln!(
                out,
                "{ok} Activity access OK, no activities in the last {ACTIVITY_PROBE_DAYS} days"
            )?;
            Ok(true)
        }
        ActivityAccess::AuthFailed(reason) => {
            writeln!(out, "{failed} Activity access denied: {reason}")?;
            writeln!(out, "  The token needs the activity:read_all scope.")?;
            Ok(false)
        }
        ActivityAccess::Unreachable(reason) => {
            writeln!(out, "{failed} Activity check failed: {reason}")?;
            Ok(false)
        }
    }
}
