//! Line-by-line extractor: ask for dates, fetch, ask for a filename, write.

use chrono::NaiveDate;
use console::style;
use std::io::Write;

use strava_export_client::StravaClient;
use strava_export_client::csv_writer::ExportResult;
use strava_export_client::date_range::{DateRange, RangeSpec};
use strava_export_client::export::{fetch_activities, write_activities};

use crate::error::CliResult;
use crate::prompt::Prompter;
use crate::shell::{ShellSettings, choose_destination};

fn ask_range<P: Prompter, W: Write>(
    prompter: &mut P,
    out: &mut W,
    today: NaiveDate,
) -> CliResult<DateRange> {
    loop {
        let start = prompter.input(
            "Start date (YYYY-MM-DD, a number of days, or 'last7')",
            None,
        )?;
        // Only an explicit start date takes an end date.
        let end = match start.parse::<RangeSpec>() {
            Ok(RangeSpec::Since(_)) => {
                Some(prompter.input("End date (YYYY-MM-DD, Enter for today)", None)?)
            }
            _ => None,
        };
        match DateRange::parse(&start, end.as_deref(), today) {
            Ok(range) => return Ok(range),
            Err(e) => writeln!(out, "{} {e}", style("✗").red())?,
        }
    }
}

/// Run the extractor once. An empty range still produces a header-only
/// file.
pub async fn run_extract<P: Prompter, W: Write>(
    client: &dyn StravaClient,
    prompter: &mut P,
    out: &mut W,
    settings: &ShellSettings,
    today: NaiveDate,
) -> CliResult<ExportResult> {
    writeln!(out, "{}", style("Strava Activity Extractor").bold())?;
    let range = ask_range(prompter, out, today)?;

    writeln!(out, "Fetching activities from {range}...")?;
    out.flush()?;
    let activities = fetch_activities(client, &range, &settings.export).await?;
    if activities.is_empty() {
        writeln!(out, "No activities found for {range}; the file will only have a header.")?;
    } else {
        writeln!(out, "Found {} activities", activities.len())?;
    }

    let default = range.default_filename();
    let path = loop {
        if let Some(path) = choose_destination(prompter, &settings.output_dir, &default)? {
            break path;
        }
    };
    let result = write_activities(&path, settings.export.profile, &activities)?;
    writeln!(
        out,
        "{} Exported {} activities to {}",
        style("✓").green(),
        result.row_count,
        result.file_path.display()
    )?;
    Ok(result)
}
