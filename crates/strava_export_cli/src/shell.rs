//! The menu-driven exporter as an explicit state machine.
//!
//! Each [`ShellState`] is handled by one method that prompts, prints and
//! returns the next state; [`Shell::run`] loops until `Done`.

use chrono::NaiveDate;
use console::style;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use strava_export_client::config::Config;
use strava_export_client::csv_writer::{ExportResult, downloads_dir, resolve_output_path};
use strava_export_client::date_range::{DateRange, Preset};
use strava_export_client::export::{ExportOptions, fetch_activities, write_activities};
use strava_export_client::projector::project_all;
use strava_export_client::{Activity, StravaClient, StravaError};

use crate::error::CliResult;
use crate::prompt::Prompter;
use crate::render::{PREVIEW_ROWS, column_list, preview_table};

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Exported(ExportResult),
    Quit,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ShellState {
    SelectRange,
    Fetching(DateRange),
    Preview {
        range: DateRange,
        activities: Vec<Activity>,
    },
    ExportConfirm {
        range: DateRange,
        activities: Vec<Activity>,
    },
    Done(Outcome),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuItem {
    Preset(Preset),
    CustomDays,
    CustomDates,
    Quit,
}

const MENU: [MenuItem; 7] = [
    MenuItem::Preset(Preset::Last7Days),
    MenuItem::Preset(Preset::ThisWeek),
    MenuItem::Preset(Preset::ThisMonth),
    MenuItem::Preset(Preset::AllTime),
    MenuItem::CustomDays,
    MenuItem::CustomDates,
    MenuItem::Quit,
];

impl MenuItem {
    fn label(self) -> &'static str {
        match self {
            MenuItem::Preset(preset) => preset.label(),
            MenuItem::CustomDays => "Custom days",
            MenuItem::CustomDates => "Custom dates",
            MenuItem::Quit => "Quit",
        }
    }
}

/// Where and how the shell exports.
#[derive(Clone, Debug)]
pub struct ShellSettings {
    pub export: ExportOptions,
    pub output_dir: PathBuf,
}

impl ShellSettings {
    /// The configured profile and directory; Downloads when none is set.
    pub fn from_config(config: &Config) -> Self {
        Self {
            export: ExportOptions {
                profile: config.profile,
                ..Default::default()
            },
            output_dir: config.output_dir.clone().unwrap_or_else(downloads_dir),
        }
    }
}

/// Ask for a filename in `dir`, offering `default`. Returns `None` when
/// the file exists and the user declines to overwrite it.
pub(crate) fn choose_destination<P: Prompter>(
    prompter: &mut P,
    dir: &Path,
    default: &str,
) -> io::Result<Option<PathBuf>> {
    let name = prompter.input("Filename", Some(default))?;
    let name = if name.trim().is_empty() {
        default
    } else {
        name.as_str()
    };
    let path = resolve_output_path(dir, name);
    if path.exists() {
        let overwrite =
            prompter.confirm(&format!("{} exists. Overwrite?", path.display()), false)?;
        if !overwrite {
            return Ok(None);
        }
    }
    Ok(Some(path))
}

pub struct Shell<'a, P, W> {
    client: &'a dyn StravaClient,
    prompter: P,
    out: W,
    settings: ShellSettings,
    today: NaiveDate,
}

impl<'a, P: Prompter, W: Write> Shell<'a, P, W> {
    pub fn new(
        client: &'a dyn StravaClient,
        prompter: P,
        out: W,
        settings: ShellSettings,
        today: NaiveDate,
    ) -> Self {
        Self {
            client,
            prompter,
            out,
            settings,
            today,
        }
    }

    pub fn into_parts(self) -> (P, W) {
        (self.prompter, self.out)
    }

    pub async fn run(&mut self) -> CliResult<Outcome> {
        writeln!(self.out, "{}", style("Strava Activity Exporter").bold())?;
        writeln!(self.out, "Use the arrow keys to choose, Enter to confirm.")?;
        let mut state = ShellState::SelectRange;
        loop {
            state = match state {
                ShellState::Done(outcome) => return Ok(outcome),
                other => self.step(other).await?,
            };
        }
    }

    /// Handle one state and return the next.
    pub async fn step(&mut self, state: ShellState) -> CliResult<ShellState> {
        tracing::debug!("shell state: {}", state_name(&state));
        match state {
            ShellState::SelectRange => self.select_range(),
            ShellState::Fetching(range) => self.fetch(range).await,
            ShellState::Preview { range, activities } => self.preview(range, activities),
            ShellState::ExportConfirm { range, activities } => {
                self.confirm_export(range, activities)
            }
            done @ ShellState::Done(_) => Ok(done),
        }
    }

    fn select_range(&mut self) -> CliResult<ShellState> {
        let today = self.today;
        let labels: Vec<&str> = MENU.iter().map(|item| item.label()).collect();
        let choice = self.prompter.select("Select a date range", &labels, 0)?;
        let range = match MENU.get(choice).copied().unwrap_or(MenuItem::Quit) {
            MenuItem::Preset(preset) => Ok(preset.resolve(today)),
            MenuItem::CustomDays => {
                let answer = self.prompter.input("Number of days back", None)?;
                let answer = answer.trim();
                answer
                    .parse::<u32>()
                    .map_err(|_| {
                        StravaError::InvalidDate(format!("'{answer}' is not a number of days"))
                    })
                    .and_then(|days| DateRange::days_back(days, today))
            }
            MenuItem::CustomDates => {
                let start = self.prompter.input("Start date (YYYY-MM-DD)", None)?;
                let end = self
                    .prompter
                    .input("End date (YYYY-MM-DD, Enter for today)", None)?;
                DateRange::parse(&start, Some(end.as_str()), today)
            }
            MenuItem::Quit => return Ok(ShellState::Done(Outcome::Quit)),
        };
        match range {
            Ok(range) => Ok(ShellState::Fetching(range)),
            Err(e) => {
                writeln!(self.out, "{} {e}", style("✗").red())?;
                Ok(ShellState::SelectRange)
            }
        }
    }

    async fn fetch(&mut self, range: DateRange) -> CliResult<ShellState> {
        writeln!(self.out, "Fetching activities from {range}...")?;
        self.out.flush()?;
        let activities = fetch_activities(self.client, &range, &self.settings.export).await?;
        if activities.is_empty() {
            writeln!(self.out, "No activities found for {range}.")?;
            return Ok(ShellState::SelectRange);
        }
        Ok(ShellState::Preview { range, activities })
    }

    fn preview(&mut self, range: DateRange, activities: Vec<Activity>) -> CliResult<ShellState> {
        let profile = self.settings.export.profile;
        let rows = project_all(&activities, profile);
        writeln!(self.out)?;
        writeln!(
            self.out,
            "{}",
            style(format!("{} Activities", activities.len())).bold()
        )?;
        writeln!(self.out, "{range} ({} days)", range.num_days())?;
        writeln!(self.out)?;
        writeln!(self.out, "Columns ({profile} profile):")?;
        write!(self.out, "{}", column_list(profile))?;
        writeln!(self.out)?;
        write!(self.out, "{}", preview_table(&rows, profile, PREVIEW_ROWS))?;
        writeln!(self.out)?;

        let choice = self
            .prompter
            .select("What next?", &["Export CSV", "Back"], 0)?;
        Ok(if choice == 0 {
            ShellState::ExportConfirm { range, activities }
        } else {
            ShellState::SelectRange
        })
    }

    fn confirm_export(
        &mut self,
        range: DateRange,
        activities: Vec<Activity>,
    ) -> CliResult<ShellState> {
        let default = range.default_filename();
        let Some(path) =
            choose_destination(&mut self.prompter, &self.settings.output_dir, &default)?
        else {
            return Ok(ShellState::ExportConfirm { range, activities });
        };
        let result = write_activities(&path, self.settings.export.profile, &activities)?;
        writeln!(
            self.out,
            "{} Exported {} activities to {}",
            style("✓").green(),
            result.row_count,
            result.file_path.display()
        )?;
        Ok(ShellState::Done(Outcome::Exported(result)))
    }
}

fn state_name(state: &ShellState) -> &'static str {
    match state {
        ShellState::SelectRange => "select-range",
        ShellState::Fetching(_) => "fetching",
        ShellState::Preview { .. } => "preview",
        ShellState::ExportConfirm { .. } => "export-confirm",
        ShellState::Done(_) => "done",
    }
}
