use std::path::PathBuf;
use std::process::ExitCode;

use strava_export_cli::extract::run_extract;
use strava_export_cli::{CliResult, DialoguerPrompter, ShellSettings};
use strava_export_client::config::Config;
use strava_export_client::csv_writer::ExportResult;
use strava_export_client::date_range::today;
use strava_export_client::http_client::ReqwestStravaClient;

async fn run() -> CliResult<ExportResult> {
    let config = Config::load()?;
    let client = ReqwestStravaClient::from_config(&config)?;
    // The extractor writes next to where it was started unless told otherwise.
    let settings = ShellSettings {
        output_dir: config.output_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
        ..ShellSettings::from_config(&config)
    };

    let mut prompter = DialoguerPrompter::default();
    let mut out = std::io::stdout();
    run_extract(&client, &mut prompter, &mut out, &settings, today()).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    strava_export_cli::logging::init_tracing();

    match run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::from(e.exit_code())
        }
    }
}
