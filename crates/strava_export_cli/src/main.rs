use std::process::ExitCode;

use strava_export_cli::{CliResult, DialoguerPrompter, Outcome, Shell, ShellSettings};
use strava_export_client::config::Config;
use strava_export_client::date_range::today;
use strava_export_client::http_client::ReqwestStravaClient;

async fn run() -> CliResult<Outcome> {
    let config = Config::load()?;
    let client = ReqwestStravaClient::from_config(&config)?;
    let settings = ShellSettings::from_config(&config);
    tracing::info!(
        "exporting to {} with the {} profile",
        settings.output_dir.display(),
        settings.export.profile
    );

    let mut shell = Shell::new(
        &client,
        DialoguerPrompter::default(),
        std::io::stdout(),
        settings,
        today(),
    );
    shell.run().await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    strava_export_cli::logging::init_tracing();

    match run().await {
        Ok(Outcome::Exported(result)) => {
            tracing::info!("exported {} rows", result.row_count);
            ExitCode::SUCCESS
        }
        Ok(Outcome::Quit) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::from(e.exit_code())
        }
    }
}
