use std::process::ExitCode;

use strava_export_cli::report::{EXIT_CHECK_FAILED, run_checks};
use strava_export_cli::{CliError, CliResult};
use strava_export_client::config::Config;
use strava_export_client::date_range::today;
use strava_export_client::http_client::ReqwestStravaClient;

async fn run() -> CliResult<bool> {
    let config = Config::load()?;
    let client = ReqwestStravaClient::from_config(&config)?;
    let mut out = std::io::stdout();
    run_checks(&client, &mut out, today())
        .await
        .map_err(CliError::from)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    strava_export_cli::logging::init_tracing();

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_CHECK_FAILED),
        Err(e) => {
            e.report();
            ExitCode::from(e.exit_code())
        }
    }
}
