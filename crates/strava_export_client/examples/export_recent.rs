use strava_export_client::config::Config;
use strava_export_client::date_range::{DateRange, today};
use strava_export_client::export::{ExportOptions, export_activities};
use strava_export_client::http_client::ReqwestStravaClient;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    let client = ReqwestStravaClient::from_config(&cfg)?;

    let days = std::env::var("STRAVA_EXAMPLE_DAYS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(7);
    let range = DateRange::days_back(days, today())?;
    let path = std::path::PathBuf::from(range.default_filename());

    let options = ExportOptions {
        profile: cfg.profile,
        ..Default::default()
    };
    let result = export_activities(&client, &range, &options, &path)
        .await
        .map_err(|e| format!("export failed: {}", e))?;

    println!(
        "{} activities from {} written to {}",
        result.row_count,
        range,
        result.file_path.display()
    );
    Ok(())
}
