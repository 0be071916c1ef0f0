use chrono::NaiveDate;
use secrecy::SecretString;
use strava_export_client::StravaError;
use strava_export_client::date_range::DateRange;
use strava_export_client::export::{ExportOptions, export_activities};
use strava_export_client::http_client::ReqwestStravaClient;
use strava_export_client::projector::ExportProfile;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn range() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 11, 24).unwrap(),
    )
    .expect("range")
}

fn activities(count: usize, first_id: u64) -> serde_json::Value {
    (0..count as u64)
        .map(|i| {
            serde_json::json!({
                "id": first_id + i,
                "name": format!("Activity {}", first_id + i),
                "type": "Run",
                "start_date": "2025-11-24T06:30:00Z",
                "distance": 5000.0,
                "moving_time": 1500,
                "elapsed_time": 1600,
                "total_elevation_gain": 12.0,
                "average_speed": 3.0,
                "max_speed": 4.0
            })
        })
        .collect::<Vec<_>>()
        .into()
}

async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate) {
    let (after, before) = range().epoch_bounds();
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("after", after.to_string()))
        .and(query_param("before", before.to_string()))
        .and(query_param("page", page.to_string()))
        .and(query_param("per_page", "200"))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> ReqwestStravaClient {
    ReqwestStravaClient::new(&server.uri(), SecretString::new("tok".into())).expect("client")
}

#[tokio::test]
async fn exports_all_pages_and_stops_on_short_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_json(activities(200, 1))).await;
    mount_page(&server, 2, ResponseTemplate::new(200).set_body_json(activities(200, 201))).await;
    mount_page(&server, 3, ResponseTemplate::new(200).set_body_json(activities(47, 401))).await;

    let dir = tempfile::tempdir().expect("tmpdir");
    let out = dir.path().join(range().default_filename());
    let options = ExportOptions {
        profile: ExportProfile::Compact,
        ..Default::default()
    };
    let result = export_activities(&client(&server), &range(), &options, &out)
        .await
        .expect("export");

    assert_eq!(result.row_count, 447);
    assert_eq!(result.file_path, out);
    let body = std::fs::read_to_string(&out).expect("read");
    let mut lines = body.lines();
    assert_eq!(
        lines.next(),
        Some("id,name,type,date,distance_km,moving_time_s,elapsed_time_s,elevation_gain_m,average_speed_kmh,average_hr")
    );
    assert_eq!(
        lines.next(),
        Some("1,Activity 1,Run,2025-11-24,5.0,1500,1600,12.0,10.8,")
    );
    assert_eq!(body.lines().count(), 448);
    // page 4 would hit no mock; `expect(1)` on each page is verified on drop
}

#[tokio::test]
async fn zero_activities_still_writes_header() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_json(serde_json::json!([]))).await;

    let dir = tempfile::tempdir().expect("tmpdir");
    let out = dir.path().join("empty.csv");
    let result = export_activities(&client(&server), &range(), &ExportOptions::default(), &out)
        .await
        .expect("export");
    assert_eq!(result.row_count, 0);
    let body = std::fs::read_to_string(&out).expect("read");
    assert_eq!(body.lines().count(), 1);
    assert!(body.starts_with("id,name,distance,moving_time,elapsed_time"));
}

#[tokio::test]
async fn unauthorized_first_page_writes_no_file() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(401).set_body_string("{\"message\":\"Authorization Error\"}"),
    )
    .await;

    let dir = tempfile::tempdir().expect("tmpdir");
    let out = dir.path().join("never.csv");
    let err = export_activities(&client(&server), &range(), &ExportOptions::default(), &out)
        .await
        .unwrap_err();
    assert!(matches!(err, StravaError::Auth(_)));
    assert!(!out.exists());
}

#[tokio::test]
async fn failure_after_first_page_exports_nothing() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_json(activities(200, 1))).await;
    mount_page(&server, 2, ResponseTemplate::new(429)).await;

    let dir = tempfile::tempdir().expect("tmpdir");
    let out = dir.path().join("partial.csv");
    let err = export_activities(&client(&server), &range(), &ExportOptions::default(), &out)
        .await
        .unwrap_err();
    assert!(matches!(err, StravaError::RateLimited(_)));
    assert!(!out.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn unwritable_destination_surfaces_io_error() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_json(activities(3, 1))).await;

    let dir = tempfile::tempdir().expect("tmpdir");
    let out = dir.path().join("no-such-dir").join("out.csv");
    let err = export_activities(&client(&server), &range(), &ExportOptions::default(), &out)
        .await
        .unwrap_err();
    assert!(matches!(err, StravaError::Io { .. }));
    assert!(!out.exists());
}
