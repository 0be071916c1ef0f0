use secrecy::SecretString;
use strava_export_client::http_client::ReqwestStravaClient;
use strava_export_client::{ActivityQuery, AthleteProfile, StravaClient, StravaError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ReqwestStravaClient {
    ReqwestStravaClient::new(&server.uri(), SecretString::new("tok".into())).expect("client")
}

fn first_page() -> ActivityQuery {
    ActivityQuery {
        after: Some(1_700_000_000),
        before: Some(1_700_604_800),
        page: 1,
        per_page: 200,
    }
}

#[tokio::test]
async fn get_athlete_sends_bearer_token_and_parses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 134815,
            "firstname": "Marianne",
            "lastname": "Teutenberg",
            "resource_state": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    let athlete = client(&server).get_athlete().await.expect("athlete");
    assert_eq!(
        athlete,
        AthleteProfile {
            id: 134815,
            firstname: Some("Marianne".into()),
            lastname: Some("Teutenberg".into()),
        }
    );
}

#[tokio::test]
async fn list_activities_passes_query_and_parses() {
    let server = MockServer::start().await;
    let body = serde_json::json!([
        {"id": 2, "name": "Evening Ride", "type": "Ride", "distance": 24931.4, "moving_time": 4500,
         "average_speed": 5.54, "start_date": "2025-11-24T17:00:00Z", "average_heartrate": 141.2},
        {"id": 1, "name": "Morning Run", "type": "Run", "distance": 5000.0}
    ]);
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .and(query_param("after", "1700000000"))
        .and(query_param("before", "1700604800"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let acts = client(&server)
        .list_activities(&first_page())
        .await
        .expect("activities");
    assert_eq!(acts.len(), 2);
    assert_eq!(acts[0].id, 2);
    assert_eq!(acts[0].activity_type.as_deref(), Some("Ride"));
    assert_eq!(acts[0].average_heartrate, Some(141.2));
    assert!(acts[1].average_heartrate.is_none());
}

#[tokio::test]
async fn unauthorized_maps_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Authorization Error",
            "errors": [{"resource": "Athlete", "field": "access_token", "code": "invalid"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_activities(&first_page())
        .await
        .unwrap_err();
    match err {
        StravaError::Auth(body) => assert!(body.contains("Authorization Error")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn too_many_requests_reports_rate_limit_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("X-RateLimit-Limit", "100,1000")
                .insert_header("X-RateLimit-Usage", "101,540"),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .list_activities(&first_page())
        .await
        .unwrap_err();
    match err {
        StravaError::RateLimited(rl) => {
            assert_eq!(rl.limit.as_deref(), Some("100,1000"));
            assert_eq!(rl.usage.as_deref(), Some("101,540"));
            assert!(rl.to_string().contains("101/100"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn other_status_maps_to_api_error_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_activities(&first_page())
        .await
        .unwrap_err();
    match err {
        StravaError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_body_is_reported_not_panicked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/athlete/activities"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_activities(&first_page())
        .await
        .unwrap_err();
    match err {
        StravaError::Api { status, body } => {
            assert_eq!(status, 200);
            assert!(body.contains("maintenance"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn connection_refused_is_transport_error() {
    // Bind then drop a listener so the port is known to be closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let client = ReqwestStravaClient::new(
        &format!("http://127.0.0.1:{port}"),
        SecretString::new("tok".into()),
    )
    .expect("client");
    let err = client.get_athlete().await.unwrap_err();
    assert!(matches!(err, StravaError::Transport(_)));
}
