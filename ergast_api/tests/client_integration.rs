use std::time::Duration;

use ergast_api::{CancellationToken, Client, Error, PageQuery};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_driver_standings_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("driver_standings.json");

    Mock::given(method("GET"))
        .and(path("/2021/driverStandings.json"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client
        .get_driver_standings(2021, &PageQuery::page(1, 2), &CancellationToken::new())
        .await;
    assert!(result.is_ok());

    let resp = result.unwrap();
    assert_eq!(resp.total, 21);
    assert_eq!(resp.data.len(), 2);
    assert_eq!(resp.data[1].driver.driver_id, "hamilton");
}

#[tokio::test]
async fn get_driver_standings_empty_season() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("driver_standings_empty.json");

    Mock::given(method("GET"))
        .and(path("/2031/driverStandings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let resp = client
        .get_driver_standings(2031, &PageQuery::page(1, 10), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(resp.total, 0);
    assert!(resp.data.is_empty());
}

#[tokio::test]
async fn get_driver_standings_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2021/driverStandings.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client
        .get_driver_standings(2021, &PageQuery::page(1, 10), &CancellationToken::new())
        .await;
    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "Internal Server Error");
        }
        other => panic!("expected HttpStatus, got {:?}", other.map(|r| r.total)),
    }
}

#[tokio::test]
async fn get_driver_standings_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2021/driverStandings.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not valid json}"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client
        .get_driver_standings(2021, &PageQuery::page(1, 10), &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(Error::DataShape(_))));
}

#[tokio::test]
async fn get_driver_standings_missing_table() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2021/driverStandings.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"MRData":{"total":"0"}}"#),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client
        .get_driver_standings(2021, &PageQuery::page(1, 10), &CancellationToken::new())
        .await;
    assert!(matches!(result, Err(Error::DataShape(_))));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Nothing listens on port 9 (discard) in the test environment.
    let client = Client::with_options("http://127.0.0.1:9", Duration::from_secs(2));
    let result = client
        .get_driver_standings(2021, &PageQuery::page(1, 10), &CancellationToken::new())
        .await;
    assert!(result.unwrap_err().is_transport());
}

#[tokio::test]
async fn cancelled_token_short_circuits() {
    let mock_server = MockServer::start().await;
    let client = Client::with_base_url(&mock_server.uri());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = client.get_driver("alonso", &cancel).await;
    assert!(result.unwrap_err().is_cancelled());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn cancelling_in_flight_request_resolves_cancelled() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("driver.json");

    Mock::given(method("GET"))
        .and(path("/drivers/alonso.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(&body)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let result = client.get_driver("alonso", &cancel).await;
    assert!(matches!(result, Err(Error::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn get_driver_success_and_unknown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drivers/alonso.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("driver.json")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/drivers/nobody.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"MRData":{"total":"0","DriverTable":{"driverId":"nobody","Drivers":[]}}}"#,
        ))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let cancel = CancellationToken::new();
    let alonso = client.get_driver("alonso", &cancel).await.unwrap();
    assert_eq!(alonso.unwrap().code.as_deref(), Some("ALO"));
    let nobody = client.get_driver("nobody", &cancel).await.unwrap();
    assert!(nobody.is_none());
}

#[tokio::test]
async fn get_driver_results_and_championships() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drivers/alonso/results.json"))
        .and(query_param("limit", "100"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("driver_results.json")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/drivers/alonso/driverStandings/1.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("championships.json")),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let cancel = CancellationToken::new();
    let results = client
        .get_driver_results("alonso", &PageQuery::page(1, 100), &cancel)
        .await
        .unwrap();
    assert_eq!(results.total, 2);
    assert_eq!(results.data.len(), 2);

    let titles = client
        .get_driver_championships("alonso", &cancel)
        .await
        .unwrap();
    assert_eq!(titles.total, 2);
    assert_eq!(titles.data[1].season, "2006");
}

#[tokio::test]
async fn get_season_races_and_round_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2021.json"))
        .and(query_param("limit", "100"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("season_races.json")),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2021/1/results.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("round_results.json")),
        )
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let cancel = CancellationToken::new();
    let races = client.get_season_races(2021, &cancel).await.unwrap();
    assert_eq!(races.data.len(), 2);
    assert_eq!(races.data[0].race_name, "Bahrain Grand Prix");

    let results = client.get_round_results(2021, 1, &cancel).await.unwrap();
    assert_eq!(results.data.len(), 2);
    assert_eq!(results.data[1].grid.as_deref(), Some("1"));
}
