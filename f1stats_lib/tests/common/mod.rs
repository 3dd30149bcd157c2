#![allow(dead_code)]

use std::time::Duration;

use f1stats_lib::{Config, RetryConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn test_config(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        request_timeout: Duration::from_secs(5),
        debounce: Duration::from_millis(100),
        retry: RetryConfig::none(),
        ..Config::default()
    }
}

/// Standings window with drivers `driver_{offset+1}` .. `driver_{offset+count}`.
pub fn standings_body(year: i32, offset: usize, count: usize, total: usize) -> Value {
    let rows: Vec<Value> = (offset..offset + count)
        .map(|i| {
            json!({
                "position": (i + 1).to_string(),
                "positionText": (i + 1).to_string(),
                "points": (500 - i * 10).to_string(),
                "wins": "0",
                "Driver": {
                    "driverId": format!("driver_{}", i + 1),
                    "givenName": "Driver",
                    "familyName": format!("Number{}", i + 1)
                },
                "Constructors": [{ "constructorId": "team", "name": "Team" }]
            })
        })
        .collect();
    let lists = if rows.is_empty() {
        json!([])
    } else {
        json!([{ "season": year.to_string(), "round": "22", "DriverStandings": rows }])
    };
    json!({
        "MRData": {
            "limit": "10",
            "offset": offset.to_string(),
            "total": total.to_string(),
            "StandingsTable": { "season": year.to_string(), "StandingsLists": lists }
        }
    })
}

pub async fn mount_standings_page(
    server: &MockServer,
    year: i32,
    offset: usize,
    count: usize,
    total: usize,
    delay: Option<Duration>,
) {
    let mut response =
        ResponseTemplate::new(200).set_body_json(standings_body(year, offset, count, total));
    if let Some(delay) = delay {
        response = response.set_delay(delay);
    }
    let mock = Mock::given(method("GET")).and(path(format!("/{}/driverStandings.json", year)));
    let mock = if offset == 0 {
        mock.and(query_param_is_missing("offset"))
    } else {
        mock.and(query_param("offset", offset.to_string()))
    };
    mock.respond_with(response).mount(server).await;
}

pub fn race(season: &str, round: usize, position: &str, grid: &str, points: &str) -> Value {
    json!({
        "season": season,
        "round": round.to_string(),
        "raceName": "Test Grand Prix",
        "date": "2021-03-28",
        "Results": [{
            "number": "1",
            "position": position,
            "positionText": position,
            "points": points,
            "Driver": { "driverId": "test_driver", "givenName": "Test", "familyName": "Driver" },
            "Constructor": { "constructorId": "team", "name": "Team" },
            "grid": grid,
            "laps": "57",
            "status": "Finished"
        }]
    })
}

pub fn races_body(offset: usize, total: usize, races: Vec<Value>) -> Value {
    json!({
        "MRData": {
            "limit": "100",
            "offset": offset.to_string(),
            "total": total.to_string(),
            "RaceTable": { "Races": races }
        }
    })
}

pub fn championships_body(total: usize) -> Value {
    let lists: Vec<Value> = (0..total)
        .map(|i| json!({ "season": (2010 + i).to_string(), "round": "20", "DriverStandings": [] }))
        .collect();
    json!({
        "MRData": {
            "limit": "30",
            "offset": "0",
            "total": total.to_string(),
            "StandingsTable": { "StandingsLists": lists }
        }
    })
}

pub fn driver_body(driver_id: &str) -> Value {
    let drivers = if driver_id.is_empty() {
        json!([])
    } else {
        json!([{
            "driverId": driver_id,
            "permanentNumber": "14",
            "code": "ALO",
            "givenName": "Fernando",
            "familyName": "Alonso",
            "dateOfBirth": "1981-07-29",
            "nationality": "Spanish"
        }])
    };
    json!({ "MRData": { "total": "1", "DriverTable": { "Drivers": drivers } } })
}

pub async fn request_count(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|req| req.url.path() == request_path)
        .count()
}
