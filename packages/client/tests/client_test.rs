//! HTTP-level tests for the dispatch client against a mock API.

use dispatch_map_client::{DispatchClient, DispatchSource, FetchError};
use dispatch_map_dispatch_models::{DataType, DispatchResponse};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn unit(id: i64, name: &str) -> serde_json::Value {
    json!({
        "UnitID": id,
        "UnitName": name,
        "VehicleID": id + 100,
        "VehicleName": format!("Vehicle {id}"),
        "StatusName": "Enroute",
        "Latitude": 39.7,
        "Longitude": -105.2,
        "IncidentID": 55,
        "Agency": "Golden Fire",
        "Jurisdiction": "Golden",
        "JurisdictionCode": "GC",
        "CurrentLocation": "6TH AVE",
        "Speed": 35.0,
        "DestinationLatitude": 39.75,
        "DestinationLongitude": -105.22,
        "Heading": 180.0,
        "Personel": []
    })
}

fn client(server: &MockServer) -> DispatchClient {
    DispatchClient::new(&server.uri(), "secret", None, false).unwrap()
}

#[tokio::test]
async fn posts_jurisdiction_codes_with_api_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/GetActiveUnitsByJurisdiction"))
        .and(header("x-api-key", "secret"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"JurisdictionCodes": ["GC"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Success": true,
            "Units": [unit(1, "E1"), unit(2, "M2")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .fetch(DataType::Units, &["GC".to_string()])
        .await
        .unwrap();

    let DispatchResponse::Units(units) = response else {
        panic!("expected units response");
    };
    assert_eq!(units.units.len(), 2);
    assert_eq!(units.units[1].unit_name, "M2");
}

#[tokio::test]
async fn sends_all_codes_in_batch_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/GetActiveIncidentsByJurisdiction"))
        .and(body_json(json!({"JurisdictionCodes": ["JC", "GC"]})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"Success": true, "Incidents": null})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server)
        .fetch(DataType::Incidents, &["JC".to_string(), "GC".to_string()])
        .await
        .unwrap();
    assert!(response.success());
    assert_eq!(response.record_count(), 0);
}

#[tokio::test]
async fn reports_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch(DataType::Incidents, &["JC".to_string()])
        .await
        .unwrap_err();

    match err {
        FetchError::HttpStatus {
            status,
            reason,
            body,
        } => {
            assert_eq!(status, 503);
            assert_eq!(reason, "Service Unavailable");
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn reports_schema_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Success": true,
            "Units": [{"UnitID": "not a number"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .fetch(DataType::Units, &["GC".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Schema { .. }), "{err:?}");
}

#[tokio::test]
async fn api_failure_is_not_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Success": false,
            "Error": "bad jurisdiction",
            "Incidents": null
        })))
        .mount(&server)
        .await;

    let response = client(&server)
        .fetch(DataType::Incidents, &["XX".to_string()])
        .await
        .unwrap();
    assert!(!response.success());
    assert_eq!(response.error(), Some("bad jurisdiction"));
}

#[tokio::test]
async fn reports_transport_failure() {
    let client = DispatchClient::new("http://127.0.0.1:1", "secret", None, false).unwrap();
    let err = client
        .fetch(DataType::Incidents, &["JC".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
}
