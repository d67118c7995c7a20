use super::{CelestialRecord, EphemerisClient, EphemerisQuery, QueryError};
use crate::http_handler::http_client::HTTPClient;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub(crate) const CATALOG: &str = r#"{
  "apiversion": "4.0.1",
  "properties": {
    "data": [
      {"almanac_data": {"gha": 101.2, "hc": -12.5, "zn": 310.1}, "object": "Moon"},
      {"almanac_data": {"gha": 12.7, "hc": 45.2, "zn": 180.3}, "object": "Sun"},
      {"almanac_data": {"gha": 77.0, "hc": 3.1, "zn": 95.4}, "object": "Venus"}
    ]
  },
  "type": "Feature"
}"#;

const NO_SUN: &str = r#"{"properties": {"data": [
  {"almanac_data": {"hc": -12.5, "zn": 310.1}, "object": "Moon"},
  {"almanac_data": {"hc": 45.0, "zn": 180.0}, "object": "sun"}
]}}"#;

/// Reads one HTTP request from `socket`, answers it and hands back the request line.
pub(crate) async fn answer(mut socket: TcpStream, status: &str, body: &str) -> String {
    let mut request = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        request.extend_from_slice(&chunk[..n]);
        if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(response.as_bytes()).await.unwrap();
    let _ = socket.shutdown().await;
    String::from_utf8_lossy(&request).lines().next().unwrap_or_default().to_string()
}

/// Serves exactly one HTTP response and hands back the request line it received.
pub(crate) async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        answer(socket, status, body).await
    });
    (format!("http://{addr}"), handle)
}

pub(crate) fn client_for(base_url: &str) -> EphemerisClient {
    let inner = reqwest::Client::builder().no_proxy().build().unwrap();
    EphemerisClient::new(Arc::new(HTTPClient::with_client(base_url, inner)), "Sun")
}

fn solstice_query() -> EphemerisQuery {
    EphemerisQuery::new(
        NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
        NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
        52.52,
        13.405,
    )
}

#[tokio::test]
async fn test_selects_sun_from_catalog() {
    let (url, server) = serve_once("200 OK", CATALOG).await;
    let record = client_for(&url).query(&solstice_query()).await.unwrap();
    assert_eq!(record, CelestialRecord::new("Sun", 45.2, 180.3));

    let request_line = server.await.unwrap();
    assert!(request_line.starts_with("GET /api/celnav?"), "{request_line}");
    assert!(request_line.contains("date=2024-06-21"), "{request_line}");
    assert!(request_line.contains("time=12%3A30"), "{request_line}");
    assert!(request_line.contains("coords=52.52%2C13.405"), "{request_line}");
}

#[tokio::test]
async fn test_missing_body_is_reported() {
    let (url, _server) = serve_once("200 OK", NO_SUN).await;
    let err = client_for(&url).query(&solstice_query()).await.unwrap_err();
    assert_eq!(err, QueryError::BodyNotFound { name: String::from("Sun") });
    assert_eq!(err.to_string(), "Sun data not found!");
}

#[tokio::test]
async fn test_first_matching_body_wins() {
    let catalog = r#"{"properties": {"data": [
      {"almanac_data": {"hc": -12.5, "zn": 310.1}, "object": "Moon"},
      {"almanac_data": {"hc": 30.0, "zn": 120.0}, "object": "Sun"},
      {"almanac_data": {"hc": 31.0, "zn": 121.0}, "object": "Sun"}
    ]}}"#;
    let (url, _server) = serve_once("200 OK", catalog).await;
    let record = client_for(&url).query(&solstice_query()).await.unwrap();
    assert_eq!(record, CelestialRecord::new("Sun", 30.0, 120.0));
}

#[tokio::test]
async fn test_error_status_is_service_error() {
    let (url, _server) = serve_once("503 Service Unavailable", "{}").await;
    let err = client_for(&url).query(&solstice_query()).await.unwrap_err();
    assert_eq!(err, QueryError::ServiceError { status_code: 503 });
    assert_eq!(err.to_string(), "API Error: 503");
}

#[tokio::test]
async fn test_malformed_body_is_transport_error() {
    let (url, _server) = serve_once("200 OK", r#"{"properties": {}}"#).await;
    let err = client_for(&url).query(&solstice_query()).await.unwrap_err();
    assert!(matches!(err, QueryError::TransportError { .. }), "{err:?}");
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    let url = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let err = client_for(&url).query(&solstice_query()).await.unwrap_err();
    assert!(matches!(err, QueryError::TransportError { .. }), "{err:?}");
    assert!(err.to_string().starts_with("API Call Failed: "));
}

#[test]
fn test_query_parameters_from_clock() {
    let now = Utc.with_ymd_and_hms(2025, 1, 3, 7, 5, 59).unwrap();
    let query = EphemerisQuery::at(&now, -33.8688, 151.2093);
    assert_eq!(query.date_param(), "2025-01-03");
    assert_eq!(query.time_param(), "07:05");
    assert_eq!(query.coords_param(), "-33.8688,151.2093");
}
