//! HTTP fetch of raw records from the upstream tracker.
//!
//! This is the whole input collaborator: one GET returning a JSON array of
//! raw records. Any transport failure, non-success status, or payload that
//! does not parse as a record array is a fetch error and aborts the run
//! before the warehouse is touched.

use etl_core::{Error, RawRecord, Result};
use tracing::debug;

/// Fetches the full raw record list from `url`.
pub async fn fetch_raw_records(client: &reqwest::Client, url: &str) -> Result<Vec<RawRecord>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::fetch(format!("request to {} failed: {}", url, e)))?
        .error_for_status()
        .map_err(|e| Error::fetch(format!("source returned error status: {}", e)))?;

    let records: Vec<RawRecord> = response
        .json()
        .await
        .map_err(|e| Error::fetch(format!("malformed payload from {}: {}", url, e)))?;

    debug!(count = records.len(), url = %url, "Fetched raw records");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_parses_record_array() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            {"id": 1, "userId": 1, "title": "t", "completed": true},
            {"id": 2, "userId": 2, "title": "u", "completed": false},
            {"id": 3, "userId": 2, "title": "v"}
        ]);
        Mock::given(method("GET"))
            .and(path("/todos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let records = fetch_raw_records(&client, &format!("{}/todos", server.uri()))
            .await
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, Some(1));
        assert_eq!(records[0].completed, Some(true));
        assert_eq!(records[2].completed, None);
    }

    #[tokio::test]
    async fn test_fetch_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = fetch_raw_records(&client, &server.uri()).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"not\": \"an array\"}"))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let err = fetch_raw_records(&client, &server.uri()).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }
}
