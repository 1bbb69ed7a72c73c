// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Client for the NESO CKAN datastore API.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use gridion_types::{DataError, DataResult};

/// Datastore resource identifiers GridION reads from.
pub mod resources {
    /// Half-hourly demand and interconnector flows ("demand data update").
    pub const DEMAND_FLOWS: &str = "b2bde559-3455-4021-b179-dfe60c0337b0";
    /// Daily constraint management spend.
    pub const CONSTRAINT_SPEND: &str = "6afe1c2b-6d70-4e76-8e74-0952b0a2beab";
}

/// Rows of one settlement day.
pub const DAY_LIMIT: u32 = 48;
/// Rows of one rolling week.
pub const WEEK_LIMIT: u32 = 336;

const DEFAULT_BASE_URL: &str = "https://api.neso.energy";

#[derive(Debug, Deserialize)]
struct DatastoreEnvelope {
    success: bool,
    #[serde(default)]
    result: Option<DatastoreResult>,
}

#[derive(Debug, Deserialize)]
struct DatastoreResult {
    #[serde(default)]
    records: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Thin CKAN `datastore_search` client with a hard request deadline.
#[derive(Debug, Clone)]
pub struct NesoClient {
    client: reqwest::Client,
    base_url: String,
}

impl NesoClient {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> DataResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Fetch(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_owned(),
        })
    }

    /// Point the client at a different host. Used by tests.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch up to `limit` newest rows of a datastore resource.
    ///
    /// A deadline overrun surfaces as [`DataError::Timeout`] so callers can
    /// distinguish a slow upstream from a broken one.
    pub async fn datastore_search(
        &self,
        resource_id: &str,
        limit: u32,
    ) -> DataResult<Vec<serde_json::Map<String, serde_json::Value>>> {
        let url = format!("{}/api/3/action/datastore_search", self.base_url);
        debug!(resource_id, limit, "querying NESO datastore");

        let response = self
            .client
            .get(&url)
            .query(&[("resource_id", resource_id), ("limit", &limit.to_string())])
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Fetch(format!(
                "datastore_search returned HTTP {status}"
            )));
        }

        let envelope: DatastoreEnvelope = response
            .json()
            .await
            .map_err(|e| DataError::Parse(format!("malformed datastore envelope: {e}")))?;

        if !envelope.success {
            return Err(DataError::Fetch(
                "datastore_search reported success=false".to_owned(),
            ));
        }
        Ok(envelope.result.map(|r| r.records).unwrap_or_default())
    }

    /// Fetch an auxiliary static dataset as text, with the same deadline
    /// and error mapping as the datastore queries.
    pub async fn fetch_text(&self, url: &str) -> DataResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(classify_transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Fetch(format!("{url} returned HTTP {status}")));
        }
        response.text().await.map_err(classify_transport_error)
    }
}

fn classify_transport_error(e: reqwest::Error) -> DataError {
    if e.is_timeout() {
        DataError::Timeout
    } else {
        DataError::Fetch(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn client(server: &mockito::ServerGuard) -> NesoClient {
        NesoClient::new(Duration::from_secs(10))
            .unwrap()
            .with_base_url(server.url())
    }

    #[tokio::test]
    async fn test_datastore_search_parses_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded(
                    "resource_id".into(),
                    resources::DEMAND_FLOWS.into(),
                ),
                mockito::Matcher::UrlEncoded("limit".into(), "48".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"success": true, "result": {"records": [
                    {"SETTLEMENT_DATE": "2025-01-15", "SETTLEMENT_PERIOD": 1, "ND": 28000}
                ]}}"#,
            )
            .create_async()
            .await;

        let records = client(&server)
            .datastore_search(resources::DEMAND_FLOWS, DAY_LIMIT)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["ND"], serde_json::json!(28000));
    }

    #[tokio::test]
    async fn test_unsuccessful_envelope_is_a_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"success": false}"#)
            .create_async()
            .await;

        let result = client(&server)
            .datastore_search(resources::DEMAND_FLOWS, DAY_LIMIT)
            .await;
        assert!(matches!(result, Err(DataError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_http_error_status_is_a_fetch_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let result = client(&server)
            .datastore_search(resources::DEMAND_FLOWS, DAY_LIMIT)
            .await;
        assert!(matches!(result, Err(DataError::Fetch(_))));
    }

    #[tokio::test]
    async fn test_garbage_body_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let result = client(&server)
            .datastore_search(resources::DEMAND_FLOWS, DAY_LIMIT)
            .await;
        assert!(matches!(result, Err(DataError::Parse(_))));
    }

    #[tokio::test]
    async fn test_slow_upstream_is_a_timeout() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/3/action/datastore_search")
            .match_query(mockito::Matcher::Any)
            .with_chunked_body(|w| {
                std::thread::sleep(std::time::Duration::from_millis(300));
                w.write_all(b"{}")
            })
            .create_async()
            .await;

        let result = NesoClient::new(Duration::from_millis(50))
            .unwrap()
            .with_base_url(server.url())
            .datastore_search(resources::DEMAND_FLOWS, DAY_LIMIT)
            .await;
        assert!(matches!(result, Err(DataError::Timeout)));
    }
}
