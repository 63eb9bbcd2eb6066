// src/core/catalog.rs

use tracing::{error, info};

use crate::core::client::BackendClient;
use crate::core::error::ScanError;
use crate::core::models::OptionCatalog;

/// Fetches environments, models and probes concurrently.
///
/// Fail-fast: the first failing request aborts the others and its error is
/// returned. A partially fetched catalog is never produced.
pub async fn load_catalog(client: &BackendClient) -> Result<OptionCatalog, ScanError> {
    info!("Loading option catalog.");
    let result = tokio::try_join!(
        client.fetch_environments(),
        client.fetch_models(),
        client.fetch_probes()
    );

    match result {
        Ok((environments, models, probes)) => {
            info!(
                environments = environments.len(),
                models = models.len(),
                probes = probes.len(),
                "Option catalog loaded."
            );
            Ok(OptionCatalog { environments, models, probes })
        }
        Err(e) => {
            error!(error = %e, "Option catalog failed to load.");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn loads_all_three_lists() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/environments");
                then.status(200).json_body(json!({"environments": ["prod"]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/models");
                then.status(200).json_body(json!({"models": ["gpt-4"]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/probes");
                then.status(200).json_body(json!({"probes": ["p1", "p2"]}));
            })
            .await;

        let client = BackendClient::new(&server.base_url(), None, Duration::from_secs(5)).unwrap();
        let catalog = load_catalog(&client).await.unwrap();
        assert_eq!(
            catalog,
            OptionCatalog {
                environments: vec!["prod".into()],
                models: vec!["gpt-4".into()],
                probes: vec!["p1".into(), "p2".into()],
            }
        );
    }

    #[tokio::test]
    async fn one_failing_list_fails_the_whole_catalog() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/environments");
                then.status(200).json_body(json!({"environments": ["prod"]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/models");
                then.status(500).body("ollama unavailable");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/probes");
                then.status(200).json_body(json!({"probes": ["p1"]}));
            })
            .await;

        let client = BackendClient::new(&server.base_url(), None, Duration::from_secs(5)).unwrap();
        let err = load_catalog(&client).await.unwrap_err();
        assert!(matches!(err, ScanError::CatalogLoad(ref m) if m.contains("ollama unavailable")));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_catalog_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!({"unexpected": true}));
            })
            .await;

        let client = BackendClient::new(&server.base_url(), None, Duration::from_secs(5)).unwrap();
        assert!(matches!(load_catalog(&client).await, Err(ScanError::CatalogLoad(_))));
    }
}
