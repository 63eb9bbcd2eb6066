// src/core/client.rs

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::core::error::{ClientError, ScanError};
use crate::core::models::{EnvironmentsResponse, ModelsResponse, ProbesResponse, ScanCreated, ScanRequest};

/// HTTP access to the scan backend, plus the address of its streaming endpoint.
///
/// All endpoint URLs are resolved once at construction so request paths can
/// never fail to build later on. Cloning is cheap: `reqwest::Client` is
/// reference-counted internally.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    environments_url: Url,
    models_url: Url,
    probes_url: Url,
    scan_url: Url,
    stream_url: Url,
}

impl BackendClient {
    /// Builds a client for `backend_url`.
    ///
    /// The stream base defaults to `backend_url` with its scheme transposed
    /// (`http` to `ws`, `https` to `wss`); `stream_url` overrides it.
    pub fn new(backend_url: &str, stream_url: Option<&str>, timeout: Duration) -> Result<Self, ClientError> {
        let base = parse_base(backend_url)?;
        let stream_base = match stream_url {
            Some(raw) => transpose_scheme(&parse_base(raw)?)
                .ok_or_else(|| ClientError::UnsupportedScheme(raw.to_string()))?,
            None => transpose_scheme(&base).ok_or_else(|| ClientError::UnsupportedScheme(backend_url.to_string()))?,
        };

        let join = |root: &Url, path: &str| {
            root.join(path).map_err(|e| ClientError::InvalidUrl(root.to_string(), e))
        };

        let http = Client::builder()
            .user_agent(concat!("llm-scan-wizard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        let client = Self {
            http,
            environments_url: join(&base, "api/environments")?,
            models_url: join(&base, "api/models")?,
            probes_url: join(&base, "api/probes")?,
            scan_url: join(&base, "api/scan")?,
            stream_url: join(&stream_base, "api/ws/scan/")?,
        };
        info!(backend = %base, stream = %client.stream_url, "Backend client configured.");
        Ok(client)
    }

    pub async fn fetch_environments(&self) -> Result<Vec<String>, ScanError> {
        let body: EnvironmentsResponse = self.get_catalog_list(&self.environments_url).await?;
        Ok(body.environments)
    }

    pub async fn fetch_models(&self) -> Result<Vec<String>, ScanError> {
        let body: ModelsResponse = self.get_catalog_list(&self.models_url).await?;
        Ok(body.models)
    }

    pub async fn fetch_probes(&self) -> Result<Vec<String>, ScanError> {
        let body: ProbesResponse = self.get_catalog_list(&self.probes_url).await?;
        Ok(body.probes)
    }

    async fn get_catalog_list<T: DeserializeOwned>(&self, url: &Url) -> Result<T, ScanError> {
        debug!(url = %url, "Fetching catalog list.");
        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            error!(url = %url, error = %e, "Catalog request failed.");
            ScanError::CatalogLoad(e.to_string())
        })?;
        let response = ensure_success(response).await.map_err(ScanError::CatalogLoad)?;
        response.json::<T>().await.map_err(|e| {
            error!(url = %url, error = %e, "Catalog response could not be decoded.");
            ScanError::CatalogLoad(e.to_string())
        })
    }

    /// Sends exactly one session-creation request. Never retried.
    pub async fn create_scan(&self, request: &ScanRequest) -> Result<ScanCreated, ScanError> {
        info!(tool = %request.tool, model = %request.model_name, environment = %request.environment, "Submitting scan request.");
        let response = self
            .http
            .post(self.scan_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Scan request could not be delivered.");
                ScanError::Launch(e.to_string())
            })?;
        let response = ensure_success(response).await.map_err(ScanError::Launch)?;
        response.json::<ScanCreated>().await.map_err(|e| {
            error!(error = %e, "Scan response could not be decoded.");
            ScanError::Launch(e.to_string())
        })
    }

    /// Streaming address for one session: `<stream-base>/api/ws/scan/<session_id>`.
    pub fn stream_url(&self, session_id: &str) -> Result<Url, ScanError> {
        let mut url = self.stream_url.clone();
        url.path_segments_mut()
            .map_err(|_| ScanError::Channel(format!("cannot derive a stream address from {}", self.stream_url)))?
            .pop_if_empty()
            .push(session_id);
        Ok(url)
    }
}

/// Turns a non-2xx response into a readable message, preferring the backend's
/// `detail` field when it sends one.
async fn ensure_success(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().clone();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or(body);
    warn!(url = %url, status = %status, detail = %detail, "Backend returned an error status.");
    if detail.trim().is_empty() {
        Err(format!("request failed with status {status}"))
    } else {
        Err(format!("request failed with status {status}: {detail}"))
    }
}

fn parse_base(raw: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(raw.trim()).map_err(|e| ClientError::InvalidUrl(raw.to_string(), e))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn transpose_scheme(base: &Url) -> Option<Url> {
    let scheme = match base.scheme() {
        "http" => "ws",
        "https" => "wss",
        "ws" | "wss" => return Some(base.clone()),
        _ => return None,
    };
    let mut url = base.clone();
    url.set_scheme(scheme).ok()?;
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(base: &str) -> BackendClient {
        BackendClient::new(base, None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn stream_url_transposes_scheme() {
        let client = client_for("http://localhost:8005");
        assert_eq!(client.stream_url("abc").unwrap().as_str(), "ws://localhost:8005/api/ws/scan/abc");

        let secure = client_for("https://scanner.example.com/prefix");
        assert_eq!(
            secure.stream_url("abc").unwrap().as_str(),
            "wss://scanner.example.com/prefix/api/ws/scan/abc"
        );
    }

    #[test]
    fn stream_url_override_wins() {
        let client = BackendClient::new("http://localhost:8005", Some("ws://127.0.0.1:9000"), Duration::from_secs(5)).unwrap();
        assert_eq!(client.stream_url("s-1").unwrap().as_str(), "ws://127.0.0.1:9000/api/ws/scan/s-1");
    }

    #[test]
    fn stream_url_escapes_session_id() {
        let client = client_for("http://localhost:8005");
        assert_eq!(client.stream_url("a/b").unwrap().as_str(), "ws://localhost:8005/api/ws/scan/a%2Fb");
    }

    #[test]
    fn rejects_unusable_addresses() {
        assert!(matches!(
            BackendClient::new("not a url", None, Duration::from_secs(1)),
            Err(ClientError::InvalidUrl(..))
        ));
        assert!(matches!(
            BackendClient::new("ftp://host", None, Duration::from_secs(1)),
            Err(ClientError::UnsupportedScheme(_))
        ));
    }

    #[tokio::test]
    async fn create_scan_surfaces_backend_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/scan");
                then.status(422).json_body(json!({"detail": "At least one probe is required for Garak"}));
            })
            .await;

        let request = ScanRequest {
            environment: "prod".into(),
            model_name: "gpt-4".into(),
            tool: "garak".into(),
            probes: vec![],
            promptmap_directory: None,
        };
        let err = client_for(&server.base_url()).create_scan(&request).await.unwrap_err();
        match err {
            ScanError::Launch(message) => {
                assert!(message.contains("422"));
                assert!(message.contains("At least one probe is required for Garak"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
