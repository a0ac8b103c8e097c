//! HTTP client for the Gatekeeper Policy Manager backend

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use super::error::ApiError;
use super::types::ConstraintRecord;

/// Read and session operations the dashboard needs from the backend
///
/// Implemented by [`ApiClient`]; tests substitute in-memory sources.
#[async_trait]
pub trait PolicyApi: Send + Sync {
    /// `GET api/v1/constraints/{context}`
    async fn list_constraints(&self, context: &str) -> Result<Vec<ConstraintRecord>, ApiError>;

    /// `GET api/v1/contexts/`
    async fn list_contexts(&self) -> Result<Vec<String>, ApiError>;

    /// `POST api/v1/auth/logout`
    async fn logout(&self) -> Result<(), ApiError>;
}

/// reqwest-backed API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for `base_url`; `timeout` bounds every request
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base: normalize_base(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Join path segments onto the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Browser-downloadable HTML violations report
    pub fn report_url(&self) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["api", "v1", "constraints"])?;
        url.query_pairs_mut().append_pair("report", "html");
        Ok(url)
    }

    /// Fetch the HTML violations report body
    pub async fn download_report(&self) -> Result<String, ApiError> {
        let url = self.report_url()?;
        tracing::debug!("Downloading report from {}", url);
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        check_status(status, body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        tracing::debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        let body = check_status(status, body)?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PolicyApi for ApiClient {
    async fn list_constraints(&self, context: &str) -> Result<Vec<ConstraintRecord>, ApiError> {
        let url = self.endpoint(&["api", "v1", "constraints", context])?;
        self.get_json(url).await
    }

    async fn list_contexts(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(&["api", "v1", "contexts", ""])?;
        self.get_json(url).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "v1", "auth", "logout"])?;
        tracing::debug!("POST {}", url);
        let resp = self.http.post(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        check_status(status, body).map(|_| ())
    }
}

fn check_status(status: StatusCode, body: String) -> Result<String, ApiError> {
    if status.is_success() {
        Ok(body)
    } else {
        Err(ApiError::from_http_status(status, body))
    }
}

/// Parse the base URL and make sure its path ends with `/`
fn normalize_base(base_url: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(base_url.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, None).unwrap()
    }

    #[test]
    fn test_constraints_endpoint_with_and_without_slash() {
        for base in ["http://gpm.local:8080", "http://gpm.local:8080/"] {
            let url = client(base)
                .endpoint(&["api", "v1", "constraints", "kind-prod"])
                .unwrap();
            assert_eq!(
                url.as_str(),
                "http://gpm.local:8080/api/v1/constraints/kind-prod"
            );
        }
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let url = client("https://example.com/gpm")
            .endpoint(&["api", "v1", "auth", "logout"])
            .unwrap();
        assert_eq!(url.as_str(), "https://example.com/gpm/api/v1/auth/logout");
    }

    #[test]
    fn test_context_segment_is_encoded() {
        let url = client("http://localhost:8080/")
            .endpoint(&["api", "v1", "constraints", "arn:aws:eks/prod cluster"])
            .unwrap();
        assert!(url.as_str().ends_with("arn:aws:eks%2Fprod%20cluster"));
    }

    #[test]
    fn test_contexts_endpoint_has_trailing_slash() {
        let url = client("http://localhost:8080")
            .endpoint(&["api", "v1", "contexts", ""])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/v1/contexts/");
    }

    #[test]
    fn test_report_url() {
        let url = client("http://localhost:8080").report_url().unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/v1/constraints?report=html"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", None),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
