use crate::domain::application::{DocumentUpload, StoredFile};
use crate::domain::directory::{Bank, Branch};
use crate::domain::ports::ApiGateway;
use crate::domain::review::ApplicationRequest;
use crate::domain::transaction::{
    ApplicationSummary, ReverseRequest, TransactionRecord, TransactionRequest,
};
use crate::error::{KycError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpApiGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// REST client for the onboarding API.
///
/// Any non-2xx response is a [`KycError::Network`] whose message is the
/// response body, or `fallback` when the body is empty.
pub struct HttpApiGateway {
    client: Client,
    base_url: String,
}

impl HttpApiGateway {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T> {
        debug!(method = "GET", path, "api request");
        self.send(self.client.get(self.url(path)), fallback).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T> {
        debug!(method = "POST", path, "api request");
        self.send(self.client.post(self.url(path)).json(body), fallback)
            .await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, fallback: &str) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "{fallback}");
            KycError::from(e)
        })?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "{fallback}");
            let message = if body.trim().is_empty() {
                fallback.to_string()
            } else {
                body
            };
            Err(KycError::Network(message))
        }
    }
}

#[async_trait]
impl ApiGateway for HttpApiGateway {
    async fn list_banks(&self) -> Result<Vec<Bank>> {
        self.get("/banks", "Failed to fetch banks").await
    }

    async fn list_branches(&self, bank_id: i64) -> Result<Vec<Branch>> {
        debug!(method = "GET", path = "/branches", bank_id, "api request");
        let request = self
            .client
            .get(self.url("/branches"))
            .query(&[("bank_id", bank_id)]);
        self.send(request, "Failed to fetch branches").await
    }

    async fn upload_document(&self, upload: DocumentUpload) -> Result<StoredFile> {
        debug!(method = "POST", path = "/files/upload", file = %upload.file_name, "api request");
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.mime_type)?;
        let form = Form::new().part("file", part);
        let request = self.client.post(self.url("/files/upload")).multipart(form);
        self.send(request, "Failed to upload file").await
    }

    async fn submit_application(&self, request: &ApplicationRequest) -> Result<ApplicationSummary> {
        self.post(
            "/applications/submit",
            request,
            "Failed to submit application",
        )
        .await
    }

    async fn create_transaction(&self, request: &TransactionRequest) -> Result<TransactionRecord> {
        self.post("/transaction", request, "Failed to create transaction")
            .await
    }

    async fn reverse_transaction(&self, request: &ReverseRequest) -> Result<TransactionRecord> {
        self.post("/reverse", request, "Failed to reverse transaction")
            .await
    }

    async fn list_applications(&self) -> Result<Vec<ApplicationSummary>> {
        self.get("/applications", "Failed to fetch applications")
            .await
    }

    async fn list_transactions(&self) -> Result<Vec<TransactionRecord>> {
        self.get("/transactions", "Failed to fetch transactions")
            .await
    }
}
