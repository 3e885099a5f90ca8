use super::application::{DocumentUpload, StoredFile};
use super::directory::{Bank, Branch};
use super::review::ApplicationRequest;
use super::transaction::{
    ApplicationSummary, ReverseRequest, TransactionRecord, TransactionRequest,
};
use crate::error::Result;
use async_trait::async_trait;

/// The REST API the onboarding flow talks to.
///
/// Every call is made once per user action; implementations do not retry.
#[async_trait]
pub trait ApiGateway: Send + Sync {
    async fn list_banks(&self) -> Result<Vec<Bank>>;
    async fn list_branches(&self, bank_id: i64) -> Result<Vec<Branch>>;
    async fn upload_document(&self, upload: DocumentUpload) -> Result<StoredFile>;
    async fn submit_application(&self, request: &ApplicationRequest) -> Result<ApplicationSummary>;
    async fn create_transaction(&self, request: &TransactionRequest) -> Result<TransactionRecord>;
    async fn reverse_transaction(&self, request: &ReverseRequest) -> Result<TransactionRecord>;
    async fn list_applications(&self) -> Result<Vec<ApplicationSummary>>;
    async fn list_transactions(&self) -> Result<Vec<TransactionRecord>>;
}

/// String key/value storage scoped to one user session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

pub type ApiGatewayBox = Box<dyn ApiGateway>;
pub type SessionStoreBox = Box<dyn SessionStore>;
