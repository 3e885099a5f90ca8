use crate::domain::application::{ApplicationStatus, DocumentUpload, StoredFile};
use crate::domain::directory::{Bank, Branch};
use crate::domain::ports::{ApiGateway, SessionStore};
use crate::domain::review::ApplicationRequest;
use crate::domain::transaction::{
    ApplicationSummary, NamedRef, ReverseRequest, TransactionRecord, TransactionRequest,
    TransactionStatus,
};
use crate::error::{KycError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A session store that lives as long as the process.
///
/// Clones share the same underlying map.
#[derive(Default, Clone)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }
}

#[derive(Default)]
struct GatewayState {
    banks: Vec<Bank>,
    branches: Vec<Branch>,
    applications: Vec<ApplicationSummary>,
    transactions: Vec<TransactionRecord>,
    submissions: Vec<ApplicationRequest>,
    uploads: Vec<DocumentUpload>,
    branch_requests: Vec<i64>,
    fail_next: Option<String>,
}

impl GatewayState {
    fn check_failure(&mut self) -> Result<()> {
        match self.fail_next.take() {
            Some(message) => Err(KycError::Network(message)),
            None => Ok(()),
        }
    }
}

/// An in-process stand-in for the onboarding REST API.
///
/// Serves a fixed bank directory and keeps applications and transactions in
/// memory. Clones share state, so a test can keep a handle while the flow
/// owns a boxed copy.
#[derive(Default, Clone)]
pub struct InMemoryApiGateway {
    state: Arc<RwLock<GatewayState>>,
}

impl InMemoryApiGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a branch; its bank is added too if missing.
    pub async fn add_branch(&self, branch: Branch) {
        let mut state = self.state.write().await;
        if !state.banks.iter().any(|b| b.id == branch.bank.id) {
            state.banks.push(branch.bank.clone());
        }
        state.branches.push(branch);
    }

    /// Makes the next call fail with a network error carrying `message`.
    pub async fn fail_next(&self, message: impl Into<String>) {
        self.state.write().await.fail_next = Some(message.into());
    }

    pub async fn submissions(&self) -> Vec<ApplicationRequest> {
        self.state.read().await.submissions.clone()
    }

    pub async fn uploads(&self) -> Vec<DocumentUpload> {
        self.state.read().await.uploads.clone()
    }

    pub async fn branch_requests(&self) -> Vec<i64> {
        self.state.read().await.branch_requests.clone()
    }
}

#[async_trait]
impl ApiGateway for InMemoryApiGateway {
    async fn list_banks(&self) -> Result<Vec<Bank>> {
        let mut state = self.state.write().await;
        state.check_failure()?;
        Ok(state.banks.clone())
    }

    async fn list_branches(&self, bank_id: i64) -> Result<Vec<Branch>> {
        let mut state = self.state.write().await;
        state.branch_requests.push(bank_id);
        state.check_failure()?;
        Ok(state
            .branches
            .iter()
            .filter(|b| b.bank.id == bank_id)
            .cloned()
            .collect())
    }

    async fn upload_document(&self, upload: DocumentUpload) -> Result<StoredFile> {
        let mut state = self.state.write().await;
        state.check_failure()?;
        let stored = StoredFile {
            filename: format!("{}-{}", state.uploads.len() + 1, upload.file_name),
            original_name: upload.file_name.clone(),
            size: upload.bytes.len() as u64,
        };
        state.uploads.push(upload);
        Ok(stored)
    }

    async fn submit_application(&self, request: &ApplicationRequest) -> Result<ApplicationSummary> {
        let mut state = self.state.write().await;
        state.check_failure()?;
        if request.status == ApplicationStatus::Draft
            && state
                .applications
                .iter()
                .any(|a| a.is_submitted() && a.account_number == request.account_number)
        {
            return Err(KycError::Network("Application already submitted".to_string()));
        }
        state.submissions.push(request.clone());

        let name_of = |id: i64, items: &[(i64, String)]| {
            items
                .iter()
                .find(|(item_id, _)| *item_id == id)
                .map(|(_, value)| NamedRef {
                    value: value.clone(),
                })
                .unwrap_or_default()
        };
        let banks: Vec<(i64, String)> = state.banks.iter().map(|b| (b.id, b.value.clone())).collect();
        let branches: Vec<(i64, String)> = state
            .branches
            .iter()
            .map(|b| (b.id, b.value.clone()))
            .collect();

        let summary = ApplicationSummary {
            id: 0,
            account_name: request.account_name.clone(),
            account_number: request.account_number.clone(),
            status: request.status.to_string(),
            bank: name_of(request.bank_id, &banks),
            branch: name_of(request.branch_id, &branches),
        };

        // Saving the same account again updates the existing application.
        let existing = state
            .applications
            .iter()
            .position(|a| a.account_number == request.account_number);
        let summary = match existing {
            Some(idx) => {
                let id = state.applications[idx].id;
                state.applications[idx] = ApplicationSummary { id, ..summary };
                state.applications[idx].clone()
            }
            None => {
                let summary = ApplicationSummary {
                    id: state.applications.len() as i64 + 1,
                    ..summary
                };
                state.applications.push(summary.clone());
                summary
            }
        };
        Ok(summary)
    }

    async fn create_transaction(&self, request: &TransactionRequest) -> Result<TransactionRecord> {
        let mut state = self.state.write().await;
        state.check_failure()?;
        if !state
            .applications
            .iter()
            .any(|a| a.is_submitted() && a.account_number == request.account_number)
        {
            return Err(KycError::Network(format!(
                "No submitted application for account {}",
                request.account_number
            )));
        }
        let id = state.transactions.len() as i64 + 1;
        let record = TransactionRecord {
            id,
            transaction_id: format!("TXN{id:06}"),
            value: request.narration.clone(),
            status: TransactionStatus::Success,
            created_at: String::new(),
        };
        state.transactions.push(record.clone());
        Ok(record)
    }

    async fn reverse_transaction(&self, request: &ReverseRequest) -> Result<TransactionRecord> {
        let mut state = self.state.write().await;
        state.check_failure()?;
        let record = state
            .transactions
            .iter_mut()
            .find(|t| t.transaction_id == request.transaction_id)
            .ok_or_else(|| KycError::Network("Transaction not found".to_string()))?;
        if record.status == TransactionStatus::Reversed {
            return Err(KycError::Network("Transaction already reversed".to_string()));
        }
        record.status = TransactionStatus::Reversed;
        Ok(record.clone())
    }

    async fn list_applications(&self) -> Result<Vec<ApplicationSummary>> {
        let mut state = self.state.write().await;
        state.check_failure()?;
        Ok(state.applications.clone())
    }

    async fn list_transactions(&self) -> Result<Vec<TransactionRecord>> {
        let mut state = self.state.write().await;
        state.check_failure()?;
        Ok(state.transactions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(id: i64, bank: i64) -> Branch {
        Branch {
            id,
            value: format!("Branch {id}"),
            bank: Bank {
                id: bank,
                value: format!("Bank {bank}"),
            },
        }
    }

    #[tokio::test]
    async fn test_in_memory_session_store() {
        let store = InMemorySessionStore::new();
        assert!(store.get("kycFormData").await.unwrap().is_none());

        store.set("kycFormData", "{}".into()).await.unwrap();
        assert_eq!(store.get("kycFormData").await.unwrap().as_deref(), Some("{}"));

        // Clones share the map.
        let other = store.clone();
        other.remove("kycFormData").await.unwrap();
        assert!(store.get("kycFormData").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_branches_filtered_by_bank() {
        let gateway = InMemoryApiGateway::new();
        gateway.add_branch(branch(1, 1)).await;
        gateway.add_branch(branch(2, 1)).await;
        gateway.add_branch(branch(3, 2)).await;

        assert_eq!(gateway.list_banks().await.unwrap().len(), 2);
        let branches = gateway.list_branches(1).await.unwrap();
        assert_eq!(branches.iter().map(|b| b.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(gateway.branch_requests().await, vec![1]);
    }

    #[tokio::test]
    async fn test_fail_next_is_one_shot() {
        let gateway = InMemoryApiGateway::new();
        gateway.fail_next("Failed to fetch banks").await;

        let err = gateway.list_banks().await.unwrap_err();
        assert!(matches!(err, KycError::Network(ref m) if m == "Failed to fetch banks"));
        assert!(gateway.list_banks().await.is_ok());
    }

    #[tokio::test]
    async fn test_resubmission_updates_application() {
        let gateway = InMemoryApiGateway::new();
        gateway.add_branch(branch(2, 1)).await;
        let mut request = ApplicationRequest {
            bank_id: 1,
            branch_id: 2,
            account_name: "Jane Doe".into(),
            account_number: "12345678".into(),
            status: ApplicationStatus::Draft,
            file_name: None,
            original_file_name: None,
            file_size: None,
        };
        let first = gateway.submit_application(&request).await.unwrap();
        request.status = ApplicationStatus::Submitted;
        let second = gateway.submit_application(&request).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.status, "SUBMITTED");
        assert_eq!(second.bank.value, "Bank 1");
        assert_eq!(gateway.list_applications().await.unwrap().len(), 1);
        assert_eq!(gateway.submissions().await.len(), 2);
    }

    #[tokio::test]
    async fn test_submitted_application_cannot_return_to_draft() {
        let gateway = InMemoryApiGateway::new();
        gateway.add_branch(branch(2, 1)).await;
        let mut request = ApplicationRequest {
            bank_id: 1,
            branch_id: 2,
            account_name: "Jane Doe".into(),
            account_number: "12345678".into(),
            status: ApplicationStatus::Submitted,
            file_name: None,
            original_file_name: None,
            file_size: None,
        };
        gateway.submit_application(&request).await.unwrap();

        request.status = ApplicationStatus::Draft;
        let err = gateway.submit_application(&request).await.unwrap_err();
        assert_eq!(err.to_string(), "Application already submitted");

        let applications = gateway.list_applications().await.unwrap();
        assert!(applications[0].is_submitted());
        assert_eq!(gateway.submissions().await.len(), 1);
    }
}
