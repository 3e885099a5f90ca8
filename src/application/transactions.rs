use crate::domain::ports::ApiGatewayBox;
use crate::domain::transaction::{
    ApplicationSummary, ReverseForm, TransactionForm, TransactionRecord, TransactionStatus,
};
use crate::error::Result;
use tracing::{info, warn};

/// Backs the transaction-management screen: lists applications and
/// transactions, creates transactions against submitted accounts and
/// reverses successful ones.
pub struct TransactionDesk {
    gateway: ApiGatewayBox,
    applications: Vec<ApplicationSummary>,
    transactions: Vec<TransactionRecord>,
}

impl TransactionDesk {
    pub fn new(gateway: ApiGatewayBox) -> Self {
        Self {
            gateway,
            applications: Vec::new(),
            transactions: Vec::new(),
        }
    }

    /// Fetches applications and transactions concurrently.
    pub async fn load(&mut self) -> Result<()> {
        let (applications, transactions) = tokio::try_join!(
            self.gateway.list_applications(),
            self.gateway.list_transactions()
        )?;
        self.applications = applications;
        self.transactions = transactions;
        Ok(())
    }

    pub fn applications(&self) -> &[ApplicationSummary] {
        &self.applications
    }

    pub fn transactions(&self) -> &[TransactionRecord] {
        &self.transactions
    }

    /// Applications that may receive transactions.
    pub fn submitted_accounts(&self) -> impl Iterator<Item = &ApplicationSummary> {
        self.applications.iter().filter(|a| a.is_submitted())
    }

    /// Transactions that may still be reversed.
    pub fn reversible_transactions(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Success)
    }

    pub async fn create_transaction(&mut self, form: TransactionForm) -> Result<TransactionRecord> {
        let request = form.into_request()?;
        let record = self.gateway.create_transaction(&request).await?;
        info!(transaction_id = %record.transaction_id, "transaction created");
        self.refresh().await;
        Ok(record)
    }

    pub async fn reverse_transaction(&mut self, form: ReverseForm) -> Result<TransactionRecord> {
        let request = form.into_request()?;
        let record = self.gateway.reverse_transaction(&request).await?;
        info!(transaction_id = %record.transaction_id, "transaction reversed");
        self.refresh().await;
        Ok(record)
    }

    // The action already succeeded; a failed reload only leaves stale lists.
    async fn refresh(&mut self) {
        if let Err(e) = self.load().await {
            warn!(error = %e, "failed to reload transaction data");
        }
    }
}
