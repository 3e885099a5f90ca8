use crate::domain::application::{ApplicationRecord, ApplicationStatus, DocumentUpload};
use crate::domain::directory::{Bank, Branch, parse_bank_id};
use crate::domain::ports::{ApiGatewayBox, SessionStoreBox};
use crate::domain::review::ReviewedApplication;
use crate::domain::step::Step;
use crate::domain::transaction::ApplicationSummary;
use crate::domain::validation::{self, ValidationErrors};
use crate::error::{KycError, Result};
use tracing::{info, warn};

/// Session key under which the reviewed application is kept.
pub const SESSION_KEY: &str = "kycFormData";

/// Drives one merchant's application through the onboarding steps.
///
/// Edits are synchronous and only allowed on the entry steps. A step can be
/// left only once its own fields validate. Reaching `Review` persists the
/// application in the session store; saving a draft or submitting sends it to
/// the API and clears the stored copy.
pub struct OnboardingFlow {
    gateway: ApiGatewayBox,
    session: SessionStoreBox,
    record: ApplicationRecord,
    banks: Vec<Bank>,
    branches: Vec<Branch>,
    step: Step,
    reviewed: Option<ReviewedApplication>,
}

impl OnboardingFlow {
    /// Starts an empty application at the first step.
    pub fn new(gateway: ApiGatewayBox, session: SessionStoreBox) -> Self {
        Self {
            gateway,
            session,
            record: ApplicationRecord::new(),
            banks: Vec::new(),
            branches: Vec::new(),
            step: Step::BankAndBranch,
            reviewed: None,
        }
    }

    /// Loads the review page from the session store.
    ///
    /// Fails with [`KycError::MissingState`] when nothing is stored or the
    /// stored application no longer validates.
    pub async fn resume(gateway: ApiGatewayBox, session: SessionStoreBox) -> Result<Self> {
        let Some(raw) = session.get(SESSION_KEY).await? else {
            return Err(KycError::MissingState);
        };
        let reviewed: ReviewedApplication = serde_json::from_str(&raw).map_err(|e| {
            warn!(error = %e, "discarding unreadable stored application");
            KycError::MissingState
        })?;

        Ok(Self {
            gateway,
            session,
            record: reviewed.record().clone(),
            banks: vec![reviewed.bank().clone()],
            branches: vec![reviewed.branch().clone()],
            step: Step::Review,
            reviewed: Some(reviewed),
        })
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn record(&self) -> &ApplicationRecord {
        &self.record
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// The validated application shown on the review page.
    pub fn reviewed(&self) -> Option<&ReviewedApplication> {
        self.reviewed.as_ref()
    }

    /// Errors for every field of the current record.
    pub fn errors(&self) -> ValidationErrors {
        validation::validate(&self.record, &self.branches)
    }

    /// Errors for the fields of the current step only.
    pub fn step_errors(&self) -> ValidationErrors {
        validation::validate_step(&self.record, &self.branches, self.step)
    }

    pub async fn load_banks(&mut self) -> Result<&[Bank]> {
        self.banks = self.gateway.list_banks().await.inspect_err(|e| {
            warn!(error = %e, "failed to load banks");
        })?;
        Ok(&self.banks)
    }

    /// Selects a bank. The branch selection is cleared.
    pub fn select_bank(&mut self, bank_id: &str) -> Result<()> {
        self.ensure_editable("select a bank")?;
        self.record.select_bank(bank_id);
        Ok(())
    }

    /// Fetches the branches of the bank currently selected.
    ///
    /// Selections that cannot name a bank yield an empty list without a call.
    pub async fn load_branches(&self) -> Result<Vec<Branch>> {
        match parse_bank_id(self.record.bank_id()) {
            Some(bank_id) => self.gateway.list_branches(bank_id).await.inspect_err(|e| {
                warn!(bank_id, error = %e, "failed to load branches");
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the branch list with `branches`, whatever bank they were
    /// requested for.
    ///
    /// Known defect: responses are applied in the order they resolve, not the
    /// order they were issued, so a slow reply for an earlier bank can
    /// overwrite the list of the bank selected since. Validation still
    /// rejects a branch that does not belong to the selected bank.
    pub fn apply_branches(&mut self, branches: Vec<Branch>) {
        self.branches = branches;
    }

    /// Selects a bank and reloads its branches.
    pub async fn choose_bank(&mut self, bank_id: &str) -> Result<()> {
        self.select_bank(bank_id)?;
        let branches = self.load_branches().await?;
        self.apply_branches(branches);
        Ok(())
    }

    pub fn select_branch(&mut self, branch_id: &str) -> Result<()> {
        self.ensure_editable("select a branch")?;
        self.record.select_branch(branch_id);
        Ok(())
    }

    pub fn set_account_name(&mut self, name: &str) -> Result<()> {
        self.ensure_editable("edit the account name")?;
        self.record.set_account_name(name);
        Ok(())
    }

    pub fn set_account_number(&mut self, number: &str) -> Result<()> {
        self.ensure_editable("edit the account number")?;
        self.record.set_account_number(number);
        Ok(())
    }

    /// Attaches the proof document and uploads it right away.
    ///
    /// A failed upload leaves no document attached.
    pub async fn attach_document(&mut self, upload: DocumentUpload) -> Result<()> {
        self.ensure_editable("attach a document")?;
        self.record.attach_document(upload.descriptor());
        match self.gateway.upload_document(upload).await {
            Ok(stored) => {
                self.record.record_upload(stored);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "document upload failed");
                self.record.detach_document();
                Err(e)
            }
        }
    }

    /// Leaves the current entry step once its fields validate.
    pub async fn advance(&mut self) -> Result<Step> {
        let Some(next) = self.step.next() else {
            return Err(self.invalid("advance"));
        };
        let errors = self.step_errors();
        if !errors.is_empty() {
            return Err(KycError::Validation(errors));
        }
        if next == Step::Review {
            self.enter_review().await?;
        } else {
            info!(from = %self.step, to = %next, "step completed");
            self.step = next;
        }
        Ok(self.step)
    }

    /// Validates every entry field at once and moves to `Review`.
    pub async fn proceed_to_review(&mut self) -> Result<Step> {
        if !Step::ENTRY.contains(&self.step) {
            return Err(self.invalid("proceed to review"));
        }
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(KycError::Validation(errors));
        }
        self.enter_review().await?;
        Ok(self.step)
    }

    async fn enter_review(&mut self) -> Result<()> {
        let reviewed = ReviewedApplication::new(self.record.clone(), &self.branches)?;
        let snapshot = serde_json::to_string(&reviewed)?;
        self.session.set(SESSION_KEY, snapshot).await?;

        info!(from = %self.step, "application ready for review");
        self.reviewed = Some(reviewed);
        self.step = Step::Review;
        Ok(())
    }

    /// Goes back from `Review` to the entry steps keeping what was entered.
    pub fn edit(&mut self) -> Result<Step> {
        if self.step != Step::Review {
            return Err(self.invalid("edit"));
        }
        self.reviewed = None;
        self.step = Step::BankAndBranch;
        Ok(self.step)
    }

    /// Saves the reviewed application as a draft.
    pub async fn save_draft(&mut self) -> Result<ApplicationSummary> {
        self.finish(ApplicationStatus::Draft).await
    }

    /// Submits the reviewed application.
    pub async fn submit(&mut self) -> Result<ApplicationSummary> {
        self.finish(ApplicationStatus::Submitted).await
    }

    async fn finish(&mut self, status: ApplicationStatus) -> Result<ApplicationSummary> {
        let action = match status {
            ApplicationStatus::Draft => "save a draft",
            ApplicationStatus::Submitted => "submit",
        };
        if self.step != Step::Review {
            return Err(self.invalid(action));
        }
        let reviewed = self.reviewed.as_ref().ok_or(KycError::MissingState)?;

        let request = reviewed.to_request(status);
        let summary = self
            .gateway
            .submit_application(&request)
            .await
            .inspect_err(|e| warn!(%status, error = %e, "failed to save application"))?;

        self.step = match status {
            ApplicationStatus::Draft => Step::Draft,
            ApplicationStatus::Submitted => {
                self.record.mark_submitted();
                Step::Submitted
            }
        };
        info!(%status, id = summary.id, "application saved");

        // Terminal from here on, even if the stored copy lingers.
        if let Err(e) = self.session.remove(SESSION_KEY).await {
            warn!(error = %e, "failed to clear stored application");
        }
        Ok(summary)
    }

    fn ensure_editable(&self, action: &'static str) -> Result<()> {
        if Step::ENTRY.contains(&self.step) {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> KycError {
        KycError::InvalidTransition {
            from: self.step,
            action,
        }
    }
}
