use crate::domain::application::{
    ApplicationRecord, ApplicationStatus, DocumentDescriptor, StoredFile,
};
use crate::domain::directory::{Bank, Branch};
use crate::domain::step::Step;
use crate::domain::validation::{self, Field};
use crate::error::{KycError, Result};
use serde::{Deserialize, Serialize};

/// Body of `POST /applications/submit`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    pub bank_id: i64,
    pub branch_id: i64,
    pub account_name: String,
    pub account_number: String,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

/// What the review step keeps under the session key: the record plus the
/// branch it was validated against.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ReviewSnapshot {
    pub record: ApplicationRecord,
    pub branch: Branch,
}

/// An application whose entry steps have all validated.
///
/// Only obtainable through [`ReviewedApplication::new`], including when read
/// back from the session store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(try_from = "ReviewSnapshot", into = "ReviewSnapshot")]
pub struct ReviewedApplication {
    record: ApplicationRecord,
    branch: Branch,
}

impl ReviewedApplication {
    /// Validates `record` against the branches loaded for its bank.
    ///
    /// Only unsent applications can be reviewed; a submitted record is
    /// rejected.
    pub fn new(record: ApplicationRecord, branches: &[Branch]) -> Result<Self> {
        if record.status() != ApplicationStatus::Draft {
            return Err(KycError::InvalidTransition {
                from: Step::Submitted,
                action: "review",
            });
        }
        let errors = validation::validate(&record, branches);
        if !errors.is_empty() {
            return Err(KycError::Validation(errors));
        }
        let Some(branch) = branches
            .iter()
            .find(|b| b.matches(record.bank_id(), record.branch_id()))
            .cloned()
        else {
            return Err(KycError::Validation(validation::validate_fields(
                &record,
                &[],
                &[Field::BranchId],
            )));
        };
        Ok(Self { record, branch })
    }

    pub fn record(&self) -> &ApplicationRecord {
        &self.record
    }

    pub fn bank(&self) -> &Bank {
        &self.branch.bank
    }

    pub fn branch(&self) -> &Branch {
        &self.branch
    }

    pub fn document(&self) -> Option<&DocumentDescriptor> {
        self.record.proof_document()
    }

    /// Builds the submit payload with the given status.
    pub fn to_request(&self, status: ApplicationStatus) -> ApplicationRequest {
        let stored: Option<&StoredFile> = self.record.stored_document();
        ApplicationRequest {
            bank_id: self.branch.bank.id,
            branch_id: self.branch.id,
            account_name: self.record.account_name().to_string(),
            account_number: self.record.account_number().to_string(),
            status,
            file_name: stored.map(|s| s.filename.clone()),
            original_file_name: stored.map(|s| s.original_name.clone()),
            file_size: stored.map(|s| s.size),
        }
    }
}

impl TryFrom<ReviewSnapshot> for ReviewedApplication {
    type Error = KycError;

    fn try_from(snapshot: ReviewSnapshot) -> Result<Self> {
        Self::new(snapshot.record, std::slice::from_ref(&snapshot.branch))
    }
}

impl From<ReviewedApplication> for ReviewSnapshot {
    fn from(app: ReviewedApplication) -> Self {
        Self {
            record: app.record,
            branch: app.branch,
        }
    }
}
