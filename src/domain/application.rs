use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an application record. `Submitted` is terminal.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationStatus {
    #[default]
    Draft,
    Submitted,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::Draft => write!(f, "DRAFT"),
            ApplicationStatus::Submitted => write!(f, "SUBMITTED"),
        }
    }
}

/// Client-side description of the proof-of-account file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescriptor {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

/// What the upload endpoint reports back after storing a document.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub filename: String,
    pub original_name: String,
    pub size: u64,
}

/// A document ready to be sent to the upload endpoint.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentUpload {
    pub fn descriptor(&self) -> DocumentDescriptor {
        DocumentDescriptor {
            name: self.file_name.clone(),
            size: self.bytes.len() as u64,
            mime_type: self.mime_type.clone(),
        }
    }
}

/// The onboarding record built up field by field across the form steps.
///
/// Fields are only reachable through the mutators below so that changing
/// the bank always drops the previously chosen branch.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    bank_id: String,
    branch_id: String,
    account_name: String,
    account_number: String,
    proof_document: Option<DocumentDescriptor>,
    #[serde(default)]
    stored_document: Option<StoredFile>,
    #[serde(default)]
    status: ApplicationStatus,
}

impl ApplicationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bank_id(&self) -> &str {
        &self.bank_id
    }

    pub fn branch_id(&self) -> &str {
        &self.branch_id
    }

    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    pub fn proof_document(&self) -> Option<&DocumentDescriptor> {
        self.proof_document.as_ref()
    }

    pub fn stored_document(&self) -> Option<&StoredFile> {
        self.stored_document.as_ref()
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    /// Selects a bank and clears the branch, which belonged to the old one.
    pub fn select_bank(&mut self, bank_id: impl Into<String>) {
        self.bank_id = bank_id.into();
        self.branch_id.clear();
    }

    pub fn select_branch(&mut self, branch_id: impl Into<String>) {
        self.branch_id = branch_id.into();
    }

    pub fn set_account_name(&mut self, name: impl Into<String>) {
        self.account_name = name.into();
    }

    pub fn set_account_number(&mut self, number: impl Into<String>) {
        self.account_number = number.into();
    }

    /// Attaches a new document; any earlier upload result no longer applies.
    pub fn attach_document(&mut self, document: DocumentDescriptor) {
        self.proof_document = Some(document);
        self.stored_document = None;
    }

    pub fn detach_document(&mut self) {
        self.proof_document = None;
        self.stored_document = None;
    }

    pub fn record_upload(&mut self, stored: StoredFile) {
        self.stored_document = Some(stored);
    }

    /// Marks the record submitted. There is no way back to `Draft`.
    pub(crate) fn mark_submitted(&mut self) {
        self.status = ApplicationStatus::Submitted;
    }

    // Builder-style helpers, mostly for assembling fixtures.

    pub fn with_bank(mut self, bank_id: impl Into<String>) -> Self {
        self.select_bank(bank_id);
        self
    }

    pub fn with_branch(mut self, branch_id: impl Into<String>) -> Self {
        self.select_branch(branch_id);
        self
    }

    pub fn with_account(mut self, name: impl Into<String>, number: impl Into<String>) -> Self {
        self.set_account_name(name);
        self.set_account_number(number);
        self
    }

    pub fn with_document(mut self, document: DocumentDescriptor) -> Self {
        self.attach_document(document);
        self
    }
}
