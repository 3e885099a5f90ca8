//! Field rules for the onboarding record.
//!
//! Validation is pure: it reads the record (and the branch list loaded for
//! the selected bank) and reports one message per failing field.

use crate::domain::application::ApplicationRecord;
use crate::domain::directory::Branch;
use crate::domain::step::Step;
use regex::Regex;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

pub const MAX_DOCUMENT_SIZE: u64 = 5 * 1024 * 1024;
pub const MIN_ACCOUNT_NUMBER_LEN: usize = 8;
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["application/pdf", "image/png", "image/jpeg"];

pub const BANK_REQUIRED: &str = "Bank name is required";
pub const BRANCH_REQUIRED: &str = "Branch name is required";
pub const BRANCH_NOT_OF_BANK: &str = "Branch does not belong to the selected bank";
pub const ACCOUNT_NAME_REQUIRED: &str = "Account name is required";
pub const ACCOUNT_NUMBER_REQUIRED: &str = "Account number is required";
pub const ACCOUNT_NUMBER_NOT_NUMERIC: &str = "Account number must contain only numbers";
pub const ACCOUNT_NUMBER_TOO_SHORT: &str = "Account number must be at least 8 digits";
pub const DOCUMENT_REQUIRED: &str = "Proof of bank account is required";
pub const DOCUMENT_BAD_TYPE: &str = "File must be PDF, PNG, or JPG format";
pub const DOCUMENT_TOO_LARGE: &str = "File size must be less than 5MB";

// ASCII digits only; `\d` in `regex` would also accept other Unicode digits.
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub enum Field {
    BankId,
    BranchId,
    AccountName,
    AccountNumber,
    ProofDocument,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::BankId,
        Field::BranchId,
        Field::AccountName,
        Field::AccountNumber,
        Field::ProofDocument,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::BankId => "bankId",
            Field::BranchId => "branchId",
            Field::AccountName => "accountName",
            Field::AccountNumber => "accountNumber",
            Field::ProofDocument => "proofDocument",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Field name to message. Empty means the checked fields are valid.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Validates every field of the record.
pub fn validate(record: &ApplicationRecord, branches: &[Branch]) -> ValidationErrors {
    validate_fields(record, branches, &Field::ALL)
}

/// Validates only the fields owned by `step`.
pub fn validate_step(record: &ApplicationRecord, branches: &[Branch], step: Step) -> ValidationErrors {
    validate_fields(record, branches, step.fields())
}

pub fn validate_fields(
    record: &ApplicationRecord,
    branches: &[Branch],
    fields: &[Field],
) -> ValidationErrors {
    let mut errors = ValidationErrors::default();
    for field in fields {
        let outcome = match field {
            Field::BankId => check_bank(record),
            Field::BranchId => check_branch(record, branches),
            Field::AccountName => check_account_name(record),
            Field::AccountNumber => check_account_number(record),
            Field::ProofDocument => check_document(record),
        };
        if let Err(message) = outcome {
            errors.insert(*field, message);
        }
    }
    errors
}

fn check_bank(record: &ApplicationRecord) -> Result<(), &'static str> {
    if record.bank_id().is_empty() {
        return Err(BANK_REQUIRED);
    }
    Ok(())
}

fn check_branch(record: &ApplicationRecord, branches: &[Branch]) -> Result<(), &'static str> {
    if record.branch_id().is_empty() {
        return Err(BRANCH_REQUIRED);
    }
    if !branches
        .iter()
        .any(|b| b.matches(record.bank_id(), record.branch_id()))
    {
        return Err(BRANCH_NOT_OF_BANK);
    }
    Ok(())
}

fn check_account_name(record: &ApplicationRecord) -> Result<(), &'static str> {
    if record.account_name().trim().is_empty() {
        return Err(ACCOUNT_NAME_REQUIRED);
    }
    Ok(())
}

fn check_account_number(record: &ApplicationRecord) -> Result<(), &'static str> {
    let number = record.account_number();
    if number.is_empty() {
        Err(ACCOUNT_NUMBER_REQUIRED)
    } else if !DIGITS.is_match(number) {
        Err(ACCOUNT_NUMBER_NOT_NUMERIC)
    } else if number.len() < MIN_ACCOUNT_NUMBER_LEN {
        Err(ACCOUNT_NUMBER_TOO_SHORT)
    } else {
        Ok(())
    }
}

fn check_document(record: &ApplicationRecord) -> Result<(), &'static str> {
    let Some(document) = record.proof_document() else {
        return Err(DOCUMENT_REQUIRED);
    };
    // Type is reported ahead of size so a disallowed type never passes as a size issue.
    if !ALLOWED_MIME_TYPES.contains(&document.mime_type.as_str()) {
        return Err(DOCUMENT_BAD_TYPE);
    }
    if document.size > MAX_DOCUMENT_SIZE {
        return Err(DOCUMENT_TOO_LARGE);
    }
    Ok(())
}
