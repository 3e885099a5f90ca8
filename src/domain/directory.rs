use serde::{Deserialize, Serialize};

/// An entry of the externally owned bank directory.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Bank {
    pub id: i64,
    pub value: String,
}

/// A branch, always reported together with the bank it belongs to.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Branch {
    pub id: i64,
    pub value: String,
    pub bank: Bank,
}

impl Branch {
    /// Whether this branch is `branch_id` of the bank identified by `bank_id`.
    ///
    /// Form ids are read with [`parse_id`], the same way the branch lookup
    /// reads the bank id.
    pub fn matches(&self, bank_id: &str, branch_id: &str) -> bool {
        parse_id(branch_id) == Some(self.id) && parse_bank_id(bank_id) == Some(self.bank.id)
    }
}

/// Parses a form id. Surrounding whitespace is ignored.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Parses a form bank id into the numeric id used by the branch lookup.
///
/// Empty, non-numeric and zero ids select nothing.
pub fn parse_bank_id(raw: &str) -> Option<i64> {
    parse_id(raw).filter(|id| *id != 0)
}
