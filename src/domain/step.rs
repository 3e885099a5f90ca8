use crate::domain::validation::Field;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The ordered steps of the onboarding form.
///
/// `BankAndBranch → AccountDetails → Document → Review → {Draft, Submitted}`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    BankAndBranch,
    AccountDetails,
    Document,
    Review,
    Draft,
    Submitted,
}

impl Step {
    /// Steps the user fills in before reaching `Review`.
    pub const ENTRY: [Step; 3] = [Step::BankAndBranch, Step::AccountDetails, Step::Document];

    /// Fields owned by this step; they must validate before it can be left.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Step::BankAndBranch => &[Field::BankId, Field::BranchId],
            Step::AccountDetails => &[Field::AccountName, Field::AccountNumber],
            Step::Document => &[Field::ProofDocument],
            Step::Review | Step::Draft | Step::Submitted => &[],
        }
    }

    /// The step reached by leaving this one forward, if any.
    pub fn next(self) -> Option<Step> {
        match self {
            Step::BankAndBranch => Some(Step::AccountDetails),
            Step::AccountDetails => Some(Step::Document),
            Step::Document => Some(Step::Review),
            Step::Review | Step::Draft | Step::Submitted => None,
        }
    }

    /// The page shown while the flow sits at this step.
    pub fn route(self) -> Route {
        match self {
            Step::BankAndBranch | Step::AccountDetails | Step::Document => Route::Entry,
            Step::Review | Step::Draft => Route::Review,
            Step::Submitted => Route::Success,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::BankAndBranch => "bank_and_branch",
            Step::AccountDetails => "account_details",
            Step::Document => "document",
            Step::Review => "review",
            Step::Draft => "draft",
            Step::Submitted => "submitted",
        };
        f.write_str(name)
    }
}

/// Pages of the two-page flow plus the success page.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Route {
    Entry,
    Review,
    Success,
}
