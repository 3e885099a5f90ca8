use crate::domain::step::{Route, Step};
use crate::domain::validation::ValidationErrors;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum KycError {
    #[error("Validation failed:\n{0}")]
    #[diagnostic(code(kyc::validation))]
    Validation(ValidationErrors),

    #[error("{0}")]
    #[diagnostic(code(kyc::network))]
    Network(String),

    #[error("No application in progress")]
    #[diagnostic(
        code(kyc::missing_state),
        help("start again from the entry step with `kycflow apply`")
    )]
    MissingState,

    #[error("Cannot {action} while at step {from}")]
    #[diagnostic(code(kyc::invalid_transition))]
    InvalidTransition { from: Step, action: &'static str },

    #[error("Please fill all fields")]
    #[diagnostic(code(kyc::incomplete_form))]
    IncompleteForm,

    #[error("Invalid amount: {0}")]
    #[diagnostic(code(kyc::invalid_amount))]
    InvalidAmount(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl KycError {
    /// Where the user should be sent after this error, if anywhere.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            KycError::MissingState => Some(Route::Entry),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for KycError {
    fn from(err: reqwest::Error) -> Self {
        KycError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KycError>;
