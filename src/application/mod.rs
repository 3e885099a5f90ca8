//! Application layer orchestrating the onboarding screens.
//!
//! `OnboardingFlow` moves one application through the form steps and hands it
//! to the API; `TransactionDesk` backs the transaction-management screen. Both
//! receive their collaborators at construction.

pub mod flow;
pub mod transactions;
