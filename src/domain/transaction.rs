use crate::error::KycError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A positive monetary amount for a transaction.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Amount(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, KycError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(KycError::InvalidAmount(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = KycError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Amount {
    type Err = KycError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| KycError::InvalidAmount(format!("{s}: {e}")))?;
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Body of `POST /transaction`.
#[derive(Debug, Serialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub account_number: String,
    pub amount: Amount,
    pub narration: String,
}

/// Body of `POST /reverse`.
#[derive(Debug, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReverseRequest {
    pub transaction_id: String,
    pub reason: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Success,
    Reversed,
    #[serde(other)]
    Other,
}

/// A transaction as listed by the API. `value` holds the narration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: i64,
    pub transaction_id: String,
    pub value: String,
    pub status: TransactionStatus,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct NamedRef {
    pub value: String,
}

/// A stored application as listed by the API.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    pub id: i64,
    pub account_name: String,
    pub account_number: String,
    pub status: String,
    #[serde(default)]
    pub bank: NamedRef,
    #[serde(default)]
    pub branch: NamedRef,
}

impl ApplicationSummary {
    pub fn is_submitted(&self) -> bool {
        self.status == "SUBMITTED"
    }
}

/// Raw input of the create-transaction form.
#[derive(Debug, Clone, Default)]
pub struct TransactionForm {
    pub account_number: String,
    pub amount: String,
    pub narration: String,
}

impl TransactionForm {
    pub fn into_request(self) -> Result<TransactionRequest, KycError> {
        if self.account_number.is_empty() || self.amount.is_empty() || self.narration.is_empty() {
            return Err(KycError::IncompleteForm);
        }
        Ok(TransactionRequest {
            amount: self.amount.parse()?,
            account_number: self.account_number,
            narration: self.narration,
        })
    }
}

/// Raw input of the reverse-transaction form.
#[derive(Debug, Clone, Default)]
pub struct ReverseForm {
    pub transaction_id: String,
    pub reason: String,
}

impl ReverseForm {
    pub fn into_request(self) -> Result<ReverseRequest, KycError> {
        if self.transaction_id.is_empty() || self.reason.is_empty() {
            return Err(KycError::IncompleteForm);
        }
        Ok(ReverseRequest {
            transaction_id: self.transaction_id,
            reason: self.reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(KycError::InvalidAmount(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(KycError::InvalidAmount(_))
        ));
        assert!(matches!(
            "ten".parse::<Amount>(),
            Err(KycError::InvalidAmount(_))
        ));
        assert_eq!(" 12.50 ".parse::<Amount>().unwrap().value(), dec!(12.50));
    }

    #[test]
    fn test_transaction_request_sends_amount_as_number() {
        let request = TransactionForm {
            account_number: "12345678".into(),
            amount: "250.75".into(),
            narration: "Settlement".into(),
        }
        .into_request()
        .unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["accountNumber"], "12345678");
        assert_eq!(json["amount"], serde_json::json!(250.75));
        assert_eq!(json["narration"], "Settlement");
    }

    #[test]
    fn test_incomplete_forms() {
        let form = TransactionForm {
            account_number: "12345678".into(),
            amount: String::new(),
            narration: "x".into(),
        };
        assert!(matches!(form.into_request(), Err(KycError::IncompleteForm)));

        let reverse = ReverseForm {
            transaction_id: "TX1".into(),
            reason: String::new(),
        };
        assert!(matches!(reverse.into_request(), Err(KycError::IncompleteForm)));
    }

    #[test]
    fn test_transaction_record_deserialization() {
        let json = r#"[
            {"id":1,"transactionId":"TX1","value":"Rent","status":"SUCCESS","createdAt":"2024-01-01T10:00:00"},
            {"id":2,"transactionId":"TX2","value":"Refund","status":"PENDING"}
        ]"#;
        let records: Vec<TransactionRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(records[0].status, TransactionStatus::Success);
        assert_eq!(records[1].status, TransactionStatus::Other);
        assert_eq!(records[1].created_at, "");
    }

    #[test]
    fn test_application_summary_submitted() {
        let json = r#"{"id":3,"accountName":"Jane","accountNumber":"12345678","status":"SUBMITTED","bank":{"value":"Chase"},"branch":{"value":"Downtown"}}"#;
        let app: ApplicationSummary = serde_json::from_str(json).unwrap();
        assert!(app.is_submitted());
        assert_eq!(app.bank.value, "Chase");
    }
}
