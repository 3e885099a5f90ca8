use crate::domain::transaction::{ApplicationSummary, TransactionRecord, TransactionStatus};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ApplicationRow<'a> {
    id: i64,
    account_name: &'a str,
    account_number: &'a str,
    status: &'a str,
    bank: &'a str,
    branch: &'a str,
}

#[derive(Serialize)]
struct TransactionRow<'a> {
    id: i64,
    transaction_id: &'a str,
    narration: &'a str,
    status: &'a str,
    created_at: &'a str,
}

/// Writes API listings as CSV, one header row followed by one row per item.
pub struct ListingWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ListingWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_applications<'a, I>(&mut self, applications: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a ApplicationSummary>,
    {
        let mut wrote_any = false;
        for app in applications {
            self.writer.serialize(ApplicationRow {
                id: app.id,
                account_name: &app.account_name,
                account_number: &app.account_number,
                status: &app.status,
                bank: &app.bank.value,
                branch: &app.branch.value,
            })?;
            wrote_any = true;
        }
        if !wrote_any {
            self.writer.write_record([
                "id",
                "account_name",
                "account_number",
                "status",
                "bank",
                "branch",
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_transactions<'a, I>(&mut self, transactions: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let mut wrote_any = false;
        for tx in transactions {
            self.writer.serialize(TransactionRow {
                id: tx.id,
                transaction_id: &tx.transaction_id,
                narration: &tx.value,
                status: status_label(&tx.status),
                created_at: &tx.created_at,
            })?;
            wrote_any = true;
        }
        if !wrote_any {
            self.writer
                .write_record(["id", "transaction_id", "narration", "status", "created_at"])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

fn status_label(status: &TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Success => "SUCCESS",
        TransactionStatus::Reversed => "REVERSED",
        TransactionStatus::Other => "OTHER",
    }
}
