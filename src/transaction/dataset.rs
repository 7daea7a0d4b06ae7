//! Reads the static JSON dataset of transactions.

use std::{collections::HashSet, fs, path::Path};

use crate::Error;

use super::TransactionRecord;

/// Read and validate the transaction dataset at `path`.
///
/// The file must contain a JSON array of [TransactionRecord] objects.
///
/// # Errors
/// Returns [Error::DatasetRead] if the file cannot be read and
/// [Error::InvalidDataset] if the contents are not a valid dataset, see
/// [parse_transactions].
pub fn load_transactions(path: &Path) -> Result<Vec<TransactionRecord>, Error> {
    let text = fs::read_to_string(path).map_err(|error| {
        tracing::error!("could not read the dataset at {path:?}: {error}");
        Error::DatasetRead(format!("{}: {error}", path.display()))
    })?;

    let transactions = parse_transactions(&text)?;
    tracing::info!(
        "Loaded {} transactions from {}",
        transactions.len(),
        path.display()
    );

    Ok(transactions)
}

/// Parse and validate a JSON array of transaction records.
///
/// # Errors
/// Returns [Error::InvalidDataset] if:
/// - the text is not a JSON array of records,
/// - two records share an ID,
/// - a record has an empty category.
pub fn parse_transactions(text: &str) -> Result<Vec<TransactionRecord>, Error> {
    let transactions: Vec<TransactionRecord> =
        serde_json::from_str(text).map_err(|error| Error::InvalidDataset(error.to_string()))?;

    let mut seen_ids = HashSet::with_capacity(transactions.len());

    for transaction in &transactions {
        if !seen_ids.insert(transaction.id) {
            return Err(Error::InvalidDataset(format!(
                "the ID {} is used by more than one transaction",
                transaction.id
            )));
        }

        if transaction.category.trim().is_empty() {
            return Err(Error::InvalidDataset(format!(
                "transaction {} has an empty category",
                transaction.id
            )));
        }
    }

    Ok(transactions)
}
