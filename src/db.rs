//! Sets up the application's database.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::user::create_user_table;

/// Create the application tables if they do not already exist.
///
/// # Errors
/// Returns an error if the database is locked by another connection or if
/// there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
