//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error, PasswordHash, auth::JwtKeys, db::initialize, transaction::TransactionRecord,
};

/// How long a token issued at log-in stays valid.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::hours(1);

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The keys for signing and verifying tokens.
    pub jwt_keys: JwtKeys,

    /// The duration for which tokens issued at log-in are valid.
    pub token_duration: Duration,

    /// The bcrypt cost used when hashing new passwords.
    pub password_cost: u32,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The read-only snapshot of the transaction dataset.
    pub transactions: Arc<[TransactionRecord]>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection and the
    /// loaded transaction dataset.
    ///
    /// This function will initialize the database by adding the user table.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(
        db_connection: Connection,
        jwt_secret: &str,
        transactions: Vec<TransactionRecord>,
    ) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            jwt_keys: create_jwt_keys(jwt_secret),
            token_duration: DEFAULT_TOKEN_DURATION,
            password_cost: PasswordHash::DEFAULT_COST,
            db_connection: Arc::new(Mutex::new(db_connection)),
            transactions: transactions.into(),
        })
    }
}

// this impl lets the `Claims` extractor find the keys in our state
impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_keys.clone()
    }
}

/// Create the token signing keys from a `secret` string.
pub fn create_jwt_keys(secret: &str) -> JwtKeys {
    let hash = Sha512::digest(secret);

    JwtKeys::from_secret(&hash)
}
