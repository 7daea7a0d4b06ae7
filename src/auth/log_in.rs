//! Handles log-in requests and issues tokens.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    auth::{Claims, JwtKeys, encode_token},
    user::{get_user_by_email, parse_email},
};

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    pub jwt_keys: JwtKeys,
    /// How long issued tokens are valid for.
    pub token_duration: Duration,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            jwt_keys: state.jwt_keys.clone(),
            token_duration: state.token_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LogInResponse {
    /// A bearer token for the data routes.
    pub token: String,
}

/// Handler for log-in requests.
///
/// # Errors
///
/// This function will return an error if:
/// - the email is not registered, [Error::UserNotFound],
/// - the password is wrong, [Error::InvalidPassword],
/// - the password could not be verified or the token could not be signed.
pub async fn log_in(
    State(state): State<LogInState>,
    Json(request): Json<LogInRequest>,
) -> Result<Json<LogInResponse>, Error> {
    let email = parse_email(&request.email).map_err(|_| Error::UserNotFound)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        get_user_by_email(&email, &connection).map_err(|error| match error {
            Error::NotFound => Error::UserNotFound,
            error => error,
        })?
    };

    if !user.password_hash.verify(&request.password)? {
        tracing::debug!("Wrong password for user {}", user.id);
        return Err(Error::InvalidPassword);
    }

    let claims = Claims::new(user.id, OffsetDateTime::now_utc(), state.token_duration);
    let token = encode_token(&claims, &state.jwt_keys)?;
    tracing::info!("User {} logged in", user.id);

    Ok(Json(LogInResponse { token }))
}
