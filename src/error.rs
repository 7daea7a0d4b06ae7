//! Defines the app level error type and its conversion to JSON responses.
use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email used to sign up is not a valid email address.
    #[error("{0} is not a valid email address")]
    InvalidEmail(String),

    /// The name used to sign up was empty.
    #[error("name cannot be empty")]
    EmptyName,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The email is already registered to another user.
    #[error("the email is already registered")]
    DuplicateEmail,

    /// No user is registered with the email used to log in.
    #[error("no user is registered with that email")]
    UserNotFound,

    /// The password did not match the stored hash.
    #[error("invalid password")]
    InvalidPassword,

    /// The bearer token was missing, malformed, or expired.
    #[error("invalid token")]
    InvalidToken,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The JSON web token could not be signed.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// The query string could not be deserialized, e.g. a parameter was repeated.
    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    /// A CSV export was requested without any columns.
    #[error("no columns were selected for the export")]
    NoExportColumns,

    /// A CSV export was requested with a column that is not in the export schema.
    #[error("\"{0}\" is not an export column")]
    InvalidExportColumn(String),

    /// The CSV writer failed.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// The transaction dataset could not be read from disk.
    #[error("could not read the transaction dataset: {0}")]
    DatasetRead(String),

    /// The transaction dataset was read but its contents are invalid.
    #[error("invalid transaction dataset: {0}")]
    InvalidDataset(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(value: QueryRejection) -> Self {
        Error::InvalidQuery(value.body_text())
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::InvalidEmail(email) => (
                StatusCode::BAD_REQUEST,
                format!("{email} is not a valid email address"),
            ),
            Error::EmptyName => (StatusCode::BAD_REQUEST, "Name cannot be empty".to_owned()),
            Error::TooWeak(feedback) => (
                StatusCode::BAD_REQUEST,
                format!("Password is too weak: {feedback}"),
            ),
            Error::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                "Email already registered".to_owned(),
            ),
            Error::UserNotFound => (StatusCode::BAD_REQUEST, "User not found".to_owned()),
            Error::InvalidPassword => (StatusCode::UNAUTHORIZED, "Invalid password".to_owned()),
            Error::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Missing or invalid token".to_owned(),
            ),
            Error::InvalidQuery(detail) => (StatusCode::BAD_REQUEST, detail),
            Error::NoExportColumns => (
                StatusCode::BAD_REQUEST,
                "Please select at least one column to export.".to_owned(),
            ),
            Error::InvalidExportColumn(column) => (
                StatusCode::BAD_REQUEST,
                format!("\"{column}\" is not a column that can be exported."),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                "The requested resource could not be found.".to_owned(),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                )
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
