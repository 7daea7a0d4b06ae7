#![allow(missing_docs)]

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::json;

use crate::{
    AppState, build_router,
    auth::LogInResponse,
    endpoints,
    transaction::{TransactionRecord, TransactionStatus, parse_record_date},
};

pub(crate) const TEST_EMAIL: &str = "jane@example.com";
pub(crate) const TEST_PASSWORD: &str = "correct-horse-battery-staple-42";

/// The lowest cost bcrypt accepts, to keep the tests fast.
const TEST_PASSWORD_COST: u32 = 4;

/// A paid transaction for `user_{id:03}` with no avatar.
///
/// `date` may be an RFC 3339 date-time or a plain `YYYY-MM-DD` date.
pub(crate) fn record(id: i64, amount: f64, category: &str, date: &str) -> TransactionRecord {
    TransactionRecord {
        id,
        date: parse_record_date(date).expect("Could not parse test date"),
        amount,
        category: category.to_owned(),
        status: TransactionStatus::Paid,
        user_id: format!("user_{id:03}"),
        user_profile: String::new(),
    }
}

/// Two revenue transactions and one expense across January and February 2024.
pub(crate) fn sample_transactions() -> Vec<TransactionRecord> {
    vec![
        record(1, 100.0, "Revenue", "2024-01-05"),
        record(2, -40.0, "Expense", "2024-01-20"),
        record(3, 50.0, "Revenue", "2024-02-01"),
    ]
}

/// App state with an in-memory database and [sample_transactions].
pub(crate) fn test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    let mut state = AppState::new(connection, "a test secret", sample_transactions())
        .expect("Could not create app state.");
    state.password_cost = TEST_PASSWORD_COST;

    state
}

/// A test server for the full router with a registered user, and a token
/// for that user.
pub(crate) async fn signed_in_server() -> (TestServer, String) {
    let server =
        TestServer::try_new(build_router(test_state())).expect("Could not create test server.");

    server
        .post(endpoints::SIGN_UP)
        .json(&json!({
            "name": "Jane",
            "email": TEST_EMAIL,
            "password": TEST_PASSWORD,
        }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server
        .post(endpoints::LOG_IN)
        .json(&json!({"email": TEST_EMAIL, "password": TEST_PASSWORD}))
        .await;
    response.assert_status_ok();
    let token = response.json::<LogInResponse>().token;

    (server, token)
}
