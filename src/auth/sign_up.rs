//! Handles creating new user accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, PasswordHash, ValidatedPassword,
    user::{create_user, parse_email},
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct SignUpState {
    /// The bcrypt cost used when hashing the new password.
    pub password_cost: u32,
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            password_cost: state.password_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub message: String,
}

/// Handler for sign-up requests.
///
/// # Errors
///
/// This function will return an error if:
/// - the name is empty,
/// - the email is not a valid email address or is already registered,
/// - the password is too weak,
/// - the password could not be hashed or the user could not be saved.
pub async fn sign_up(
    State(state): State<SignUpState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), Error> {
    let email = parse_email(&request.email)?;

    // Checked here as well as on insert so a bad request never pays for bcrypt.
    if request.name.trim().is_empty() {
        return Err(Error::EmptyName);
    }

    let password = ValidatedPassword::new(&request.password, &[&request.name, email.as_str()])?;
    let password_hash = PasswordHash::new(password, state.password_cost)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let user = create_user(&request.name, email, password_hash, &connection)?;
    tracing::info!("Created user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            message: "Signup successful".to_owned(),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde_json::json;

    use crate::{
        AppState, endpoints,
        test_utils::{TEST_PASSWORD, test_state},
        user::count_users,
    };

    use super::sign_up;

    fn test_server(state: AppState) -> TestServer {
        let app = Router::new()
            .route(endpoints::SIGN_UP, post(sign_up))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn sign_up_creates_user() {
        let state = test_state();
        let server = test_server(state.clone());

        let response = server
            .post(endpoints::SIGN_UP)
            .json(&json!({
                "name": "Jane",
                "email": "jane@example.com",
                "password": TEST_PASSWORD,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({"message": "Signup successful"}));
        let count = count_users(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_email() {
        let server = test_server(test_state());
        let body = json!({
            "name": "Jane",
            "email": "jane@example.com",
            "password": TEST_PASSWORD,
        });
        server
            .post(endpoints::SIGN_UP)
            .json(&body)
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.post(endpoints::SIGN_UP).json(&body).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({"message": "Email already registered"}));
    }

    #[tokio::test]
    async fn sign_up_rejects_invalid_email() {
        let server = test_server(test_state());

        server
            .post(endpoints::SIGN_UP)
            .json(&json!({
                "name": "Jane",
                "email": "jane at example dot com",
                "password": TEST_PASSWORD,
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sign_up_rejects_weak_password() {
        let state = test_state();
        let server = test_server(state.clone());

        server
            .post(endpoints::SIGN_UP)
            .json(&json!({
                "name": "Jane",
                "email": "jane@example.com",
                "password": "password",
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let count = count_users(&state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn sign_up_rejects_empty_name() {
        let server = test_server(test_state());

        server
            .post(endpoints::SIGN_UP)
            .json(&json!({
                "name": " ",
                "email": "jane@example.com",
                "password": TEST_PASSWORD,
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn sign_up_rejects_missing_fields() {
        let server = test_server(test_state());

        let response = server
            .post(endpoints::SIGN_UP)
            .json(&json!({"email": "jane@example.com"}))
            .await;

        assert!(response.status_code().is_client_error());
    }
}
