//! JSON web tokens issued at log-in and checked on every data route.

use axum::{
    RequestPartsExt,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, UserID};

/// The HS256 keys for signing and verifying tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys").finish_non_exhaustive()
    }
}

/// The contents of a JSON web token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub id: UserID,
    /// When the token was issued, in seconds since the Unix epoch.
    pub iat: i64,
    /// When the token expires, in seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id` that are valid for `duration` from `issued_at`.
    pub fn new(user_id: UserID, issued_at: OffsetDateTime, duration: Duration) -> Self {
        Self {
            id: user_id,
            iat: issued_at.unix_timestamp(),
            exp: (issued_at + duration).unix_timestamp(),
        }
    }
}

/// Sign `claims` with HS256.
///
/// # Errors
/// Returns [Error::TokenCreation] if the claims could not be signed.
pub fn encode_token(claims: &Claims, keys: &JwtKeys) -> Result<String, Error> {
    encode(&Header::default(), claims, &keys.encoding_key)
        .map_err(|error| Error::TokenCreation(error.to_string()))
}

/// Verify the signature and expiry of `token` and return its claims.
///
/// # Errors
/// Returns [Error::InvalidToken] if the token is malformed, was signed with
/// another key, or has expired.
pub fn decode_token(token: &str, keys: &JwtKeys) -> Result<Claims, Error> {
    decode::<Claims>(token, &keys.decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|error| {
            tracing::debug!("rejected token: {error}");
            Error::InvalidToken
        })
}

impl<S> FromRequestParts<S> for Claims
where
    JwtKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| Error::InvalidToken)?;

        let keys = JwtKeys::from_ref(state);

        decode_token(bearer.token(), &keys)
    }
}

#[cfg(test)]
mod tests {
    use axum::{Json, Router, extract::FromRef, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use time::{Duration, OffsetDateTime};

    use crate::{Error, UserID};

    use super::{Claims, JwtKeys, decode_token, encode_token};

    fn keys() -> JwtKeys {
        JwtKeys::from_secret(b"a test secret")
    }

    #[derive(Clone)]
    struct TestState {
        keys: JwtKeys,
    }

    impl FromRef<TestState> for JwtKeys {
        fn from_ref(state: &TestState) -> Self {
            state.keys.clone()
        }
    }

    async fn whoami(claims: Claims) -> Json<UserID> {
        Json(claims.id)
    }

    fn test_server() -> TestServer {
        let app = Router::new()
            .route("/whoami", get(whoami))
            .with_state(TestState { keys: keys() });

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[test]
    fn decode_gives_encoded_claims() {
        let claims = Claims::new(UserID::new(7), OffsetDateTime::now_utc(), Duration::hours(1));

        let token = encode_token(&claims, &keys()).unwrap();
        let decoded = decode_token(&token, &keys()).unwrap();

        assert_eq!(decoded, claims);
        assert_eq!(decoded.exp - decoded.iat, 3600);
    }

    #[test]
    fn decode_rejects_expired_token() {
        let issued_at = OffsetDateTime::now_utc() - Duration::hours(2);
        let claims = Claims::new(UserID::new(7), issued_at, Duration::hours(1));
        let token = encode_token(&claims, &keys()).unwrap();

        let result = decode_token(&token, &keys());

        assert_eq!(result, Err(Error::InvalidToken));
    }

    #[test]
    fn decode_rejects_token_signed_with_other_key() {
        let claims = Claims::new(UserID::new(7), OffsetDateTime::now_utc(), Duration::hours(1));
        let token = encode_token(&claims, &JwtKeys::from_secret(b"another secret")).unwrap();

        let result = decode_token(&token, &keys());

        assert_eq!(result, Err(Error::InvalidToken));
    }

    #[tokio::test]
    async fn extractor_accepts_valid_bearer_token() {
        let server = test_server();
        let claims = Claims::new(UserID::new(7), OffsetDateTime::now_utc(), Duration::hours(1));
        let token = encode_token(&claims, &keys()).unwrap();

        let response = server.get("/whoami").authorization_bearer(token).await;

        response.assert_status_ok();
        response.assert_json(&UserID::new(7));
    }

    #[tokio::test]
    async fn extractor_rejects_missing_header() {
        let server = test_server();

        server
            .get("/whoami")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn extractor_rejects_garbage_token() {
        let server = test_server();

        server
            .get("/whoami")
            .authorization_bearer("not.a.token")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
