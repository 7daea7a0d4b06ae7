//! Sign-up, log-in and the bearer token guard for the data routes.

mod log_in;
mod sign_up;
mod token;

pub use log_in::{LogInRequest, LogInResponse, LogInState, log_in};
pub use sign_up::{SignUpRequest, SignUpResponse, SignUpState, sign_up};
pub use token::{Claims, JwtKeys, decode_token, encode_token};
