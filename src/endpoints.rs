//! The API endpoints URIs.

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for creating a new user account.
pub const SIGN_UP: &str = "/api/auth/signup";
/// The route for logging in and getting a bearer token.
pub const LOG_IN: &str = "/api/auth/login";
/// The route for listing filtered and sorted transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for downloading transactions as CSV.
pub const EXPORT: &str = "/api/transactions/export";
/// The route for the monthly, category and summary aggregates.
pub const REPORT: &str = "/api/report";
/// The route for the dashboard summary cards.
pub const DASHBOARD_CARDS: &str = "/api/dashboard/cards";
/// The route for the values offered in the filter drop-downs.
pub const FILTER_OPTIONS: &str = "/api/filter_options";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok(), "{uri} is not a valid URI");
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::COFFEE);
        assert_endpoint_is_valid_uri(endpoints::SIGN_UP);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::EXPORT);
        assert_endpoint_is_valid_uri(endpoints::REPORT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_CARDS);
        assert_endpoint_is_valid_uri(endpoints::FILTER_OPTIONS);
    }
}
