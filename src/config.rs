//! Command line configuration for the API server.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

/// The environment variable that holds the token signing secret.
pub const SECRET_ENV_VAR: &str = "SECRET";

/// The JSON API server for the penta dashboard.
///
/// The token signing secret is read from the `SECRET` environment variable.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    /// File path to the application SQLite database.
    #[arg(long, env = "PENTA_DB_PATH")]
    pub db_path: PathBuf,

    /// File path to the JSON transaction dataset.
    #[arg(long, env = "PENTA_DATA_PATH")]
    pub data_path: PathBuf,

    /// The address to serve the API from.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "PENTA_PORT", default_value_t = 5000)]
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::{net::SocketAddr, path::PathBuf};

    use clap::Parser;

    use super::ServerConfig;

    #[test]
    fn parses_required_paths_with_defaults() {
        let config = ServerConfig::try_parse_from([
            "server",
            "--db-path",
            "users.db",
            "--data-path",
            "transactions.json",
        ])
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("users.db"));
        assert_eq!(config.data_path, PathBuf::from("transactions.json"));
        assert_eq!(
            config.socket_addr(),
            "127.0.0.1:5000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn parses_host_and_port() {
        let config = ServerConfig::try_parse_from([
            "server",
            "--db-path",
            "users.db",
            "--data-path",
            "transactions.json",
            "--host",
            "0.0.0.0",
            "-p",
            "8080",
        ])
        .unwrap();

        assert_eq!(
            config.socket_addr(),
            "0.0.0.0:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn rejects_invalid_port() {
        let result = ServerConfig::try_parse_from([
            "server",
            "--db-path",
            "users.db",
            "--data-path",
            "transactions.json",
            "--port",
            "http",
        ]);

        assert!(result.is_err());
    }
}
