//! Server configuration from command-line flags and environment variables.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

/// Default listening port
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration of the relay server
#[derive(Debug, Clone, Parser)]
#[command(name = "hiroba-server", version, about = "WebSocket broadcast relay server")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory holding index.html, client.js and style.css
    #[arg(long, env = "PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,
}

impl ServerConfig {
    pub fn new(host: IpAddr, port: u16, public_dir: impl Into<PathBuf>) -> Self {
        Self {
            host,
            port,
            public_dir: public_dir.into(),
        }
    }

    /// Socket address the listener binds to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_explicit_flags() {
        // テスト項目: フラグで全ての値を指定できる
        // when (操作):
        let config = ServerConfig::try_parse_from([
            "hiroba-server",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--public-dir",
            "/srv/public",
        ])
        .unwrap();

        // then (期待する結果):
        assert_eq!(config.socket_addr(), "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.public_dir, PathBuf::from("/srv/public"));
    }

    #[test]
    fn test_parse_rejects_invalid_port() {
        // テスト項目: 範囲外のポートは起動時エラーになる
        let result = ServerConfig::try_parse_from(["hiroba-server", "--port", "70000"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_new_builds_socket_addr() {
        let config = ServerConfig::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0, "public");
        assert_eq!(config.socket_addr(), "127.0.0.1:0".parse().unwrap());
    }
}
