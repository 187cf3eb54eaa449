//! # CLI Configuration Helpers
//!
//! Address and Redis URL resolution for the CLI. Database configuration
//! itself lives in `migration::db`.

use std::net::SocketAddr;

/// The Redis connection URL, from `LADLE_REDIS_URL` or the local default.
#[must_use]
pub fn redis_url_from_env() -> String {
    std::env::var("LADLE_REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_owned())
}

/// Parses a host and port into a `SocketAddr`.
pub fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, std::net::AddrParseError> {
    // IPv6 addresses must be wrapped in brackets when appending a port
    // e.g., "::1" becomes "[::1]:3000"
    let addr_str = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]:{}", host, port)
    }
    else {
        format!("{}:{}", host, port)
    };
    addr_str.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_socket_addr() {
        let addr = parse_socket_addr("0.0.0.0", 3000);
        assert!(addr.is_ok());
        assert_eq!(addr.unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_parse_socket_addr_localhost() {
        let addr = parse_socket_addr("127.0.0.1", 8080);
        assert!(addr.is_ok());
        assert_eq!(addr.unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn test_parse_socket_addr_ipv6() {
        let addr = parse_socket_addr("::1", 3000);
        assert!(addr.is_ok());
        assert_eq!(addr.unwrap().to_string(), "[::1]:3000");
    }

    #[test]
    fn test_parse_socket_addr_ipv6_full() {
        let addr = parse_socket_addr("2001:db8::1", 8080);
        assert!(addr.is_ok());
        assert_eq!(addr.unwrap().to_string(), "[2001:db8::1]:8080");
    }
}
