//! # Request ID Tracking
//!
//! Utilities for generating and propagating request IDs across the
//! application. Uses UUIDv4 for collision-resistant identifiers.

use uuid::Uuid;

/// A request correlation ID.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random request ID.
    #[inline]
    pub fn new() -> Self { Self(Uuid::new_v4().to_string()) }

    /// Get the request ID as a string.
    #[inline]
    pub fn as_str(&self) -> &str { &self.0 }

    /// Consume and return the inner string.
    #[inline]
    pub fn into_string(self) -> String { self.0 }

    /// Parse a request ID from an incoming header value.
    ///
    /// Accepts alphanumeric ids with `-` or `_`, 8 to 64 characters, so
    /// well-behaved upstream proxies can propagate their own ids.
    pub fn try_from_header(value: &str) -> Option<Self> {
        let value = value.trim();
        if (8 ..= 64).contains(&value.len()) &&
            value
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            Some(Self(value.to_string()))
        }
        else {
            None
        }
    }
}

impl Default for RequestId {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_uniqueness() {
        assert_ne!(RequestId::new(), RequestId::new());
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::new();
        assert_eq!(format!("{}", id), id.as_str());
    }

    #[test]
    fn test_try_from_header() {
        let value = "3f2b1a9c-4d5e-4f60-8a7b-123456789abc";
        let id = RequestId::try_from_header(value).unwrap();
        assert_eq!(id.as_str(), value);
    }

    #[test]
    fn test_try_from_header_invalid() {
        assert!(RequestId::try_from_header("bad!@#").is_none());
        assert!(RequestId::try_from_header("short").is_none());
    }
}
