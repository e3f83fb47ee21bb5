// Sync Errors
// Failures of requests issued against the appliance

use thiserror::Error;

use crate::core::CollectionKind;

/// Result alias for appliance requests
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// A request that did not complete successfully
#[derive(Debug, Error)]
pub enum SyncError {
    /// The request never produced a response
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The appliance answered with a non-success status
    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    /// The listing body could not be decoded
    #[error("could not decode {kind} listing: {reason}")]
    Decode {
        kind: CollectionKind,
        reason: String,
    },

    /// The configured appliance address cannot carry request paths
    #[error("invalid appliance url: {0}")]
    InvalidUrl(String),
}

impl SyncError {
    /// HTTP status of the response, when one was received
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message() {
        let err = SyncError::Status {
            method: "DELETE",
            url: "http://filter.lan/domains/ads.com".to_string(),
            status: 404,
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            "DELETE http://filter.lan/domains/ads.com returned HTTP 404"
        );
    }

    #[test]
    fn decode_error_names_the_collection() {
        let err = SyncError::Decode {
            kind: CollectionKind::Devices,
            reason: "expected value".to_string(),
        };
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("devices"));
    }
}
