// Appliance API
// Logical operations exposed by the filtering appliance

use std::fmt;
use std::future::Future;

use super::error::SyncResult;
use crate::core::{Collection, CollectionKind};

/// One request against the appliance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// Read a whole collection
    Fetch { kind: CollectionKind },

    /// Create an entry in an editable collection
    Add { kind: CollectionKind, name: String },

    /// Delete an entry by name
    Remove { kind: CollectionKind, name: String },

    /// Set the desired filtering state of a device
    SetFiltered { device: String, value: bool },

    /// Change the display label of a device
    RenameDevice { device: String, display_name: String },
}

impl ApiRequest {
    /// Collection affected by the request
    pub fn kind(&self) -> CollectionKind {
        match self {
            Self::Fetch { kind } | Self::Add { kind, .. } | Self::Remove { kind, .. } => *kind,
            Self::SetFiltered { .. } | Self::RenameDevice { .. } => CollectionKind::Devices,
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::Fetch { .. })
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { kind } => write!(f, "fetch {kind}"),
            Self::Add { kind, name } => write!(f, "add '{name}' to {kind}"),
            Self::Remove { kind, name } => write!(f, "remove '{name}' from {kind}"),
            Self::SetFiltered { device, value } => {
                write!(f, "set filtering of '{device}' to {value}")
            }
            Self::RenameDevice { device, display_name } => {
                write!(f, "rename '{device}' to '{display_name}'")
            }
        }
    }
}

/// Successful result of a request
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A fresh collection read
    Fetched(Collection),
    /// The mutation was accepted; the caller re-fetches
    Applied,
}

/// Transport collaborator: the appliance's HTTP API
pub trait ApplianceApi: Send + Sync + 'static {
    /// `GET /<kind>`
    fn fetch(&self, kind: CollectionKind) -> impl Future<Output = SyncResult<Collection>> + Send;

    /// `POST /<kind>` with `<field>=<name>`
    fn add(&self, kind: CollectionKind, name: &str) -> impl Future<Output = SyncResult<()>> + Send;

    /// `DELETE /<kind>/<name>`
    fn remove(&self, kind: CollectionKind, name: &str)
        -> impl Future<Output = SyncResult<()>> + Send;

    /// `POST /devices/<name>/is_filtered` with `value=<True|False>`
    fn set_filtered(&self, device: &str, value: bool)
        -> impl Future<Output = SyncResult<()>> + Send;

    /// `POST /devices/<name>/display_name` with `value=<label>`
    fn rename_device(
        &self,
        device: &str,
        display_name: &str,
    ) -> impl Future<Output = SyncResult<()>> + Send;
}

/// Run a request against the API
pub async fn execute<A: ApplianceApi>(api: &A, request: &ApiRequest) -> SyncResult<Outcome> {
    match request {
        ApiRequest::Fetch { kind } => api.fetch(*kind).await.map(Outcome::Fetched),
        ApiRequest::Add { kind, name } => api.add(*kind, name).await.map(|_| Outcome::Applied),
        ApiRequest::Remove { kind, name } => {
            api.remove(*kind, name).await.map(|_| Outcome::Applied)
        }
        ApiRequest::SetFiltered { device, value } => {
            api.set_filtered(device, *value).await.map(|_| Outcome::Applied)
        }
        ApiRequest::RenameDevice { device, display_name } => api
            .rename_device(device, display_name)
            .await
            .map(|_| Outcome::Applied),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_kind_and_mutation() {
        let toggle = ApiRequest::SetFiltered {
            device: "aa:bb".to_string(),
            value: true,
        };
        assert_eq!(toggle.kind(), CollectionKind::Devices);
        assert!(toggle.is_mutation());

        let fetch = ApiRequest::Fetch {
            kind: CollectionKind::Sites,
        };
        assert_eq!(fetch.kind(), CollectionKind::Sites);
        assert!(!fetch.is_mutation());
    }

    #[test]
    fn request_display() {
        let add = ApiRequest::Add {
            kind: CollectionKind::Domains,
            name: "ads.com".to_string(),
        };
        assert_eq!(add.to_string(), "add 'ads.com' to domains");
    }
}
