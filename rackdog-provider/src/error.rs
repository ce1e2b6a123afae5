//! Provider error types.
//!
//! Every error carries a short operator-facing headline ([`ProviderError::summary`])
//! and a detail message (its `Display`). None of them are retried internally.

use rackdog_client::ClientError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::reconciler::drift::DriftField;
use crate::state::StateError;

/// Errors surfaced by provider operations.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A lifecycle or catalog operation ran before Configure.
    #[error("the provider has not been configured with an API client")]
    NotConfigured,

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The RAID precondition check itself failed.
    #[error("could not check RAID {raid} for plan {plan_id}: {source}")]
    RaidCheck {
        raid: i64,
        plan_id: i64,
        #[source]
        source: ClientError,
    },

    /// The service does not offer this RAID level on this plan.
    #[error(
        "RAID level {raid} is not available for plan {plan_id}. Choose a supported RAID level or omit it."
    )]
    InvalidRaid { raid: i64, plan_id: i64 },

    #[error("{0}")]
    Create(#[source] ClientError),

    #[error("reading server {id}: {source}")]
    Read {
        id: String,
        #[source]
        source: ClientError,
    },

    /// A replace-only field changed outside the provider.
    #[error(
        "remote {field} of server {id} is {remote:?} but state expected {recorded:?}. \
         This was changed outside the provider (portal or API). Reconcile manually: \
         update the configuration to match, import the correct server, or replace it."
    )]
    Drift {
        id: String,
        field: DriftField,
        recorded: String,
        remote: String,
    },

    /// Server returned 404 and the policy forbids forgetting it.
    #[error(
        "server {id} no longer exists (404) and `recreate_on_missing` is false. \
         Enable recreate_on_missing or import an existing server by ID."
    )]
    Vanished { id: String },

    #[error("deleting server {id}: {source}")]
    Delete {
        id: String,
        #[source]
        source: ClientError,
    },

    #[error("listing {what}: {source}")]
    Catalog {
        what: &'static str,
        #[source]
        source: ClientError,
    },

    /// The requested transition does not exist from the current state.
    #[error("cannot {operation} a server that is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error(transparent)]
    State(#[from] StateError),
}

impl ProviderError {
    /// One-line headline for operators.
    pub fn summary(&self) -> String {
        match self {
            ProviderError::NotConfigured => "Provider not configured".to_string(),
            ProviderError::Config(e) => e.summary().to_string(),
            ProviderError::RaidCheck { .. } => "RAID validation failed".to_string(),
            ProviderError::InvalidRaid { .. } => "Invalid RAID for plan".to_string(),
            ProviderError::Create(_) => "Create failed".to_string(),
            ProviderError::Read { .. } => "Read failed".to_string(),
            ProviderError::Drift { field, .. } => {
                format!("Out-of-band change detected ({field})")
            }
            ProviderError::Vanished { .. } => "Server deleted outside the provider".to_string(),
            ProviderError::Delete { .. } => "Delete failed".to_string(),
            ProviderError::Catalog { what, .. } => format!("Failed to list {what}"),
            ProviderError::InvalidState { .. } => "Invalid lifecycle transition".to_string(),
            ProviderError::State(_) => "State file error".to_string(),
        }
    }

    /// True for errors the operator fixes in configuration rather than
    /// by retrying.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ProviderError::NotConfigured
                | ProviderError::Config(_)
                | ProviderError::InvalidRaid { .. }
        )
    }
}

/// Non-fatal diagnostic returned to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub summary: &'static str,
    pub detail: String,
}

/// Result type for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drift_summary_names_field() {
        let err = ProviderError::Drift {
            id: "srv-1".to_string(),
            field: DriftField::Hostname,
            recorded: "web-1".to_string(),
            remote: "web-2".to_string(),
        };
        assert_eq!(err.summary(), "Out-of-band change detected (hostname)");
        let detail = err.to_string();
        assert!(detail.contains("\"web-2\""));
        assert!(detail.contains("\"web-1\""));
        assert!(detail.contains("srv-1"));
    }

    #[test]
    fn test_invalid_raid_is_configuration_error() {
        let err = ProviderError::InvalidRaid {
            raid: 5,
            plan_id: 10,
        };
        assert!(err.is_configuration());
        assert_eq!(err.summary(), "Invalid RAID for plan");

        let check = ProviderError::RaidCheck {
            raid: 5,
            plan_id: 10,
            source: ClientError::DeadlineExceeded,
        };
        assert!(!check.is_configuration());
    }

    #[test]
    fn test_create_failure_is_reported_verbatim() {
        let err = ProviderError::Create(ClientError::Api("out of stock".to_string()));
        assert_eq!(err.to_string(), "API error: out of stock");
    }
}
