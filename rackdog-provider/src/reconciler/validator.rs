//! Preconditions checked before any mutating call.

use std::sync::Arc;

use rackdog_client::{CallContext, ProvisioningApi};
use tracing::{debug, warn};

use crate::error::{ProviderError, Result};

/// Read-only checks against the ordering catalog.
#[derive(Clone)]
pub struct PreconditionValidator {
    api: Arc<dyn ProvisioningApi>,
}

impl PreconditionValidator {
    pub fn new(api: Arc<dyn ProvisioningApi>) -> Self {
        Self { api }
    }

    /// Confirm `raid` is offered for `plan_id`.
    ///
    /// A failed check call and a rejected combination are distinct errors:
    /// the latter is a configuration error the user has to fix.
    pub async fn check_raid(&self, ctx: &CallContext, raid: i64, plan_id: i64) -> Result<()> {
        debug!(raid, plan_id, "Checking RAID availability");

        let supported = self
            .api
            .check_raid(ctx, raid, plan_id)
            .await
            .map_err(|source| ProviderError::RaidCheck {
                raid,
                plan_id,
                source,
            })?;

        if !supported {
            warn!(raid, plan_id, "RAID level not available for plan");
            return Err(ProviderError::InvalidRaid { raid, plan_id });
        }

        Ok(())
    }
}
