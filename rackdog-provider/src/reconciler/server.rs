//! Server reconciler - drives Rackdog servers through create, read and delete.

use std::sync::Arc;

use async_trait::async_trait;
use rackdog_client::{CallContext, ProvisioningApi};
use tracing::{error, info, warn};

use super::drift::{self, Divergence, Observation, Verdict};
use super::validator::PreconditionValidator;
use super::{ReadOutcome, Reconciler};
use crate::error::{Advisory, ProviderError, Result};
use crate::policy::ReconciliationPolicy;
use crate::provider::ProviderContext;
use crate::resource::{ServerRecord, ServerSpec};

/// Reconciler for the `server` resource.
///
/// The host serializes calls per server; the controller holds no locks and
/// never retries.
#[derive(Clone)]
pub struct ServerController {
    api: Arc<dyn ProvisioningApi>,
    policy: ReconciliationPolicy,
    validator: PreconditionValidator,
}

impl ServerController {
    pub fn new(context: &ProviderContext) -> Self {
        let api = context.api();
        Self {
            validator: PreconditionValidator::new(Arc::clone(&api)),
            api,
            policy: context.policy(),
        }
    }

    pub fn policy(&self) -> ReconciliationPolicy {
        self.policy
    }
}

#[async_trait]
impl Reconciler for ServerController {
    type Spec = ServerSpec;
    type Record = ServerRecord;

    async fn create(&self, ctx: &CallContext, spec: &ServerSpec) -> Result<ServerRecord> {
        if let Some(raid) = spec.raid {
            self.validator.check_raid(ctx, raid, spec.plan_id).await?;
        }

        info!(
            plan_id = spec.plan_id,
            location_id = spec.location_id,
            os_id = spec.os_id,
            raid = ?spec.raid,
            hostname = ?spec.hostname,
            "Allocating server"
        );

        let allocated = self
            .api
            .create_server(ctx, &spec.to_request())
            .await
            .map_err(|e| {
                error!(error = %e, "Server allocation failed");
                ProviderError::Create(e)
            })?;

        let record = ServerRecord::seed(spec, allocated);
        info!(id = %record.id, ip = %record.ip_address, "Server allocated");
        Ok(record)
    }

    async fn read(
        &self,
        ctx: &CallContext,
        record: &ServerRecord,
    ) -> Result<ReadOutcome<ServerRecord>> {
        let fetched = match self.api.get_server(ctx, &record.id).await {
            Ok(server) => Some(server),
            Err(e) if e.is_not_found() => None,
            Err(source) => {
                return Err(ProviderError::Read {
                    id: record.id.clone(),
                    source,
                });
            }
        };

        let observation = match &fetched {
            Some(server) => Observation::Present(server),
            None => Observation::Missing,
        };

        match drift::classify(record, observation, &self.policy) {
            Verdict::Clean(next) => {
                if next != *record {
                    info!(id = %record.id, ip = %next.ip_address, status = ?next.status, "Server refreshed");
                }
                Ok(ReadOutcome::Refreshed(next))
            }
            Verdict::Forget => {
                warn!(id = %record.id, "Server vanished, forgetting it so it can be recreated");
                Ok(ReadOutcome::Forgotten)
            }
            Verdict::Fatal(Divergence::Field(drift)) => {
                error!(
                    id = %record.id,
                    field = %drift.field,
                    recorded = %drift.recorded,
                    remote = %drift.remote,
                    "Out-of-band change detected"
                );
                Err(ProviderError::Drift {
                    id: record.id.clone(),
                    field: drift.field,
                    recorded: drift.recorded,
                    remote: drift.remote,
                })
            }
            Verdict::Fatal(Divergence::Vanished) => {
                error!(id = %record.id, "Server vanished and recreate_on_missing is off");
                Err(ProviderError::Vanished {
                    id: record.id.clone(),
                })
            }
        }
    }

    fn update(&self, record: Option<&ServerRecord>, planned: &ServerSpec) -> Advisory {
        let changed = match record {
            Some(record) => {
                let mut changed = record.spec().diff(planned);
                // An undeclared hostname is whatever Rackdog assigned.
                if planned.hostname.is_none() {
                    changed.retain(|field| *field != "hostname");
                }
                warn!(id = %record.id, changed = ?changed, "Update requested for server; ignoring");
                changed
            }
            None => {
                warn!("Update requested for a server that does not exist; ignoring");
                Vec::new()
            }
        };

        let detail = if changed.is_empty() {
            "Rackdog servers cannot be updated in place.".to_string()
        } else {
            format!(
                "Rackdog servers cannot be updated in place. Changing {} requires replacing the server.",
                changed.join(", ")
            )
        };

        Advisory {
            summary: "No update implemented",
            detail,
        }
    }

    async fn delete(&self, ctx: &CallContext, record: &ServerRecord) -> Result<()> {
        info!(id = %record.id, "Destroying server");
        self.api
            .delete_server(ctx, &record.id)
            .await
            .map_err(|source| {
                error!(id = %record.id, error = %source, "Server destroy failed");
                ProviderError::Delete {
                    id: record.id.clone(),
                    source,
                }
            })?;
        info!(id = %record.id, "Server destroyed");
        Ok(())
    }
}
