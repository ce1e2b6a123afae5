//! The provisioning API seam.

use async_trait::async_trait;

use crate::context::CallContext;
use crate::error::Result;
use crate::types::{AllocatedServer, CreateServerRequest, OperatingSystem, Plan, Server};

/// Operations the provisioning service offers.
///
/// Each call honours the caller's [`CallContext`] and never retries.
#[async_trait]
pub trait ProvisioningApi: Send + Sync {
    /// Allocate a new server. Not idempotent.
    async fn create_server(
        &self,
        ctx: &CallContext,
        request: &CreateServerRequest,
    ) -> Result<AllocatedServer>;

    /// Fetch the current remote view of a server.
    async fn get_server(&self, ctx: &CallContext, id: &str) -> Result<Server>;

    /// Destroy a server.
    async fn delete_server(&self, ctx: &CallContext, id: &str) -> Result<()>;

    /// Whether `raid` is offered for `plan_id`.
    async fn check_raid(&self, ctx: &CallContext, raid: i64, plan_id: i64) -> Result<bool>;

    /// List hardware plans, optionally filtered by location keyword.
    async fn list_plans(&self, ctx: &CallContext, location: Option<&str>) -> Result<Vec<Plan>>;

    async fn list_operating_systems(&self, ctx: &CallContext) -> Result<Vec<OperatingSystem>>;
}
