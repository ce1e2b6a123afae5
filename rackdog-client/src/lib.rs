//! rackdog-client: client library for the Rackdog bare-metal provisioning API.
//!
//! The reconciliation engine in `rackdog-provider` only depends on the
//! [`ProvisioningApi`] trait. [`HttpClient`] is the production implementation
//! that speaks the JSON envelope protocol of the Rackdog service.
//!
//! # Example
//! ```ignore
//! use rackdog_client::{CallContext, HttpClient, ProvisioningApi};
//!
//! let client = HttpClient::new("https://metal.rackdog.com", "api-key")?;
//! let ctx = CallContext::with_timeout(std::time::Duration::from_secs(10));
//! let server = client.get_server(&ctx, "server-123").await?;
//! println!("{} is {:?}", server.ip_address, server.power_status);
//! ```

mod api;
mod context;
mod error;
mod http;
pub mod types;

pub use api::ProvisioningApi;
pub use context::CallContext;
pub use error::{ClientError, Result};
pub use http::HttpClient;
pub use types::{
    AllocatedServer, CreateServerRequest, Cpu, OperatingSystem, Plan, PlanLocation, Server,
    ServerLocation, ServerOs, ServerPlan,
};
