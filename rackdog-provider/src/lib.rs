//! rackdog-provider: reconciles declared Rackdog bare-metal servers against
//! the provisioning API.
//!
//! A host configures a [`Provider`] once, then drives each declared server
//! through [`reconciler::apply`] with a [`ServerController`]. Reads detect
//! out-of-band changes to replace-only fields and refuse to paper over them.

pub mod catalog;
pub mod config;
pub mod error;
pub mod policy;
pub mod provider;
pub mod reconciler;
pub mod resource;
pub mod state;

pub use catalog::{OsCatalog, OsItem, PlanCatalog, PlanItem};
pub use config::{ConfigError, ProviderConfig, ProviderSettings};
pub use error::{Advisory, ProviderError, Result};
pub use policy::ReconciliationPolicy;
pub use provider::{Provider, ProviderContext};
pub use reconciler::server::ServerController;
pub use reconciler::{Operation, ReadOutcome, Reconciler, apply};
pub use resource::{ResourceState, SERVER_ATTRIBUTES, ServerRecord, ServerSpec};
pub use state::{StateDocument, StateError, StateFile};
