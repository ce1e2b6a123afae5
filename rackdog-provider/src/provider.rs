//! Provider lifecycle: Configure builds the shared context every resource
//! and data source runs against.

use std::fmt;
use std::sync::Arc;

use rackdog_client::{HttpClient, ProvisioningApi};
use tracing::{debug, info};

use crate::catalog::{OsCatalog, PlanCatalog};
use crate::config::{ConfigError, ProviderConfig};
use crate::error::{ProviderError, Result};
use crate::policy::ReconciliationPolicy;
use crate::reconciler::server::ServerController;

/// Shared state handed to controllers after Configure.
pub struct ProviderContext {
    api: Arc<dyn ProvisioningApi>,
    policy: ReconciliationPolicy,
}

impl ProviderContext {
    pub fn new(api: Arc<dyn ProvisioningApi>, policy: ReconciliationPolicy) -> Self {
        Self { api, policy }
    }

    pub fn api(&self) -> Arc<dyn ProvisioningApi> {
        Arc::clone(&self.api)
    }

    pub fn policy(&self) -> ReconciliationPolicy {
        self.policy
    }
}

impl fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderContext")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// The provider instance a host talks to.
#[derive(Default)]
pub struct Provider {
    context: Option<Arc<ProviderContext>>,
    configured_with: Option<ProviderConfig>,
}

impl Provider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the HTTP client and install the context.
    ///
    /// Configuring twice with an equal config keeps the existing context.
    pub fn configure(&mut self, config: &ProviderConfig) -> Result<Arc<ProviderContext>> {
        if let (Some(context), Some(current)) = (&self.context, &self.configured_with) {
            if current == config {
                debug!("Provider already configured, reusing client");
                return Ok(Arc::clone(context));
            }
        }

        let client = HttpClient::with_timeout(&config.endpoint, config.api_key.clone(), config.timeout)
            .map_err(|e| ConfigError::InvalidEndpoint {
                endpoint: config.endpoint.clone(),
                reason: e.to_string(),
            })?;

        info!(
            endpoint = %config.endpoint,
            timeout_secs = config.timeout.as_secs(),
            recreate_on_missing = config.policy.recreate_on_missing,
            "Provider configured"
        );

        let context = self.install(Arc::new(client), config.policy);
        self.configured_with = Some(config.clone());
        Ok(context)
    }

    /// Install an arbitrary API implementation.
    pub fn configure_with(
        &mut self,
        api: Arc<dyn ProvisioningApi>,
        policy: ReconciliationPolicy,
    ) -> Arc<ProviderContext> {
        self.configured_with = None;
        self.install(api, policy)
    }

    fn install(
        &mut self,
        api: Arc<dyn ProvisioningApi>,
        policy: ReconciliationPolicy,
    ) -> Arc<ProviderContext> {
        let context = Arc::new(ProviderContext::new(api, policy));
        self.context = Some(Arc::clone(&context));
        context
    }

    pub fn context(&self) -> Result<Arc<ProviderContext>> {
        self.context.clone().ok_or(ProviderError::NotConfigured)
    }

    /// Controller for the `server` resource.
    pub fn servers(&self) -> Result<ServerController> {
        Ok(ServerController::new(&*self.context()?))
    }

    pub fn plans(&self) -> Result<PlanCatalog> {
        Ok(PlanCatalog::new(self.context()?.api()))
    }

    pub fn operating_systems(&self) -> Result<OsCatalog> {
        Ok(OsCatalog::new(self.context()?.api()))
    }
}
