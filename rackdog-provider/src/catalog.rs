//! Read-only data sources over the ordering catalog.

use std::sync::Arc;

use rackdog_client::{CallContext, OperatingSystem, Plan, ProvisioningApi};
use serde::Serialize;
use tracing::debug;

use crate::error::{ProviderError, Result};

/// One row of the plans data source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanItem {
    pub id: i64,
    pub name: String,
    pub ram: i64,
    pub storage: i64,
    pub cpu_name: String,
    pub cores: i64,
    pub price_monthly: Option<i64>,
}

impl PlanItem {
    fn from_plan(plan: Plan, location: Option<&str>) -> Self {
        let price_monthly = price_for(&plan, location);
        Self {
            id: plan.id,
            name: plan.name,
            ram: plan.ram_gb,
            storage: plan.storage_gb,
            cpu_name: plan.cpu.name,
            cores: plan.cpu.cores,
            price_monthly,
        }
    }
}

/// Monthly price at the filtered location, else the cheapest one listed.
fn price_for(plan: &Plan, location: Option<&str>) -> Option<i64> {
    if let Some(keyword) = location {
        if let Some(found) = plan
            .locations
            .iter()
            .find(|l| l.keyword.eq_ignore_ascii_case(keyword))
        {
            return Some(found.monthly_price);
        }
    }
    plan.locations.iter().map(|l| l.monthly_price).min()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OsItem {
    pub id: i64,
    pub name: String,
}

impl From<OperatingSystem> for OsItem {
    fn from(os: OperatingSystem) -> Self {
        Self {
            id: os.id,
            name: os.name,
        }
    }
}

/// Hardware plans, optionally filtered by location keyword.
#[derive(Clone)]
pub struct PlanCatalog {
    api: Arc<dyn ProvisioningApi>,
}

impl PlanCatalog {
    pub fn new(api: Arc<dyn ProvisioningApi>) -> Self {
        Self { api }
    }

    pub async fn read(&self, ctx: &CallContext, location: Option<&str>) -> Result<Vec<PlanItem>> {
        let location = location.filter(|l| !l.is_empty());
        let plans = self
            .api
            .list_plans(ctx, location)
            .await
            .map_err(|source| ProviderError::Catalog {
                what: "plans",
                source,
            })?;
        debug!(count = plans.len(), location = ?location, "Listed plans");

        Ok(plans
            .into_iter()
            .map(|plan| PlanItem::from_plan(plan, location))
            .collect())
    }
}

/// Operating systems offered for installation.
#[derive(Clone)]
pub struct OsCatalog {
    api: Arc<dyn ProvisioningApi>,
}

impl OsCatalog {
    pub fn new(api: Arc<dyn ProvisioningApi>) -> Self {
        Self { api }
    }

    pub async fn read(&self, ctx: &CallContext) -> Result<Vec<OsItem>> {
        let systems = self
            .api
            .list_operating_systems(ctx)
            .await
            .map_err(|source| ProviderError::Catalog {
                what: "operating systems",
                source,
            })?;
        debug!(count = systems.len(), "Listed operating systems");
        Ok(systems.into_iter().map(OsItem::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rackdog_client::{Cpu, PlanLocation};

    fn plan() -> Plan {
        Plan {
            id: 10,
            name: "c3.large".to_string(),
            cpu: Cpu {
                name: "AMD EPYC".to_string(),
                cores: 16,
                speed_ghz: 3.1,
            },
            locations: vec![
                PlanLocation {
                    id: 1,
                    name: "New York".to_string(),
                    keyword: "NY".to_string(),
                    monthly_price: 180,
                },
                PlanLocation {
                    id: 2,
                    name: "Los Angeles".to_string(),
                    keyword: "LA".to_string(),
                    monthly_price: 150,
                },
            ],
            ram_gb: 64,
            storage_gb: 960,
        }
    }

    #[test]
    fn test_price_at_filtered_location() {
        assert_eq!(price_for(&plan(), Some("NY")), Some(180));
        assert_eq!(price_for(&plan(), Some("ny")), Some(180));
    }

    #[test]
    fn test_price_falls_back_to_cheapest() {
        assert_eq!(price_for(&plan(), None), Some(150));
        assert_eq!(price_for(&plan(), Some("AMS")), Some(150));

        let mut bare = plan();
        bare.locations.clear();
        assert_eq!(price_for(&bare, None), None);
    }

    #[test]
    fn test_plan_item_fields() {
        let item = PlanItem::from_plan(plan(), None);
        assert_eq!(item.ram, 64);
        assert_eq!(item.storage, 960);
        assert_eq!(item.cpu_name, "AMD EPYC");
        assert_eq!(item.cores, 16);
    }
}
