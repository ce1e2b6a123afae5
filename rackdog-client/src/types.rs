//! Wire types of the Rackdog API.
//!
//! Every response is wrapped in an envelope `{success, data, message}`.
//! Numeric ids the service omits decode as 0; callers treat 0 as "unset".

use serde::{Deserialize, Serialize};

/// Response envelope shared by all endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: String,
}

/// Body of `POST /v1/ordering/allocate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServerRequest {
    pub plan_id: i64,
    pub location_id: i64,
    pub os_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// Allocation result. The service does not report power state reliably
/// at this point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllocatedServer {
    pub id: String,
    pub hostname: Option<String>,
    pub ip_address: String,
    pub power_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerPlan {
    pub id: i64,
    pub name: String,
    #[serde(rename = "ram")]
    pub ram_gb: i64,
    pub storage: i64,
    pub cpu_name: String,
    pub cores: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerLocation {
    pub id: i64,
    pub name: String,
    pub keyword: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerOs {
    pub id: i64,
    pub name: String,
}

/// Full server view from `GET /v1/servers/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Server {
    pub id: String,
    pub plan: ServerPlan,
    pub location: ServerLocation,
    #[serde(rename = "serverOS")]
    pub server_os: Option<ServerOs>,
    pub raid: Option<i64>,
    pub hostname: Option<String>,
    pub ip_address: String,
    #[serde(rename = "devicePowerStatus")]
    pub power_status: Option<String>,
    pub monthly_price: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cpu {
    pub name: String,
    pub cores: i64,
    #[serde(rename = "speedGhz")]
    pub speed_ghz: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlanLocation {
    pub id: i64,
    pub name: String,
    pub keyword: String,
    pub monthly_price: i64,
}

/// Hardware plan from the ordering catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub id: i64,
    pub name: String,
    pub cpu: Cpu,
    pub locations: Vec<PlanLocation>,
    #[serde(rename = "ram")]
    pub ram_gb: i64,
    #[serde(rename = "storageGb")]
    pub storage_gb: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatingSystem {
    pub id: i64,
    pub name: String,
}
