//! Server resource data model.
//!
//! [`ServerSpec`] is what the user declared, [`ServerRecord`] is what the
//! provider believes exists remotely, and [`ResourceState`] is the lifecycle
//! slot a host keeps per declared server.

use rackdog_client::{AllocatedServer, CreateServerRequest};
use serde::{Deserialize, Serialize};

/// How a change to an attribute is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacePolicy {
    /// Set by the service, never by the user.
    Computed,
    /// Any change destroys and recreates the server.
    RequiresReplace,
}

/// Schema entry for one server attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub required: bool,
    pub policy: ReplacePolicy,
}

const fn attr(name: &'static str, required: bool, policy: ReplacePolicy) -> Attribute {
    Attribute {
        name,
        required,
        policy,
    }
}

/// Attribute table of the server resource. There is no in-place update, so
/// every user-settable attribute requires replacement.
pub const SERVER_ATTRIBUTES: &[Attribute] = &[
    attr("id", false, ReplacePolicy::Computed),
    attr("plan_id", true, ReplacePolicy::RequiresReplace),
    attr("location_id", true, ReplacePolicy::RequiresReplace),
    attr("os_id", true, ReplacePolicy::RequiresReplace),
    attr("raid", false, ReplacePolicy::RequiresReplace),
    attr("hostname", false, ReplacePolicy::RequiresReplace),
    attr("ip_address", false, ReplacePolicy::Computed),
    attr("status", false, ReplacePolicy::Computed),
];

/// Desired server, as declared by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSpec {
    pub plan_id: i64,
    pub location_id: i64,
    pub os_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl ServerSpec {
    pub fn to_request(&self) -> CreateServerRequest {
        CreateServerRequest {
            plan_id: self.plan_id,
            location_id: self.location_id,
            os_id: self.os_id,
            raid: self.raid,
            hostname: self.hostname.clone(),
        }
    }

    /// Names of attributes whose change would force replacement.
    pub fn diff(&self, other: &ServerSpec) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.plan_id != other.plan_id {
            changed.push("plan_id");
        }
        if self.location_id != other.location_id {
            changed.push("location_id");
        }
        if self.os_id != other.os_id {
            changed.push("os_id");
        }
        if self.raid != other.raid {
            changed.push("raid");
        }
        if self.hostname != other.hostname {
            changed.push("hostname");
        }
        changed
    }
}

/// The provider's belief about a remote server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub id: String,
    pub plan_id: i64,
    pub location_id: i64,
    pub os_id: i64,
    #[serde(default)]
    pub raid: Option<i64>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl ServerRecord {
    /// Seed a record from a successful allocation. Status stays unset until
    /// the next read.
    pub fn seed(spec: &ServerSpec, allocated: AllocatedServer) -> Self {
        Self {
            id: allocated.id,
            plan_id: spec.plan_id,
            location_id: spec.location_id,
            os_id: spec.os_id,
            raid: spec.raid,
            hostname: allocated.hostname.or_else(|| spec.hostname.clone()),
            ip_address: allocated.ip_address,
            status: None,
        }
    }

    /// The user-settable part of the record.
    pub fn spec(&self) -> ServerSpec {
        ServerSpec {
            plan_id: self.plan_id,
            location_id: self.location_id,
            os_id: self.os_id,
            raid: self.raid,
            hostname: self.hostname.clone(),
        }
    }
}

/// Lifecycle slot of one declared resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "record", rename_all = "snake_case")]
pub enum ResourceState<R = ServerRecord> {
    Absent,
    Present(R),
}

impl<R> Default for ResourceState<R> {
    fn default() -> Self {
        ResourceState::Absent
    }
}

impl<R> ResourceState<R> {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceState::Absent => "absent",
            ResourceState::Present(_) => "present",
        }
    }

    pub fn record(&self) -> Option<&R> {
        match self {
            ResourceState::Absent => None,
            ResourceState::Present(record) => Some(record),
        }
    }
}
