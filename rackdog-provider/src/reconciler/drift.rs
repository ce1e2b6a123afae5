//! Drift classification between the recorded server and a fresh remote view.
//!
//! Checks run in a fixed order and the first divergence wins; multiple
//! simultaneous drifts are never aggregated. Only the replace-only fields are
//! compared. IP address and power status are absorbed without comparison.

use std::fmt;

use rackdog_client::Server;
use serde::{Deserialize, Serialize};

use crate::policy::{MissingDisposition, ReconciliationPolicy};
use crate::resource::ServerRecord;

/// Replace-only fields that are checked for out-of-band changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftField {
    Hostname,
    PlanId,
    LocationId,
    OsId,
    Raid,
}

impl DriftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftField::Hostname => "hostname",
            DriftField::PlanId => "plan_id",
            DriftField::LocationId => "location_id",
            DriftField::OsId => "os_id",
            DriftField::Raid => "raid",
        }
    }
}

impl fmt::Display for DriftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diverged field with both values rendered for operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDrift {
    pub field: DriftField,
    pub recorded: String,
    pub remote: String,
}

impl FieldDrift {
    fn new(field: DriftField, recorded: impl ToString, remote: impl ToString) -> Self {
        Self {
            field,
            recorded: recorded.to_string(),
            remote: remote.to_string(),
        }
    }
}

/// Why a read must fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Divergence {
    Field(FieldDrift),
    Vanished,
}

/// What the remote read observed.
#[derive(Debug, Clone, Copy)]
pub enum Observation<'a> {
    Present(&'a Server),
    /// The service answered 404.
    Missing,
}

/// Outcome of classifying one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No replace-only field diverged. Carries the record with the
    /// snapshot absorbed.
    Clean(ServerRecord),
    /// Drop the local record; the server is gone.
    Forget,
    Fatal(Divergence),
}

/// Classify a read of `record`.
pub fn classify(
    record: &ServerRecord,
    observation: Observation<'_>,
    policy: &ReconciliationPolicy,
) -> Verdict {
    match observation {
        Observation::Missing => match policy.on_missing() {
            MissingDisposition::Forget => Verdict::Forget,
            MissingDisposition::Fail => Verdict::Fatal(Divergence::Vanished),
        },
        Observation::Present(server) => match field_drift(record, server) {
            Some(drift) => Verdict::Fatal(Divergence::Field(drift)),
            None => Verdict::Clean(absorb(record, server)),
        },
    }
}

/// First replace-only field that diverged, in priority order.
///
/// A zero id or a missing value on either side means "unknown" and is never
/// treated as drift.
fn field_drift(record: &ServerRecord, server: &Server) -> Option<FieldDrift> {
    if let (Some(recorded), Some(remote)) = (&record.hostname, &server.hostname) {
        if recorded != remote {
            return Some(FieldDrift::new(DriftField::Hostname, recorded, remote));
        }
    }

    if record.plan_id != 0 && server.plan.id != 0 && record.plan_id != server.plan.id {
        return Some(FieldDrift::new(
            DriftField::PlanId,
            record.plan_id,
            server.plan.id,
        ));
    }

    if record.location_id != 0
        && server.location.id != 0
        && record.location_id != server.location.id
    {
        return Some(FieldDrift::new(
            DriftField::LocationId,
            record.location_id,
            server.location.id,
        ));
    }

    if let Some(os) = &server.server_os {
        if record.os_id != 0 && record.os_id != os.id {
            return Some(FieldDrift::new(DriftField::OsId, record.os_id, os.id));
        }
    }

    if let (Some(recorded), Some(remote)) = (record.raid, server.raid) {
        if recorded != remote {
            return Some(FieldDrift::new(DriftField::Raid, recorded, remote));
        }
    }

    None
}

/// Promote the absorbable fields of a clean snapshot into a new record.
///
/// IP address and status always follow the snapshot. The hostname is only
/// taken when the record had none: first write wins, after that a mismatch
/// is drift.
fn absorb(record: &ServerRecord, server: &Server) -> ServerRecord {
    let mut next = record.clone();
    next.ip_address = server.ip_address.clone();
    next.status = server.power_status.clone();
    if next.hostname.is_none() {
        next.hostname = server.hostname.clone();
    }
    next
}
