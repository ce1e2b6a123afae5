//! Shared test utilities for rackdog-provider integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use rackdog_client::{
    AllocatedServer, CallContext, ClientError, CreateServerRequest, OperatingSystem, Plan,
    ProvisioningApi, Server, ServerLocation, ServerOs, ServerPlan,
};
use rackdog_provider::{Provider, ReconciliationPolicy, ServerController, ServerRecord, ServerSpec};

/// One call received by [`FakeApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateServer(CreateServerRequest),
    GetServer(String),
    DeleteServer(String),
    CheckRaid { raid: i64, plan_id: i64 },
    ListPlans(Option<String>),
    ListOperatingSystems,
}

/// Canned reply. `ClientError` is not `Clone`, so failures are described
/// and built per call.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Status(u16, &'static str),
    Api(&'static str),
    DeadlineExceeded,
}

impl<T: Clone> Reply<T> {
    fn build(&self, method: &str, url: &str) -> Result<T, ClientError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Status(status, body) => Err(ClientError::Http {
                status: *status,
                method: method.to_string(),
                url: url.to_string(),
                body: body.to_string(),
            }),
            Reply::Api(message) => Err(ClientError::Api(message.to_string())),
            Reply::DeadlineExceeded => Err(ClientError::DeadlineExceeded),
        }
    }
}

/// In-memory provisioning API that records every call and the deadline it
/// was made with.
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    deadlines: Mutex<Vec<Option<Instant>>>,
    pub create: Mutex<Reply<AllocatedServer>>,
    pub get: Mutex<Reply<Server>>,
    pub delete: Mutex<Reply<()>>,
    pub raid: Mutex<Reply<bool>>,
    pub plans: Mutex<Reply<Vec<Plan>>>,
    pub systems: Mutex<Reply<Vec<OperatingSystem>>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            deadlines: Mutex::new(Vec::new()),
            create: Mutex::new(Reply::Ok(allocated())),
            get: Mutex::new(Reply::Ok(snapshot())),
            delete: Mutex::new(Reply::Ok(())),
            raid: Mutex::new(Reply::Ok(true)),
            plans: Mutex::new(Reply::Ok(Vec::new())),
            systems: Mutex::new(Reply::Ok(Vec::new())),
        }
    }
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn deadlines(&self) -> Vec<Option<Instant>> {
        self.deadlines.lock().unwrap().clone()
    }

    fn record(&self, ctx: &CallContext, call: Call) {
        self.calls.lock().unwrap().push(call);
        self.deadlines.lock().unwrap().push(ctx.deadline());
    }
}

#[async_trait]
impl ProvisioningApi for FakeApi {
    async fn create_server(
        &self,
        ctx: &CallContext,
        request: &CreateServerRequest,
    ) -> Result<AllocatedServer, ClientError> {
        self.record(ctx, Call::CreateServer(request.clone()));
        self.create
            .lock()
            .unwrap()
            .build("POST", "/v1/ordering/allocate")
    }

    async fn get_server(&self, ctx: &CallContext, id: &str) -> Result<Server, ClientError> {
        self.record(ctx, Call::GetServer(id.to_string()));
        self.get
            .lock()
            .unwrap()
            .build("GET", &format!("/v1/servers/{id}"))
    }

    async fn delete_server(&self, ctx: &CallContext, id: &str) -> Result<(), ClientError> {
        self.record(ctx, Call::DeleteServer(id.to_string()));
        self.delete
            .lock()
            .unwrap()
            .build("DELETE", &format!("/v1/servers/{id}/destroy"))
    }

    async fn check_raid(
        &self,
        ctx: &CallContext,
        raid: i64,
        plan_id: i64,
    ) -> Result<bool, ClientError> {
        self.record(ctx, Call::CheckRaid { raid, plan_id });
        self.raid.lock().unwrap().build(
            "GET",
            &format!("/v1/ordering/plans/{plan_id}/raid/{raid}/check"),
        )
    }

    async fn list_plans(
        &self,
        ctx: &CallContext,
        location: Option<&str>,
    ) -> Result<Vec<Plan>, ClientError> {
        self.record(ctx, Call::ListPlans(location.map(str::to_string)));
        self.plans.lock().unwrap().build("GET", "/v1/ordering/plans")
    }

    async fn list_operating_systems(
        &self,
        ctx: &CallContext,
    ) -> Result<Vec<OperatingSystem>, ClientError> {
        self.record(ctx, Call::ListOperatingSystems);
        self.systems.lock().unwrap().build("GET", "/v1/ordering/os")
    }
}

/// Provider configured against `api`.
pub fn provider(api: &Arc<FakeApi>, recreate_on_missing: bool) -> Provider {
    let mut provider = Provider::new();
    provider.configure_with(
        Arc::clone(api) as Arc<dyn ProvisioningApi>,
        ReconciliationPolicy::new(recreate_on_missing),
    );
    provider
}

pub fn controller(api: &Arc<FakeApi>, recreate_on_missing: bool) -> ServerController {
    provider(api, recreate_on_missing).servers().unwrap()
}

pub fn spec() -> ServerSpec {
    ServerSpec {
        plan_id: 10,
        location_id: 1,
        os_id: 62,
        raid: None,
        hostname: Some("web-1".to_string()),
    }
}

pub fn allocated() -> AllocatedServer {
    AllocatedServer {
        id: "srv-1".to_string(),
        hostname: Some("web-1".to_string()),
        ip_address: "10.0.0.1".to_string(),
        power_status: None,
    }
}

/// Remote view matching [`spec`] and [`allocated`].
pub fn snapshot() -> Server {
    Server {
        id: "srv-1".to_string(),
        plan: ServerPlan {
            id: 10,
            name: "c3.large".to_string(),
            ..Default::default()
        },
        location: ServerLocation {
            id: 1,
            keyword: "NY".to_string(),
            ..Default::default()
        },
        server_os: Some(ServerOs {
            id: 62,
            name: "Ubuntu 24.04".to_string(),
        }),
        raid: None,
        hostname: Some("web-1".to_string()),
        ip_address: "10.0.0.1".to_string(),
        power_status: Some("ON".to_string()),
        monthly_price: None,
    }
}

pub fn record() -> ServerRecord {
    ServerRecord::seed(&spec(), allocated())
}
