//! Reconcilers for provider resources.
//!
//! A reconciler turns a declared spec into remote calls and keeps the local
//! record in line with what the service reports. Lifecycle operations form a
//! closed set: create, read and delete act on the remote side, update is a
//! no-op that only returns an advisory.

pub mod drift;
pub mod server;
pub mod validator;

use async_trait::async_trait;
use rackdog_client::CallContext;

use crate::error::{Advisory, ProviderError, Result};
use crate::resource::ResourceState;

/// Outcome of a successful read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<R> {
    /// The record was refreshed from the remote view.
    Refreshed(R),
    /// The remote resource is gone and the record should be dropped.
    Forgotten,
}

/// Trait for resource reconcilers.
#[async_trait]
pub trait Reconciler: Send + Sync {
    /// The user-declared spec.
    type Spec: Send + Sync;
    /// The locally stored record.
    type Record: Send + Sync;

    /// Create the remote resource and seed its record.
    async fn create(&self, ctx: &CallContext, spec: &Self::Spec) -> Result<Self::Record>;

    /// Re-read the remote resource and classify drift against `record`.
    async fn read(&self, ctx: &CallContext, record: &Self::Record)
    -> Result<ReadOutcome<Self::Record>>;

    /// In-place updates are not supported; this never touches the remote side
    /// and never fails. `record` is `None` when nothing exists yet.
    fn update(&self, record: Option<&Self::Record>, planned: &Self::Spec) -> Advisory;

    /// Destroy the remote resource.
    async fn delete(&self, ctx: &CallContext, record: &Self::Record) -> Result<()>;
}

/// A lifecycle operation requested by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation<S> {
    Create(S),
    Read,
    Update(S),
    Delete,
}

impl<S> Operation<S> {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Create(_) => "create",
            Operation::Read => "read",
            Operation::Update(_) => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Apply `operation` to `state`.
///
/// `state` is only written after the remote call returned successfully, so
/// an error or a dropped future leaves it exactly as it was.
pub async fn apply<R: Reconciler>(
    reconciler: &R,
    ctx: &CallContext,
    operation: Operation<R::Spec>,
    state: &mut ResourceState<R::Record>,
) -> Result<Vec<Advisory>> {
    let invalid = |state: &ResourceState<R::Record>| ProviderError::InvalidState {
        operation: operation.name(),
        state: state.name(),
    };

    match &operation {
        Operation::Create(spec) => {
            if let ResourceState::Present(_) = state {
                return Err(invalid(state));
            }
            let record = reconciler.create(ctx, spec).await?;
            *state = ResourceState::Present(record);
            Ok(Vec::new())
        }
        Operation::Read => {
            let ResourceState::Present(record) = &*state else {
                return Err(invalid(state));
            };
            let outcome = reconciler.read(ctx, record).await?;
            *state = match outcome {
                ReadOutcome::Refreshed(record) => ResourceState::Present(record),
                ReadOutcome::Forgotten => ResourceState::Absent,
            };
            Ok(Vec::new())
        }
        Operation::Update(planned) => Ok(vec![reconciler.update(state.record(), planned)]),
        Operation::Delete => {
            let ResourceState::Present(record) = &*state else {
                return Err(invalid(state));
            };
            reconciler.delete(ctx, record).await?;
            *state = ResourceState::Absent;
            Ok(Vec::new())
        }
    }
}
