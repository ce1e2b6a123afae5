//! HTTP implementation of [`ProvisioningApi`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::ProvisioningApi;
use crate::context::CallContext;
use crate::error::{ClientError, Result};
use crate::types::{
    AllocatedServer, CreateServerRequest, Envelope, OperatingSystem, Plan, Server,
};

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-rd-key";

/// Client for the Rackdog REST API.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base: Url,
    api_key: String,
    timeout: Duration,
    http: Client,
}

impl HttpClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(endpoint: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, api_key, Self::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let trimmed = endpoint.trim_end_matches('/');
        let base = Url::parse(trimmed).map_err(|e| ClientError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: "not a base URL".to_string(),
            });
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base,
            api_key: api_key.into(),
            timeout,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.base.as_str()
    }

    /// Build a URL below the base, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response> {
        if ctx.is_expired() {
            return Err(ClientError::DeadlineExceeded);
        }

        debug!(method = %method, url = %url, "Calling Rackdog API");

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(CONTENT_TYPE, "application/json");
        // The caller's deadline only matters when it is tighter than ours.
        let deadline_bound = ctx.remaining().filter(|r| *r < self.timeout);
        if let Some(remaining) = deadline_bound {
            request = request.timeout(remaining);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() && deadline_bound.is_some() {
                ClientError::DeadlineExceeded
            } else {
                ClientError::Request(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(method = %method, url = %url, status = status.as_u16(), "Rackdog API call failed");
        Err(ClientError::Http {
            status: status.as_u16(),
            method: method.to_string(),
            url: url.to_string(),
            body,
        })
    }

    async fn envelope<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Envelope<T>> {
        let response = self.send(ctx, method, url, body).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn data<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T> {
        let envelope: Envelope<T> = self.envelope(ctx, method, url, body).await?;
        if !envelope.success {
            return Err(ClientError::Api(envelope.message));
        }
        envelope.data.ok_or(ClientError::MissingData)
    }
}

#[async_trait]
impl ProvisioningApi for HttpClient {
    async fn create_server(
        &self,
        ctx: &CallContext,
        request: &CreateServerRequest,
    ) -> Result<AllocatedServer> {
        let url = self.url(&["v1", "ordering", "allocate"]);
        self.data(ctx, Method::POST, url, Some(request)).await
    }

    async fn get_server(&self, ctx: &CallContext, id: &str) -> Result<Server> {
        let url = self.url(&["v1", "servers", id]);
        self.data(ctx, Method::GET, url, None::<&()>).await
    }

    async fn delete_server(&self, ctx: &CallContext, id: &str) -> Result<()> {
        let url = self.url(&["v1", "servers", id, "destroy"]);
        self.send(ctx, Method::DELETE, url, None::<&()>).await?;
        Ok(())
    }

    async fn check_raid(&self, ctx: &CallContext, raid: i64, plan_id: i64) -> Result<bool> {
        let plan = plan_id.to_string();
        let raid = raid.to_string();
        let url = self.url(&["v1", "ordering", "plans", &plan, "raid", &raid, "check"]);
        let envelope: Envelope<serde_json::Value> =
            self.envelope(ctx, Method::GET, url, None::<&()>).await?;
        if !envelope.success {
            debug!(plan_id, raid = %raid, message = %envelope.message, "RAID level rejected");
        }
        Ok(envelope.success)
    }

    async fn list_plans(&self, ctx: &CallContext, location: Option<&str>) -> Result<Vec<Plan>> {
        let mut url = self.url(&["v1", "ordering", "plans"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("showAll", "true");
            if let Some(location) = location.filter(|l| !l.is_empty()) {
                query.append_pair("location", location);
            }
        }
        self.data(ctx, Method::GET, url, None::<&()>).await
    }

    async fn list_operating_systems(&self, ctx: &CallContext) -> Result<Vec<OperatingSystem>> {
        let url = self.url(&["v1", "ordering", "os"]);
        self.data(ctx, Method::GET, url, None::<&()>).await
    }
}
