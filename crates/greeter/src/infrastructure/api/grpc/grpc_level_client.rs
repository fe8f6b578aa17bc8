// crates/greeter/src/infrastructure/api/grpc/grpc_level_client.rs

use async_trait::async_trait;
use shared_kernel::infrastructure::grpc::forward_call_context;
use std::time::Duration;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, Endpoint};
use tonic::{Request, Status};
use uuid::Uuid;

use super::level_v1::level_service_client::LevelServiceClient;
use super::level_v1::GetLevelRequest;
use crate::domain::ports::LevelClient;

type CallContextInterceptor = fn(Request<()>) -> Result<Request<()>, Status>;

/// [`LevelClient`] talking to the level service over gRPC.
/// Every call forwards the caller's user id.
#[derive(Debug, Clone)]
pub struct GrpcLevelClient {
    inner: LevelServiceClient<InterceptedService<Channel, CallContextInterceptor>>,
}

impl GrpcLevelClient {
    pub fn new(channel: Channel) -> Self {
        let interceptor: CallContextInterceptor = forward_call_context;
        Self { inner: LevelServiceClient::with_interceptor(channel, interceptor) }
    }
}

#[async_trait]
impl LevelClient for GrpcLevelClient {
    async fn get_level(&self, user_id: Uuid) -> Result<i32, Status> {
        let request = Request::new(GetLevelRequest { user_id: user_id.to_string() });

        let response = self.inner.clone().get_level(request).await?;

        Ok(response.into_inner().level)
    }
}

pub struct GrpcLevelClientBuilder {
    pub(crate) url: String,
    pub(crate) connect_timeout: Duration,
}

impl Default for GrpcLevelClientBuilder {
    fn default() -> Self {
        Self {
            url: "http://level-service:8080".to_string(),
            connect_timeout: Duration::from_secs(3),
        }
    }
}

impl GrpcLevelClientBuilder {
    /// Reads `LEVEL_SERVICE_URL` and `LEVEL_SERVICE_CONNECT_TIMEOUT` (seconds).
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let url = std::env::var("LEVEL_SERVICE_URL").unwrap_or(defaults.url);

        let connect_timeout = std::env::var("LEVEL_SERVICE_CONNECT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.connect_timeout);

        Self { url, connect_timeout }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = duration;
        self
    }

    /// The connection is opened on first use. Needs a tokio runtime.
    pub fn build(self) -> Result<GrpcLevelClient, tonic::transport::Error> {
        let channel = Endpoint::from_shared(self.url)?
            .connect_timeout(self.connect_timeout)
            .connect_lazy();

        tracing::info!("📡 Level service client ready");
        Ok(GrpcLevelClient::new(channel))
    }
}
