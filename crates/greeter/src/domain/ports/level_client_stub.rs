// crates/greeter/src/domain/ports/level_client_stub.rs

use async_trait::async_trait;
use shared_kernel::infrastructure::grpc::RpcContext;
use std::sync::Mutex;
use tonic::Status;
use uuid::Uuid;

use crate::domain::ports::LevelClient;

pub struct LevelClientStub {
    pub level: Mutex<i32>,
    pub error_to_return: Mutex<Option<Status>>,
    /// User id of the inbound call active during each request.
    pub forwarded_user_ids: Mutex<Vec<Option<Uuid>>>,
}

impl Default for LevelClientStub {
    fn default() -> Self {
        Self {
            level: Mutex::new(1),
            error_to_return: Mutex::new(None),
            forwarded_user_ids: Mutex::new(Vec::new()),
        }
    }
}

impl LevelClientStub {
    pub fn with_level(self, level: i32) -> Self {
        if let Ok(mut current) = self.level.lock() {
            *current = level;
        }
        self
    }

    pub fn failing_with(self, status: Status) -> Self {
        if let Ok(mut error) = self.error_to_return.lock() {
            *error = Some(status);
        }
        self
    }
}

#[async_trait]
impl LevelClient for LevelClientStub {
    async fn get_level(&self, _user_id: Uuid) -> Result<i32, Status> {
        let forwarded = RpcContext::current().and_then(|ctx| ctx.user_id());
        self.forwarded_user_ids
            .lock()
            .map_err(|_| Status::internal("level stub lock poisoned"))?
            .push(forwarded);

        if let Some(status) = self
            .error_to_return
            .lock()
            .map_err(|_| Status::internal("level stub lock poisoned"))?
            .clone()
        {
            return Err(status);
        }

        self.level
            .lock()
            .map(|level| *level)
            .map_err(|_| Status::internal("level stub lock poisoned"))
    }
}
