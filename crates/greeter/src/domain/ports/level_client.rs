// crates/greeter/src/domain/ports/level_client.rs

use async_trait::async_trait;
use tonic::Status;
use uuid::Uuid;

/// Level of a user, owned by the level service.
///
/// Failures are the downstream `Status` as received, trailers included.
#[async_trait]
pub trait LevelClient: Send + Sync {
    async fn get_level(&self, user_id: Uuid) -> Result<i32, Status>;
}
