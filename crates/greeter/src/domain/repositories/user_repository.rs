// crates/greeter/src/domain/repositories/user_repository.rs

use async_trait::async_trait;
use shared_kernel::errors::Fault;

use crate::domain::entities::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, Fault>;
}
