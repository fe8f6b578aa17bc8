// crates/greeter/src/domain/repositories/user_repository_stub.rs

use async_trait::async_trait;
use shared_kernel::errors::Fault;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::entities::User;
use crate::domain::repositories::UserRepository;

/// In-memory users, keyed by name.
#[derive(Default)]
pub struct UserRepositoryStub {
    pub users: Mutex<HashMap<String, User>>,
    pub error_to_return: Mutex<Option<Fault>>,
}

impl UserRepositoryStub {
    pub fn with_user(self, user: User) -> Self {
        if let Ok(mut users) = self.users.lock() {
            users.insert(user.name.clone(), user);
        }
        self
    }
}

#[async_trait]
impl UserRepository for UserRepositoryStub {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, Fault> {
        if let Some(err) = self.error_to_return.lock().map_err(poisoned)?.clone() {
            return Err(err);
        }
        Ok(self.users.lock().map_err(poisoned)?.get(name).cloned())
    }
}

fn poisoned<T>(_: T) -> Fault {
    Fault::Internal("user stub lock poisoned".into())
}
