// crates/greeter/src/application/user_internal_service.rs

use shared_kernel::errors::{Fault, GrpcError};

use crate::domain::entities::User;
use crate::domain::errors::UserInternalError;

/// Account checks shared by several use cases. Knows nothing about the
/// greeter protocol: callers translate its failures into their own codes.
#[derive(Debug, Default)]
pub struct UserInternalService;

impl UserInternalService {
    pub fn new() -> Self {
        Self
    }

    pub fn check_user_banned(&self, user: &User) -> Result<bool, GrpcError> {
        if user.is_banned {
            return Err(GrpcError::propagate(UserInternalError::BannedUser));
        }
        Ok(false)
    }

    pub fn check_user_state(&self, user: &User) -> Result<(), Fault> {
        if user.nickname.trim().is_empty() {
            return Err(Fault::invalid_state("User nickname cannot be blank"));
        }
        Ok(())
    }

    pub fn check_user_invalid(&self, user: &User) -> Result<(), Fault> {
        if user.name.starts_with("invalid_") {
            return Err(Fault::invalid_argument("name", format!("Invalid user: {}", user.name)));
        }
        Ok(())
    }
}
