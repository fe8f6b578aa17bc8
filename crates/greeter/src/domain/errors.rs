// crates/greeter/src/domain/errors.rs

use shared_kernel::error_codes;

error_codes! {
    /// Mirrors `greeter.v1.GreeterError`.
    pub enum GreeterError in protocol "greeter.v1.GreeterError" {
        Unspecified => "GREETER_ERROR_UNSPECIFIED",
        UserNotFound => "GREETER_ERROR_USER_NOT_FOUND",
        UserInvalid => "GREETER_ERROR_USER_INVALID",
        UserBanned => "GREETER_ERROR_USER_BANNED",
        ServiceUnavailable => "GREETER_ERROR_SERVICE_UNAVAILABLE",
    }
}

error_codes! {
    /// Mirrors `level_service.v1.LevelServiceError`, as decoded from the level service trailers.
    pub enum LevelServiceError in protocol "level_service.v1.LevelServiceError" {
        Unspecified => "LEVEL_SERVICE_ERROR_UNSPECIFIED",
        UserNotFound => "LEVEL_SERVICE_ERROR_USER_NOT_FOUND",
        LevelSystemUnavailable => "LEVEL_SERVICE_ERROR_LEVEL_SYSTEM_UNAVAILABLE",
    }
}

error_codes! {
    /// Raised by [`UserInternalService`](crate::application::UserInternalService), never sent to clients.
    pub enum UserInternalError in internal "greeter.internal.UserInternalError" {
        BannedUser => "BANNED_USER",
    }
}
