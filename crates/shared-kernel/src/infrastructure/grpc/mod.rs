// crates/shared-kernel/src/infrastructure/grpc/mod.rs

mod catch_scope;
mod exception_handler;
mod exception_handler_builder;
mod interceptors;
mod rpc_context;
mod trailer_codec;

#[cfg(test)]
mod catch_scope_test;
#[cfg(test)]
mod trailer_codec_test;

pub use catch_scope::{
    catch, catch_async, catch_by_code, catch_by_code_async, catch_by_type, catch_by_type_async,
    catch_fixed, catch_fixed_async, CatchScope,
};
pub use exception_handler::{ExceptionHandler, ToGrpcStatus};
pub use exception_handler_builder::ExceptionHandlerBuilder;
pub use interceptors::{
    forward_call_context, propagate_user_id, user_id_interceptor, UserId, USER_ID_HEADER,
};
pub use rpc_context::{RpcContext, RpcName};
pub use trailer_codec::{TrailerCodec, TrailerError, ERROR_TRAILER_KEY};
