// crates/greeter/src/application/mod.rs

pub mod say_hello;

mod user_internal_service;

pub use user_internal_service::UserInternalService;
