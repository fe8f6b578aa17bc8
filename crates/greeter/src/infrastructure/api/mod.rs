// crates/greeter/src/infrastructure/api/mod.rs

pub mod grpc;
