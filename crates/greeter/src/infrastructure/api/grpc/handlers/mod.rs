// crates/greeter/src/infrastructure/api/grpc/handlers/mod.rs

mod greeter_handler;

pub use greeter_handler::GreeterHandler;
