// crates/greeter/src/infrastructure/api/grpc/mod.rs

pub mod handlers;

mod grpc_level_client;

// Generated from proto/ by build.rs
pub mod greeter_raw_proto {
    pub mod greeter {
        pub mod v1 {
            include!(concat!(env!("OUT_DIR"), "/greeter.v1.rs"));
        }
    }
    pub mod level_service {
        pub mod v1 {
            include!(concat!(env!("OUT_DIR"), "/level_service.v1.rs"));
        }
    }
}

pub use greeter_raw_proto::greeter::v1 as greeter_v1;
pub use greeter_raw_proto::level_service::v1 as level_v1;

pub use grpc_level_client::{GrpcLevelClient, GrpcLevelClientBuilder};
