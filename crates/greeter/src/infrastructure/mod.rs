// crates/greeter/src/infrastructure/mod.rs

pub mod api;
