// crates/greeter/src/domain/mod.rs

pub mod entities;
pub mod errors;
pub mod ports;
pub mod repositories;
