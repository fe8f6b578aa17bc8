// crates/shared-kernel/src/lib.rs

pub mod errors;
pub mod infrastructure;

mod utils;
