// crates/greeter/src/domain/ports/mod.rs

mod level_client;
mod level_client_stub;

pub use level_client::LevelClient;
pub use level_client_stub::LevelClientStub;
