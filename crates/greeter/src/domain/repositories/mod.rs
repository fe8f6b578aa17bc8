// crates/greeter/src/domain/repositories/mod.rs

mod user_repository;
mod user_repository_stub;

pub use user_repository::UserRepository;
pub use user_repository_stub::UserRepositoryStub;
