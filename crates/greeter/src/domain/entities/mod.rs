// crates/greeter/src/domain/entities/mod.rs

mod user;

pub use user::User;
