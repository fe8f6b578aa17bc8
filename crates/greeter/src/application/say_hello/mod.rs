// crates/greeter/src/application/say_hello/mod.rs

mod say_hello_command;
mod say_hello_use_case;

pub use say_hello_command::SayHelloCommand;
pub use say_hello_use_case::SayHelloUseCase;
