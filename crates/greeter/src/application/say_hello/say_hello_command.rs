// crates/greeter/src/application/say_hello/say_hello_command.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SayHelloCommand {
    pub name: String,
}
