// crates/greeter/src/domain/entities/user.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub nickname: String,
    pub is_banned: bool,
}

impl User {
    pub fn new(name: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            nickname: nickname.into(),
            is_banned: false,
        }
    }

    pub fn banned(mut self) -> Self {
        self.is_banned = true;
        self
    }
}
