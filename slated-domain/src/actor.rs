use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who is asking. Every mutation takes an explicit actor; the engine holds
/// no ambient session state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub role: ActorRole,
}

impl Actor {
    pub fn user(id: Uuid) -> Self {
        Self {
            id,
            role: ActorRole::User,
        }
    }

    pub fn provider(id: Uuid) -> Self {
        Self {
            id,
            role: ActorRole::Provider,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    User,
    Provider,
}

impl std::str::FromStr for ActorRole {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(ActorRole::User),
            "provider" => Ok(ActorRole::Provider),
            _ => Err(()),
        }
    }
}
