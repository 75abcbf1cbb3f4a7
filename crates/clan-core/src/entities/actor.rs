//! Actor - the authenticated caller of a privileged operation

use serde::{Deserialize, Serialize};

/// Authenticated principal, as established by the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
