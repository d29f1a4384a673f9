use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::storage::Identified;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

impl Identified for Tag {
    fn id(&self) -> Uuid {
        self.id
    }
}
