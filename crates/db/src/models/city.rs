use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub state: String,
    #[serde(default = "bool_true")]
    pub active: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn bool_true() -> bool {
    true
}

impl City {
    pub const COLLECTION: &'static str = "cities";

    /// Label copied onto listings that reference this city.
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.state)
    }
}
