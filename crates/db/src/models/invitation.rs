use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Single-use token that lets the holder of `email` register as an admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub token: String,
    pub expires_at: DateTime,
    pub invited_by: ObjectId,
    pub created_at: DateTime,
}

impl Invitation {
    pub const COLLECTION: &'static str = "invitations";
}
