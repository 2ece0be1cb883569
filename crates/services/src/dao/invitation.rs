use std::time::Duration;

use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use realty_db::models::Invitation;
use tracing::info;

use super::base::{BaseDao, DaoResult};

const TOKEN_LEN: usize = 32;

pub struct InvitationDao {
    pub base: BaseDao<Invitation>,
}

impl InvitationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Invitation::COLLECTION),
        }
    }

    /// Issues a fresh token for `email`, replacing any earlier invitation.
    pub async fn create(
        &self,
        email: String,
        invited_by: ObjectId,
        ttl: Duration,
    ) -> DaoResult<Invitation> {
        self.base.hard_delete(doc! { "email": &email }).await?;

        let now = DateTime::now();
        let expires_at = DateTime::from_millis(
            now.timestamp_millis()
                .saturating_add(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)),
        );
        let invitation = Invitation {
            id: None,
            email,
            token: nanoid::nanoid!(TOKEN_LEN),
            expires_at,
            invited_by,
            created_at: now,
        };

        let id = self.base.insert_one(&invitation).await?;
        info!(invitation_id = %id, email = %invitation.email, "Invitation issued");
        self.base.find_by_id(id).await
    }

    /// The matching invitation, unless it has expired. The TTL monitor only
    /// sweeps periodically, so expiry is also checked here.
    pub async fn find_valid(&self, email: &str, token: &str) -> DaoResult<Option<Invitation>> {
        self.base
            .find_one(doc! {
                "email": email,
                "token": token,
                "expiresAt": { "$gt": DateTime::now() },
            })
            .await
    }

    pub async fn consume(&self, id: ObjectId) -> DaoResult<bool> {
        self.base.delete_by_id(id).await
    }
}
