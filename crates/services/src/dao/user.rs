use bson::{DateTime, Document, doc, oid::ObjectId};
use mongodb::Database;
use realty_db::models::User;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, User::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        username: String,
        email: String,
        password_hash: String,
        phone_number: Option<String>,
        is_admin: bool,
    ) -> DaoResult<User> {
        let now = DateTime::now();
        let user = User {
            id: None,
            username,
            email,
            password_hash,
            phone_number,
            avatar: None,
            is_admin,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&user).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> DaoResult<User> {
        self.base
            .find_one(doc! { "email": email })
            .await?
            .ok_or(DaoError::NotFound)
    }

    pub async fn email_taken(&self, email: &str) -> DaoResult<bool> {
        Ok(self.base.count(doc! { "email": email }).await? > 0)
    }

    pub async fn list(&self) -> DaoResult<Vec<User>> {
        self.base
            .find_many(doc! {}, Some(doc! { "createdAt": -1 }))
            .await
    }

    pub async fn update_profile(
        &self,
        user_id: ObjectId,
        username: Option<String>,
        email: Option<String>,
        password_hash: Option<String>,
        phone_number: Option<String>,
        avatar: Option<String>,
    ) -> DaoResult<User> {
        let mut update = Document::new();
        if let Some(name) = username {
            update.insert("username", name);
        }
        if let Some(email) = email {
            update.insert("email", email);
        }
        if let Some(hash) = password_hash {
            update.insert("passwordHash", hash);
        }
        if let Some(phone) = phone_number {
            update.insert("phoneNumber", phone);
        }
        if let Some(av) = avatar {
            update.insert("avatar", av);
        }

        if !update.is_empty() {
            self.base
                .update_by_id(user_id, doc! { "$set": update })
                .await?;
        }

        self.base.find_by_id(user_id).await
    }

    pub async fn delete(&self, user_id: ObjectId) -> DaoResult<()> {
        if !self.base.delete_by_id(user_id).await? {
            return Err(DaoError::NotFound);
        }
        Ok(())
    }
}
