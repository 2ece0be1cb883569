use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use realty_db::models::{Category, Listing};
use tracing::info;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct CategoryDao {
    pub base: BaseDao<Category>,
    listings: BaseDao<Listing>,
}

impl CategoryDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Category::COLLECTION),
            listings: BaseDao::new(db, Listing::COLLECTION),
        }
    }

    pub async fn list(&self) -> DaoResult<Vec<Category>> {
        self.base.find_many(doc! {}, Some(doc! { "name": 1 })).await
    }

    pub async fn create(&self, name: Option<String>, active: Option<bool>) -> DaoResult<Category> {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DaoError::Validation("Name is required".to_string()))?;

        if self.base.find_one(doc! { "name": &name }).await?.is_some() {
            return Err(DaoError::Validation("Category already exists".to_string()));
        }

        let now = DateTime::now();
        let category = Category {
            id: None,
            name,
            active: active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&category).await?;
        info!(category_id = %id, name = %category.name, "Category created");
        self.base.find_by_id(id).await
    }

    /// Renaming does not touch listings that already copied the old name.
    pub async fn update(
        &self,
        id: ObjectId,
        name: Option<String>,
        active: Option<bool>,
    ) -> DaoResult<Category> {
        let current = self.base.find_by_id(id).await?;

        if name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(DaoError::Validation("Name cannot be empty".to_string()));
        }
        let name = name.map(|n| n.trim().to_string());

        if let Some(ref name) = name {
            let duplicate = self
                .base
                .find_one(doc! { "name": name, "_id": { "$ne": id } })
                .await?;
            if duplicate.is_some() {
                return Err(DaoError::Validation("Category already exists".to_string()));
            }
        }

        self.base
            .update_by_id(
                id,
                doc! {
                    "$set": {
                        "name": name.unwrap_or(current.name),
                        "active": active.unwrap_or(current.active),
                    }
                },
            )
            .await?;

        self.base.find_by_id(id).await
    }

    /// Refuses while any listing still references the category.
    pub async fn delete(&self, id: ObjectId) -> DaoResult<()> {
        self.base.find_by_id(id).await?;

        let in_use = self.listings.count(doc! { "categoryRef": id }).await?;
        if in_use > 0 {
            return Err(DaoError::Validation(format!(
                "Cannot delete category: {in_use} listing(s) still use it"
            )));
        }

        self.base.delete_by_id(id).await?;
        info!(category_id = %id, "Category deleted");
        Ok(())
    }
}
