use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use realty_db::models::{City, Listing};
use tracing::info;

use super::base::{BaseDao, DaoError, DaoResult};

pub struct CityDao {
    pub base: BaseDao<City>,
    listings: BaseDao<Listing>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl CityDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, City::COLLECTION),
            listings: BaseDao::new(db, Listing::COLLECTION),
        }
    }

    pub async fn list(&self) -> DaoResult<Vec<City>> {
        self.base
            .find_many(doc! {}, Some(doc! { "state": 1, "name": 1 }))
            .await
    }

    pub async fn create(
        &self,
        name: Option<String>,
        state: Option<String>,
        active: Option<bool>,
    ) -> DaoResult<City> {
        let (Some(name), Some(state)) = (non_blank(name), non_blank(state)) else {
            return Err(DaoError::Validation("Name and state are required".to_string()));
        };

        let existing = self
            .base
            .find_one(doc! { "name": &name, "state": &state })
            .await?;
        if existing.is_some() {
            return Err(DaoError::Validation("City already exists".to_string()));
        }

        let now = DateTime::now();
        let city = City {
            id: None,
            name,
            state,
            active: active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&city).await?;
        info!(city_id = %id, city = %city.label(), "City created");
        self.base.find_by_id(id).await
    }

    pub async fn update(
        &self,
        id: ObjectId,
        name: Option<String>,
        state: Option<String>,
        active: Option<bool>,
    ) -> DaoResult<City> {
        let current = self.base.find_by_id(id).await?;

        let blank = |v: &Option<String>| v.as_deref().is_some_and(|s| s.trim().is_empty());
        if blank(&name) || blank(&state) {
            return Err(DaoError::Validation(
                "Name and state cannot be empty".to_string(),
            ));
        }

        let changes_identity = name.is_some() || state.is_some();
        let name = non_blank(name).unwrap_or(current.name);
        let state = non_blank(state).unwrap_or(current.state);

        if changes_identity {
            let duplicate = self
                .base
                .find_one(doc! { "name": &name, "state": &state, "_id": { "$ne": id } })
                .await?;
            if duplicate.is_some() {
                return Err(DaoError::Validation("City already exists".to_string()));
            }
        }

        self.base
            .update_by_id(
                id,
                doc! {
                    "$set": {
                        "name": name,
                        "state": state,
                        "active": active.unwrap_or(current.active),
                    }
                },
            )
            .await?;

        self.base.find_by_id(id).await
    }

    /// Refuses while any listing still references the city.
    pub async fn delete(&self, id: ObjectId) -> DaoResult<()> {
        self.base.find_by_id(id).await?;

        let in_use = self.listings.count(doc! { "cityRef": id }).await?;
        if in_use > 0 {
            return Err(DaoError::Validation(format!(
                "Cannot delete city: {in_use} listing(s) still use it"
            )));
        }

        self.base.delete_by_id(id).await?;
        info!(city_id = %id, "City deleted");
        Ok(())
    }
}
