use std::time::Duration;

use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::models::{Category, City, Invitation, Listing, User};

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users
    create_indexes(
        db,
        User::COLLECTION,
        vec![index_unique(bson::doc! { "email": 1 })],
    )
    .await?;

    // Listings
    create_indexes(
        db,
        Listing::COLLECTION,
        vec![
            index(bson::doc! { "userRef": 1, "createdAt": -1 }),
            index(bson::doc! { "categoryRef": 1 }),
            index(bson::doc! { "cityRef": 1 }),
            index(bson::doc! { "type": 1, "createdAt": -1 }),
            index(bson::doc! { "offer": 1, "createdAt": -1 }),
        ],
    )
    .await?;

    // Categories
    create_indexes(
        db,
        Category::COLLECTION,
        vec![index_unique(bson::doc! { "name": 1 })],
    )
    .await?;

    // Cities
    create_indexes(
        db,
        City::COLLECTION,
        vec![index_unique(bson::doc! { "state": 1, "name": 1 })],
    )
    .await?;

    // Invitations: one live invitation per email, swept by MongoDB once expired
    create_indexes(
        db,
        Invitation::COLLECTION,
        vec![
            index_unique(bson::doc! { "email": 1 }),
            index_ttl(bson::doc! { "expiresAt": 1 }, Duration::ZERO),
        ],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn index_ttl(keys: bson::Document, expire_after: Duration) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().expire_after(expire_after).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
