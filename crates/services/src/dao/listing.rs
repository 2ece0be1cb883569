use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;
use realty_db::models::{Category, City, Currency, Listing, ListingType, listing::discount_within_price};
use serde::Deserialize;
use tracing::{debug, info};
use validator::{Validate, ValidationError};

use super::base::{BaseDao, DaoError, DaoResult};
use crate::listing_query::ListingQuery;

/// Payload for a new listing. `userRef` is never taken from here.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_listing_input"))]
pub struct ListingInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    pub city: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub category: Option<String>,
    pub category_ref: Option<String>,
    pub city_ref: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Regular price must be positive"))]
    pub regular_price: f64,
    #[validate(range(min = 0.0, message = "Discount price cannot be negative"))]
    pub discount_price: Option<f64>,
    #[validate(range(min = 0.0, message = "MXN price cannot be negative"))]
    pub mxn_price: Option<f64>,
    #[validate(range(min = 0.0, message = "USD price cannot be negative"))]
    pub usd_price: Option<f64>,
    #[serde(default)]
    pub offer: bool,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Bathrooms cannot be negative"))]
    pub bathrooms: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Construction area cannot be negative"))]
    pub construction_area: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "Land area cannot be negative"))]
    pub land_area: f64,
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(default = "default_parking_spaces")]
    pub parking_spaces: u32,
    #[serde(default)]
    pub garden: bool,
    #[serde(default)]
    pub pets: bool,
    #[validate(length(min = 1, message = "At least one image is required"))]
    pub image_urls: Vec<String>,
    pub video_url: Option<String>,
    #[serde(default)]
    pub custom_characteristics: Vec<String>,
    #[serde(default)]
    pub sold: bool,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Description cannot be empty"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
    pub city: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
    #[serde(rename = "type")]
    pub listing_type: Option<ListingType>,
    pub category: Option<String>,
    pub category_ref: Option<String>,
    pub city_ref: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Regular price must be positive"))]
    pub regular_price: Option<f64>,
    #[validate(range(min = 0.0, message = "Discount price cannot be negative"))]
    pub discount_price: Option<f64>,
    #[validate(range(min = 0.0, message = "MXN price cannot be negative"))]
    pub mxn_price: Option<f64>,
    #[validate(range(min = 0.0, message = "USD price cannot be negative"))]
    pub usd_price: Option<f64>,
    pub offer: Option<bool>,
    pub currency: Option<Currency>,
    pub bedrooms: Option<u32>,
    #[validate(range(min = 0.0, message = "Bathrooms cannot be negative"))]
    pub bathrooms: Option<f64>,
    #[validate(range(min = 0.0, message = "Construction area cannot be negative"))]
    pub construction_area: Option<f64>,
    #[validate(range(min = 0.0, message = "Land area cannot be negative"))]
    pub land_area: Option<f64>,
    pub furnished: Option<bool>,
    pub parking: Option<bool>,
    pub parking_spaces: Option<u32>,
    pub garden: Option<bool>,
    pub pets: Option<bool>,
    #[validate(length(min = 1, message = "At least one image is required"))]
    pub image_urls: Option<Vec<String>>,
    pub video_url: Option<String>,
    pub custom_characteristics: Option<Vec<String>>,
    pub sold: Option<bool>,
}

fn default_parking_spaces() -> u32 {
    1
}

fn validate_listing_input(input: &ListingInput) -> Result<(), ValidationError> {
    check_listing_rules(
        input.offer,
        input.regular_price,
        input.discount_price,
        input.parking,
        input.parking_spaces,
    )
}

fn check_listing_rules(
    offer: bool,
    regular_price: f64,
    discount_price: Option<f64>,
    parking: bool,
    parking_spaces: u32,
) -> Result<(), ValidationError> {
    if !discount_within_price(offer, regular_price, discount_price) {
        let mut err = ValidationError::new("discount_price");
        err.message = Some("Discount price must be lower than regular price".into());
        return Err(err);
    }
    if parking && parking_spaces < 1 {
        let mut err = ValidationError::new("parking_spaces");
        err.message = Some("Parking requires at least one space".into());
        return Err(err);
    }
    Ok(())
}

/// Parses an optional reference id; blank means "no reference".
fn parse_ref(field: &str, raw: Option<&str>) -> DaoResult<Option<ObjectId>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(hex) => ObjectId::parse_str(hex)
            .map(Some)
            .map_err(|_| DaoError::Validation(format!("Invalid {field}"))),
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

impl ListingPatch {
    /// Merges the patch into `listing`. Returns which denormalized labels
    /// the caller should refresh from the new references.
    fn apply_to(self, listing: &mut Listing) -> DaoResult<LabelRefresh> {
        let refresh = LabelRefresh {
            category: self.category_ref.is_some() && is_blank(self.category.as_deref()),
            city: self.city_ref.is_some() && is_blank(self.city.as_deref()),
        };

        if let Some(raw) = self.category_ref.as_deref() {
            listing.category_ref = parse_ref("categoryRef", Some(raw))?;
        }
        if let Some(raw) = self.city_ref.as_deref() {
            listing.city_ref = parse_ref("cityRef", Some(raw))?;
        }

        if let Some(v) = self.name {
            listing.name = v;
        }
        if let Some(v) = self.description {
            listing.description = v;
        }
        if let Some(v) = self.address {
            listing.address = v;
        }
        if let Some(v) = self.city {
            listing.city = Some(v);
        }
        if let Some(v) = self.latitude {
            listing.latitude = Some(v);
        }
        if let Some(v) = self.longitude {
            listing.longitude = Some(v);
        }
        if let Some(v) = self.listing_type {
            listing.listing_type = v;
        }
        if let Some(v) = self.category {
            listing.category = v;
        }
        if let Some(v) = self.regular_price {
            listing.regular_price = v;
        }
        if let Some(v) = self.discount_price {
            listing.discount_price = Some(v);
        }
        if let Some(v) = self.mxn_price {
            listing.mxn_price = Some(v);
        }
        if let Some(v) = self.usd_price {
            listing.usd_price = Some(v);
        }
        if let Some(v) = self.offer {
            listing.offer = v;
        }
        if let Some(v) = self.currency {
            listing.currency = v;
        }
        if let Some(v) = self.bedrooms {
            listing.bedrooms = v;
        }
        if let Some(v) = self.bathrooms {
            listing.bathrooms = v;
        }
        if let Some(v) = self.construction_area {
            listing.construction_area = v;
        }
        if let Some(v) = self.land_area {
            listing.land_area = v;
        }
        if let Some(v) = self.furnished {
            listing.furnished = v;
        }
        if let Some(v) = self.parking {
            listing.parking = v;
        }
        if let Some(v) = self.parking_spaces {
            listing.parking_spaces = v;
        }
        if let Some(v) = self.garden {
            listing.garden = v;
        }
        if let Some(v) = self.pets {
            listing.pets = v;
        }
        if let Some(v) = self.image_urls {
            listing.image_urls = v;
        }
        if let Some(v) = self.video_url {
            listing.video_url = Some(v);
        }
        if let Some(v) = self.custom_characteristics {
            listing.custom_characteristics = v;
        }
        if let Some(v) = self.sold {
            listing.sold = v;
        }

        check_listing_rules(
            listing.offer,
            listing.regular_price,
            listing.discount_price,
            listing.parking,
            listing.parking_spaces,
        )
        .map_err(|e| DaoError::Validation(e.to_string()))?;

        Ok(refresh)
    }
}

/// Which denormalized labels a write must resolve from their references.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct LabelRefresh {
    category: bool,
    city: bool,
}

pub struct ListingDao {
    pub base: BaseDao<Listing>,
    categories: BaseDao<Category>,
    cities: BaseDao<City>,
}

impl ListingDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Listing::COLLECTION),
            categories: BaseDao::new(db, Category::COLLECTION),
            cities: BaseDao::new(db, City::COLLECTION),
        }
    }

    /// Runs a search as a single read: filter, sort, skip, limit.
    pub async fn search(&self, query: &ListingQuery) -> DaoResult<Vec<Listing>> {
        debug!(filter = %query.filter, sort = %query.sort, skip = query.skip, limit = query.limit, "Listing search");
        self.base
            .find_window(
                query.filter.clone(),
                query.sort.clone(),
                query.skip,
                query.limit,
            )
            .await
    }

    pub async fn create(&self, owner: ObjectId, input: ListingInput) -> DaoResult<Listing> {
        let category_ref = parse_ref("categoryRef", input.category_ref.as_deref())?;
        let city_ref = parse_ref("cityRef", input.city_ref.as_deref())?;
        let refresh = LabelRefresh {
            category: is_blank(input.category.as_deref()),
            city: is_blank(input.city.as_deref()),
        };

        let now = DateTime::now();
        let mut listing = Listing {
            id: None,
            name: input.name,
            description: input.description,
            address: input.address,
            city: input.city,
            latitude: input.latitude,
            longitude: input.longitude,
            listing_type: input.listing_type,
            category: input.category.unwrap_or_default(),
            category_ref,
            city_ref,
            regular_price: input.regular_price,
            discount_price: input.discount_price,
            mxn_price: input.mxn_price,
            usd_price: input.usd_price,
            offer: input.offer,
            currency: input.currency,
            bedrooms: input.bedrooms,
            bathrooms: input.bathrooms,
            construction_area: input.construction_area,
            land_area: input.land_area,
            furnished: input.furnished,
            parking: input.parking,
            parking_spaces: input.parking_spaces,
            garden: input.garden,
            pets: input.pets,
            image_urls: input.image_urls,
            video_url: input.video_url,
            custom_characteristics: input.custom_characteristics,
            user_ref: owner,
            sold: input.sold,
            created_at: now,
            updated_at: now,
        };

        self.denormalize(&mut listing, refresh).await?;

        let id = self.base.insert_one(&listing).await?;
        info!(listing_id = %id, owner = %owner, "Listing created");
        self.base.find_by_id(id).await
    }

    pub async fn update(
        &self,
        id: ObjectId,
        caller: ObjectId,
        patch: ListingPatch,
    ) -> DaoResult<Listing> {
        let mut listing = self.find_owned(id, caller, "update").await?;
        let refresh = patch.apply_to(&mut listing)?;
        self.denormalize(&mut listing, refresh).await?;

        let mut set_doc = bson::to_document(&listing)?;
        set_doc.remove("_id");
        set_doc.remove("createdAt");
        set_doc.remove("userRef");

        self.base.update_by_id(id, doc! { "$set": set_doc }).await?;
        self.base.find_by_id(id).await
    }

    pub async fn delete(&self, id: ObjectId, caller: ObjectId) -> DaoResult<()> {
        self.find_owned(id, caller, "delete").await?;
        self.base.delete_by_id(id).await?;
        info!(listing_id = %id, "Listing deleted");
        Ok(())
    }

    pub async fn find_by_owner(&self, owner: ObjectId) -> DaoResult<Vec<Listing>> {
        self.base
            .find_many(
                doc! { "userRef": owner },
                Some(doc! { "createdAt": -1, "_id": -1 }),
            )
            .await
    }

    async fn find_owned(&self, id: ObjectId, caller: ObjectId, action: &str) -> DaoResult<Listing> {
        let listing = self.base.find_by_id(id).await?;
        if listing.user_ref != caller {
            return Err(DaoError::NotOwner(format!(
                "You are not authorized to {action} this listing"
            )));
        }
        Ok(listing)
    }

    /// Copies the referenced category name and city label onto the listing.
    /// A reference that no longer resolves leaves the label untouched.
    async fn denormalize(&self, listing: &mut Listing, refresh: LabelRefresh) -> DaoResult<()> {
        if refresh.category {
            if let Some(category_id) = listing.category_ref {
                match self.categories.find_one(doc! { "_id": category_id }).await? {
                    Some(category) => listing.category = category.name,
                    None => debug!(%category_id, "categoryRef does not resolve, keeping label"),
                }
            }
        }

        if refresh.city {
            if let Some(city_id) = listing.city_ref {
                match self.cities.find_one(doc! { "_id": city_id }).await? {
                    Some(city) => listing.city = Some(city.label()),
                    None => debug!(%city_id, "cityRef does not resolve, keeping label"),
                }
            }
        }

        Ok(())
    }
}
