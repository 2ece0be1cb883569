use std::{fmt, str::FromStr};

use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// A property offered for rent or sale.
///
/// `category` and `city` are copies of the referenced [`Category`] name and
/// [`City`] "name, state" label taken at write time, so search and display
/// can work from the listing alone.
///
/// [`Category`]: super::Category
/// [`City`]: super::City
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    #[serde(default)]
    pub category: String,
    pub category_ref: Option<ObjectId>,
    pub city_ref: Option<ObjectId>,
    pub regular_price: f64,
    pub discount_price: Option<f64>,
    /// Display-only prices in each currency; the search never reads them.
    pub mxn_price: Option<f64>,
    pub usd_price: Option<f64>,
    #[serde(default)]
    pub offer: bool,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: f64,
    #[serde(default)]
    pub construction_area: f64,
    #[serde(default)]
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
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub video_url: Option<String>,
    #[serde(default)]
    pub custom_characteristics: Vec<String>,
    pub user_ref: ObjectId,
    #[serde(default)]
    pub sold: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sell,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Mxn,
}

fn default_parking_spaces() -> u32 {
    1
}

impl Listing {
    pub const COLLECTION: &'static str = "listings";
}

/// A discount only applies to offers and may not exceed the regular price.
pub fn discount_within_price(offer: bool, regular_price: f64, discount_price: Option<f64>) -> bool {
    match (offer, discount_price) {
        (true, Some(discount)) => discount <= regular_price,
        _ => true,
    }
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sell => "sell",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rent" => Ok(ListingType::Rent),
            "sell" => Ok(ListingType::Sell),
            other => Err(format!("unknown listing type '{other}'")),
        }
    }
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Mxn => "MXN",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USD" => Ok(Currency::Usd),
            "MXN" => Ok(Currency::Mxn),
            other => Err(format!("unknown currency '{other}'")),
        }
    }
}
