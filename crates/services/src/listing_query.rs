//! Listing search: query-string parameters to a MongoDB filter, sort and window.
//!
//! Translation happens in two pure steps. [`SearchCriteria::parse`] applies
//! the same parse-or-default rules to every raw parameter, so a value that
//! does not parse behaves exactly as if it had been omitted. Then
//! [`ListingQuery::from_criteria`] turns the typed criteria into BSON.
//!
//! Boolean amenities (`offer`, `furnished`, `parking`, `garden`, `pets`) are
//! opt-in restrictors: only the literal `"true"` narrows the result, anything
//! else leaves that field unfiltered.

use std::str::FromStr;

use bson::{Document, doc, oid::ObjectId};
use realty_db::models::{Currency, ListingType};
use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 9;
pub const DEFAULT_SORT_FIELD: &str = "createdAt";
/// The server stores `skip` as a signed 64-bit integer.
const MAX_SKIP: u64 = i64::MAX as u64;

/// Listing fields a client may sort on.
const SORTABLE_FIELDS: &[&str] = &[
    "createdAt",
    "updatedAt",
    "regularPrice",
    "discountPrice",
    "bedrooms",
    "bathrooms",
    "constructionArea",
    "landArea",
    "name",
];

/// Raw search parameters exactly as they arrive in the query string.
///
/// Every field is an unparsed string so a malformed value can never reject
/// the request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSearchParams {
    pub search_term: Option<String>,
    pub offer: Option<String>,
    pub furnished: Option<String>,
    pub parking: Option<String>,
    pub garden: Option<String>,
    pub pets: Option<String>,
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub category_ref: Option<String>,
    pub city_ref: Option<String>,
    pub bedrooms: Option<String>,
    pub bathrooms: Option<String>,
    pub square_meters: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<String>,
    pub start_index: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn direction(self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CategoryFilter {
    Any,
    /// Restrict on `categoryRef`; wins over a name when both are given.
    Ref(ObjectId),
    /// Restrict on the denormalized `category` name.
    Name(String),
}

/// Typed, defaulted search criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub search_term: String,
    pub offer: bool,
    pub furnished: bool,
    pub parking: bool,
    pub garden: bool,
    pub pets: bool,
    pub listing_type: Option<ListingType>,
    pub currency: Option<Currency>,
    pub category: CategoryFilter,
    pub city_ref: Option<ObjectId>,
    pub min_bedrooms: Option<f64>,
    pub min_bathrooms: Option<f64>,
    pub min_construction_area: Option<f64>,
    pub sort_field: &'static str,
    pub order: SortOrder,
    pub limit: i64,
    pub start_index: u64,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self::parse(&ListingSearchParams::default())
    }
}

impl SearchCriteria {
    pub fn parse(params: &ListingSearchParams) -> Self {
        let category = match parse_opt::<ObjectId>(&params.category_ref) {
            Some(id) => CategoryFilter::Ref(id),
            None => match present(&params.category) {
                Some(name) if name != "all" => CategoryFilter::Name(name.to_string()),
                _ => CategoryFilter::Any,
            },
        };

        let sort_field = present(&params.sort)
            .and_then(|requested| SORTABLE_FIELDS.iter().copied().find(|f| *f == requested))
            .unwrap_or(DEFAULT_SORT_FIELD);

        let order = match present(&params.order) {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        Self {
            search_term: params
                .search_term
                .clone()
                .filter(|term| !term.trim().is_empty())
                .unwrap_or_default(),
            offer: opt_in(&params.offer),
            furnished: opt_in(&params.furnished),
            parking: opt_in(&params.parking),
            garden: opt_in(&params.garden),
            pets: opt_in(&params.pets),
            listing_type: choice(&params.listing_type),
            currency: choice(&params.currency),
            category,
            city_ref: parse_opt(&params.city_ref),
            min_bedrooms: lower_bound(&params.bedrooms),
            min_bathrooms: lower_bound(&params.bathrooms),
            min_construction_area: lower_bound(&params.square_meters),
            sort_field,
            order,
            limit: parse_opt::<i64>(&params.limit)
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_LIMIT),
            start_index: parse_opt::<u64>(&params.start_index).map_or(0, |skip| skip.min(MAX_SKIP)),
        }
    }
}

/// A ready-to-run listing read.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: Document,
    pub sort: Document,
    pub skip: u64,
    pub limit: i64,
}

impl ListingQuery {
    pub fn from_params(params: &ListingSearchParams) -> Self {
        Self::from_criteria(&SearchCriteria::parse(params))
    }

    pub fn from_criteria(criteria: &SearchCriteria) -> Self {
        let mut filter = Document::new();

        if !criteria.search_term.is_empty() {
            let pattern = escape_regex(&criteria.search_term);
            filter.insert(
                "$or",
                vec![
                    doc! { "name": { "$regex": &pattern, "$options": "i" } },
                    doc! { "address": { "$regex": &pattern, "$options": "i" } },
                    doc! { "description": { "$regex": &pattern, "$options": "i" } },
                ],
            );
        }

        if let Some(listing_type) = criteria.listing_type {
            filter.insert("type", listing_type.as_str());
        }
        if let Some(currency) = criteria.currency {
            filter.insert("currency", currency.as_str());
        }

        let flags = [
            ("offer", criteria.offer),
            ("furnished", criteria.furnished),
            ("parking", criteria.parking),
            ("garden", criteria.garden),
            ("pets", criteria.pets),
        ];
        for (field, required) in flags {
            if required {
                filter.insert(field, true);
            }
        }

        match &criteria.category {
            CategoryFilter::Ref(id) => {
                filter.insert("categoryRef", *id);
            }
            CategoryFilter::Name(name) => {
                filter.insert("category", name.as_str());
            }
            CategoryFilter::Any => {}
        }

        if let Some(city_ref) = criteria.city_ref {
            filter.insert("cityRef", city_ref);
        }

        let bounds = [
            ("bedrooms", criteria.min_bedrooms),
            ("bathrooms", criteria.min_bathrooms),
            ("constructionArea", criteria.min_construction_area),
        ];
        for (field, bound) in bounds {
            if let Some(min) = bound {
                filter.insert(field, doc! { "$gte": min });
            }
        }

        // `_id` breaks ties so equal sort keys page deterministically
        let direction = criteria.order.direction();
        let mut sort = Document::new();
        sort.insert(criteria.sort_field, direction);
        sort.insert("_id", direction);

        Self {
            filter,
            sort,
            skip: criteria.start_index,
            limit: criteria.limit,
        }
    }
}

/// Trimmed value, or `None` when absent or blank.
fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_opt<T: FromStr>(raw: &Option<String>) -> Option<T> {
    present(raw)?.parse().ok()
}

fn opt_in(raw: &Option<String>) -> bool {
    present(raw) == Some("true")
}

/// `"all"`, absent and unrecognised values all mean "no restriction".
fn choice<T: FromStr>(raw: &Option<String>) -> Option<T> {
    match present(raw) {
        None | Some("all") => None,
        Some(value) => value.parse().ok(),
    }
}

fn lower_bound(raw: &Option<String>) -> Option<f64> {
    parse_opt::<f64>(raw).filter(|v| v.is_finite())
}

/// Escapes regex metacharacters so a search term matches literally.
pub fn escape_regex(term: &str) -> String {
    term.chars()
        .flat_map(|c| {
            if ".*+?^${}()|[]\\".contains(c) {
                vec!['\\', c]
            } else {
                vec![c]
            }
        })
        .collect()
}
