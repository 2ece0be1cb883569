pub mod auth;
pub mod dao;
pub mod listing_query;

pub use auth::AuthService;
pub use dao::*;
pub use listing_query::{ListingQuery, ListingSearchParams, SearchCriteria};
