pub mod category;
pub mod city;
pub mod invitation;
pub mod listing;
pub mod user;

pub use category::Category;
pub use city::City;
pub use invitation::Invitation;
pub use listing::{Currency, Listing, ListingType};
pub use user::User;
