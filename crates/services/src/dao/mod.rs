pub mod base;
pub mod category;
pub mod city;
pub mod invitation;
pub mod listing;
pub mod user;

pub use base::BaseDao;
