//! Laundry discovery
//!
//! - [`search`]: filtering, geo annotation, ranking and pagination of listings

pub mod search;

pub use search::{
    LaundryDetail, LaundrySearch, Listing, ListingPage, PriceRange, Ranked, SearchQuery,
    ServiceView, format_price_range, rank,
};
