pub mod cache;
pub mod google;
pub mod timeout;

pub use google::PlacesProvider;
