pub mod failure;
pub mod filters;
pub mod gate;
pub mod intent;
pub mod job;
pub mod language;
pub mod mapping;
pub mod place;
pub mod query;
