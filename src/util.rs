pub mod language_detect;
pub mod near_me;
