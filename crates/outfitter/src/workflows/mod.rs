pub mod backend;
pub mod host;
pub mod listing;
