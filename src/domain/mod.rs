pub mod limits;
pub mod listing;
