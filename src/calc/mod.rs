pub mod range;
pub mod summary;
