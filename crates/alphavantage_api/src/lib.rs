pub mod api;
pub mod cache;
pub mod payload;

mod error;

pub use error::CustomError;
