//! Catalog loading and validation for swipe sessions.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
