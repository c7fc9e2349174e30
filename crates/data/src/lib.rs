//! Record loading and validation for the catalog.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
