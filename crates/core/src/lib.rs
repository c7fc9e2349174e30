//! Core catalog logic. Keep this crate free of IO and platform concerns.

pub mod assets;
pub mod catalog;
pub mod entry;
pub mod locale;
pub mod probe;
pub mod query;

pub use assets::*;
pub use catalog::*;
pub use entry::*;
pub use locale::*;
pub use probe::*;
pub use query::*;
