pub mod dataset;
pub mod loader;
pub mod query;

pub use dataset::*;
pub use loader::*;
pub use query::*;
