//! Collection services
//!
//! The unit other systems call: validation, cache and gateway composed
//! into create/read/update/delete/count for each entity kind.

mod catalog;
mod collection;
mod errors;

pub use catalog::Catalog;
pub use collection::CollectionService;
pub use errors::{ServiceError, ServiceResult};
