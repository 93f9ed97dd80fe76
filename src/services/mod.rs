pub mod executor;
pub mod logger;
pub mod pagination;
pub mod registry;
pub mod validation;
