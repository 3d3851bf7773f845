pub mod resolve;
pub mod schema;
pub mod validate;
