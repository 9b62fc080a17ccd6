pub mod encoding;
pub mod plurals;
pub mod qa;
pub mod store;
