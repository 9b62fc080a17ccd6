pub mod config;
pub mod error;
pub mod formats;
pub mod model;
pub mod protocol;
pub mod services;
pub mod utils;

pub use config::CoreConfig;
pub use error::{L10nError, Result};
pub use model::format::Format;
pub use model::unit::{JsonUnit, Target, UnitItem, ValueKind};
pub use services::store::JsonStore;
