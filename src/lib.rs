// Library exports for column-features
// This allows the modules to be imported in tests and external code

pub mod config;
pub mod database;
pub mod error;
pub mod features;
pub mod grammar;
pub mod hooks;
pub mod html;
pub mod model;
pub mod random;
pub mod record;
pub mod schema;
pub mod value;

pub use config::{FeatureManifest, Settings};
pub use error::{ConfigurationError, Error, Result};
pub use model::{ModelRegistry, Services};
pub use record::{OldValue, Record, RecordState};
pub use value::Value;
