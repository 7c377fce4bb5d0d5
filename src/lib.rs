//! Virtual attribute models: declared in-memory attributes with defaults,
//! boolean and percentage accessors, simulated associations and bulk
//! assignment, all driven by a per-class schema registry.

pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

pub use error::{ModelError, Result};

// Export logic types
pub use logic::{normalize_boolean, AssignOptions, Errors, MissingPolicy, Related};

// Export all model types
pub use model::*;

// Export store types
pub use store::{JsonRecord, MemoryLookup, Record, RecordLookup};
