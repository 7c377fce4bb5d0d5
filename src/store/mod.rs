pub mod memory;
pub mod traits;

pub use memory::{JsonRecord, MemoryLookup};
pub use traits::{Record, RecordLookup};
