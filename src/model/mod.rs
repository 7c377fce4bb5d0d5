pub mod accessor;
pub mod class;
pub mod common;
pub mod inflect;
pub mod instance;
pub mod registry;
pub mod rules;
pub mod schema;

pub use accessor::*;
pub use class::*;
pub use common::*;
pub use instance::*;
pub use registry::*;
pub use rules::*;
pub use schema::*;
