pub mod assign;
pub mod associations;
pub mod boolean;
pub mod naming;
pub mod percentage;
pub mod validate;

pub use assign::{AssignOptions, MissingPolicy};
pub use associations::Related;
pub use boolean::normalize_boolean;
pub use validate::Errors;
