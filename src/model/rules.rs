use serde::{Deserialize, Serialize};

/// Validation rule registered on a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum Rule {
    Numericality { attribute: String, allow_blank: bool },
}
