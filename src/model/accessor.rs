//! Accessor descriptors interpreted by `Model::get` / `Model::set`.
//!
//! Every generated accessor is data, not code: the registry maps member names
//! to a `Reader` or `Writer`, and derived accessors wrap or reference the
//! attribute they were layered on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reader {
    /// Stored value, falling back to the declared default
    Attribute,
    /// Reads another member, e.g. the `archived?` predicate over `archived`
    Alias { target: String },
    /// Stored foreign key, else the id of the cached related record
    ForeignKey { association: String },
    /// Stored ids, else the ids of the cached related records
    AssociationIds { association: String },
    /// Resolved related record(s) rendered as JSON
    Association { association: String },
    /// Cached or derived `attribute * 100`
    Percentage { attribute: String },
    /// `1 - attribute`, or `1 + attribute` when `increase`
    Multiplier { attribute: String, increase: bool },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Writer {
    /// Raw store under the member's own name
    Attribute,
    /// Normalizes to true/false before delegating to the wrapped writer
    Boolean { inner: Box<Writer> },
    ForeignKey { association: String },
    AssociationIds { association: String },
    /// Only blank input is accepted through the dynamic writer
    Association { association: String },
    Percentage { attribute: String },
}
