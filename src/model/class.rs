use crate::error::ModelError;
use crate::model::{ClassId, Reader, Rule, Value, Writer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Derived accessor generator selected by an attribute's type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Boolean,
    Percentage,
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TypeTag::Boolean => write!(f, "boolean"),
            TypeTag::Percentage => write!(f, "percentage"),
        }
    }
}

impl std::str::FromStr for TypeTag {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(TypeTag::Boolean),
            "percentage" => Ok(TypeTag::Percentage),
            _ => Err(ModelError::InvalidArgument(format!(
                "no converter found for type {}",
                s
            ))),
        }
    }
}

/// A declared virtual attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<TypeTag>,
}

/// Options accepted by `Registry::attribute`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeOptions {
    pub default: Option<Value>,
    pub type_tag: Option<TypeTag>,
}

impl AttributeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn type_tag(mut self, tag: TypeTag) -> Self {
        self.type_tag = Some(tag);
        self
    }

    /// Textual form of `type_tag`; unknown tags have no generator.
    pub fn type_name(self, tag: &str) -> Result<Self, ModelError> {
        Ok(self.type_tag(tag.parse()?))
    }
}

/// Plain accessor visibility, the `attr_accessor` / `attr_reader` split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    ReadOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    One,
    Many,
}

/// A simulated relation: key attribute plus a lazily resolved, cached target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationDef {
    pub name: String,
    /// Foreign key for `One`, pluralized ids attribute for `Many`
    pub foreign_key: String,
    pub target: String,
    pub multiplicity: Multiplicity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssociationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key: Option<String>,
}

impl AssociationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }
}

/// Per-type schema record stored in the registry arena.
/// Lookups that fall through here continue at `parent`.
#[derive(Debug, Clone, Default)]
pub struct ClassDef {
    pub name: String,
    pub parent: Option<ClassId>,

    /// Own declarations in declaration order
    pub attributes: Vec<AttributeDef>,
    pub defaults: HashMap<String, Value>,

    pub readers: HashMap<String, Reader>,
    pub writers: HashMap<String, Writer>,

    pub associations: HashMap<String, AssociationDef>,
    pub validations: Vec<Rule>,

    pub display_names: HashMap<String, String>,
    /// Set once a percentage accessor exists; display names then drop `_percentage`
    pub strips_percentage_suffix: bool,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, parent: Option<ClassId>) -> Self {
        Self {
            name: name.into(),
            parent,
            ..Default::default()
        }
    }
}
