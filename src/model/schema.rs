use crate::error::Result;
use crate::model::{Access, AssociationOptions, AttributeDef, AttributeOptions, Registry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declarative schema document. Classes are applied in order, so a parent
/// must be listed before its subclasses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub classes: Vec<ClassSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
    /// Plain accessors outside the declared attribute list
    #[serde(default)]
    pub accessors: Vec<AccessorSpec>,
    #[serde(default)]
    pub booleans: Vec<String>,
    #[serde(default)]
    pub percentages: Vec<String>,
    #[serde(default)]
    pub belongs_to: Vec<AssociationSpec>,
    #[serde(default)]
    pub has_many: Vec<AssociationSpec>,
    #[serde(default)]
    pub display_names: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessorSpec {
    pub name: String,
    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationSpec {
    pub name: String,
    #[serde(flatten)]
    pub options: AssociationOptions,
}

impl SchemaDef {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Registry {
    /// Build a registry by replaying a schema document through the
    /// declaration API. Fails on the first declaration error.
    pub fn from_schema(schema: &SchemaDef) -> Result<Self> {
        let mut registry = Registry::new();
        for class in &schema.classes {
            registry.apply_class(class)?;
        }
        Ok(registry)
    }

    fn apply_class(&mut self, spec: &ClassSpec) -> Result<()> {
        let parent = match &spec.parent {
            Some(parent) => Some(self.class_id(parent)?),
            None => None,
        };
        let class = self.define_class(&spec.name, parent)?;

        for accessor in &spec.accessors {
            let access = if accessor.read_only {
                Access::ReadOnly
            } else {
                Access::ReadWrite
            };
            self.accessor(class, &accessor.name, access)?;
        }
        for attribute in &spec.attributes {
            let options = AttributeOptions {
                default: attribute.default.clone(),
                type_tag: attribute.type_tag,
            };
            self.attribute(class, &attribute.name, options)?;
        }
        for name in &spec.booleans {
            self.boolean(class, name)?;
        }
        for name in &spec.percentages {
            self.percentage(class, name)?;
        }
        for assoc in &spec.belongs_to {
            self.belongs_to(class, &assoc.name, assoc.options.clone())?;
        }
        for assoc in &spec.has_many {
            self.has_many(class, &assoc.name, assoc.options.clone())?;
        }
        for (attribute, label) in &spec.display_names {
            self.set_display_name(class, attribute, label)?;
        }
        Ok(())
    }
}
