use crate::error::{ModelError, Result};
use crate::model::{Model, Value};
use log::warn;
use serde::{Deserialize, Serialize};

/// What bulk assignment does with a key that has no writer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    #[default]
    Raise,
    Ignore,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignOptions {
    #[serde(default)]
    pub missing: MissingPolicy,
}

impl AssignOptions {
    pub fn raise() -> Self {
        Self {
            missing: MissingPolicy::Raise,
        }
    }

    pub fn ignore() -> Self {
        Self {
            missing: MissingPolicy::Ignore,
        }
    }
}

/// Options given as a JSON mapping; unknown keys are rejected.
impl TryFrom<&Value> for AssignOptions {
    type Error = ModelError;

    fn try_from(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ModelError::InvalidArgument(
                "options hash required".to_string(),
            ));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| ModelError::InvalidArgument(e.to_string()))
    }
}

impl Model {
    /// Assign every key of `values` through its writer, in input order.
    ///
    /// Fails with `InvalidArgument` unless `values` is a JSON object. Keys
    /// without a writer raise `AttributeNotFound` or are skipped, per
    /// `options.missing`. Writes before a failing key stay applied.
    pub fn assign_attributes(&mut self, values: &Value, options: AssignOptions) -> Result<&mut Self> {
        let values = values
            .as_object()
            .ok_or_else(|| ModelError::InvalidArgument("hash required".to_string()))?;

        for (key, value) in values {
            match self.registry().writer(self.class_id(), key).cloned() {
                Some(writer) => self.invoke_writer(key, &writer, value.clone())?,
                None if options.missing == MissingPolicy::Raise => {
                    return Err(ModelError::AttributeNotFound(key.clone()));
                }
                None => warn!("{}: ignoring unknown attribute {}", self.class_name(), key),
            }
        }
        Ok(self)
    }

    /// `attributes=`: bulk assignment that raises on unknown keys
    pub fn set_attributes(&mut self, values: &Value) -> Result<&mut Self> {
        self.assign_attributes(values, AssignOptions::raise())
    }
}
