use crate::error::{ModelError, Result};
use crate::logic::{normalize_boolean, Errors, Related};
use crate::model::{is_present, ClassId, Reader, Registry, Value, ValueMap, Writer};
use std::collections::HashMap;
use std::ops::Index;
use std::sync::Arc;

static NULL: Value = Value::Null;

/// An instance of a registry class: raw attribute storage plus the caches
/// the derived accessors keep (snapshot, resolved associations, percentages).
#[derive(Debug, Clone)]
pub struct Model {
    registry: Arc<Registry>,
    class: ClassId,
    values: HashMap<String, Value>,
    /// `None` means the snapshot must be recomputed
    snapshot: Option<ValueMap>,
    pub(crate) related: HashMap<String, Related>,
    /// Keyed by the underlying attribute name
    pub(crate) percentages: HashMap<String, Value>,
    pub(crate) errors: Errors,
}

impl Model {
    pub fn new(registry: Arc<Registry>, class: ClassId) -> Result<Self> {
        registry.class(class)?;
        Ok(Self {
            registry,
            class,
            values: HashMap::new(),
            snapshot: None,
            related: HashMap::new(),
            percentages: HashMap::new(),
            errors: Errors::default(),
        })
    }

    /// Construct, bulk-assign `values` (raising on unknown keys) when present,
    /// then hand the instance to `init`.
    pub fn build<F>(registry: Arc<Registry>, class: ClassId, values: &Value, init: F) -> Result<Self>
    where
        F: FnOnce(&mut Model),
    {
        let mut model = Self::new(registry, class)?;
        if is_present(values) {
            model.set_attributes(values)?;
        }
        init(&mut model);
        Ok(model)
    }

    pub fn with_attributes(registry: Arc<Registry>, class: ClassId, values: &Value) -> Result<Self> {
        Self::build(registry, class, values, |_| {})
    }

    pub fn class_id(&self) -> ClassId {
        self.class
    }

    pub fn class_name(&self) -> &str {
        self.registry.class_name(self.class)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Raw stored value; defaults are not applied.
    pub fn read_attribute(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Raw store. Drops the snapshot and any percentage shadowing `name`;
    /// association caches are left alone.
    pub fn write_attribute(&mut self, name: &str, value: Value) {
        self.snapshot = None;
        self.percentages.remove(name);
        self.values.insert(name.to_string(), value);
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.registry.reader(self.class, name).is_some()
    }

    pub fn responds_to_writer(&self, name: &str) -> bool {
        self.registry.writer(self.class, name).is_some()
    }

    /// Read a member through its registered reader
    pub fn get(&mut self, name: &str) -> Result<Value> {
        let reader = self
            .registry
            .reader(self.class, name)
            .cloned()
            .ok_or_else(|| self.no_such_accessor(name))?;
        self.invoke_reader(name, &reader)
    }

    /// Write a member through its registered writer
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let writer = self
            .registry
            .writer(self.class, name)
            .cloned()
            .ok_or_else(|| self.no_such_accessor(&format!("{}=", name)))?;
        self.invoke_writer(name, &writer, value.into())
    }

    /// Current value of every declared attribute, recomputed after writes
    pub fn attributes(&mut self) -> Result<&ValueMap> {
        let snapshot = match self.snapshot.take() {
            Some(snapshot) => snapshot,
            None => self.compute_snapshot()?,
        };
        Ok(self.snapshot.insert(snapshot))
    }

    pub fn as_json(&mut self) -> Result<Value> {
        Ok(Value::Object(self.attributes()?.clone()))
    }

    pub fn to_json(&mut self) -> Result<String> {
        Ok(serde_json::to_string(self.attributes()?)?)
    }

    fn compute_snapshot(&mut self) -> Result<ValueMap> {
        let mut snapshot = ValueMap::new();
        for name in self.registry.attribute_names(self.class) {
            if name == "attributes" {
                continue;
            }
            let value = self.get(&name)?;
            snapshot.insert(name, value);
        }
        Ok(snapshot)
    }

    fn read_with_default(&self, name: &str) -> Value {
        match self.values.get(name) {
            Some(value) if !value.is_null() => value.clone(),
            _ => self
                .registry
                .default_for(self.class, name)
                .cloned()
                .unwrap_or(Value::Null),
        }
    }

    pub(crate) fn invoke_reader(&mut self, name: &str, reader: &Reader) -> Result<Value> {
        match reader {
            Reader::Attribute => Ok(self.read_with_default(name)),
            Reader::Alias { target } => self.get(target),
            Reader::ForeignKey { association } | Reader::AssociationIds { association } => {
                let def = self.association_def(association)?;
                Ok(self.association_key(&def))
            }
            Reader::Association { association } => self.related_json(association),
            Reader::Percentage { attribute } => self.percentage_value(attribute),
            Reader::Multiplier {
                attribute,
                increase,
            } => self.multiplier(attribute, *increase),
        }
    }

    pub(crate) fn invoke_writer(&mut self, name: &str, writer: &Writer, value: Value) -> Result<()> {
        match writer {
            Writer::Attribute => {
                self.write_attribute(name, value);
                Ok(())
            }
            Writer::Boolean { inner } => {
                self.invoke_writer(name, inner, Value::Bool(normalize_boolean(&value)))
            }
            Writer::ForeignKey { association } | Writer::AssociationIds { association } => {
                let def = self.association_def(association)?;
                self.write_association_key(&def, value);
                Ok(())
            }
            Writer::Association { association } => {
                self.write_association_value(association, value)
            }
            Writer::Percentage { attribute } => self.write_percentage(attribute, value),
        }
    }

    pub(crate) fn no_such_accessor(&self, name: &str) -> ModelError {
        ModelError::NoSuchAccessor {
            name: name.to_string(),
            class: self.class_name().to_string(),
        }
    }
}

impl Index<&str> for Model {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AttributeOptions;
    use serde_json::json;

    fn registry() -> (Arc<Registry>, ClassId) {
        let mut registry = Registry::new();
        let class = registry.define_class("TestModel", None).unwrap();
        registry
            .attribute(class, "status", AttributeOptions::new())
            .unwrap();
        (Arc::new(registry), class)
    }

    #[test]
    fn test_write_invalidates_snapshot() {
        let (registry, class) = registry();
        let mut model = Model::new(registry, class).unwrap();

        model.set("status", "one").unwrap();
        assert_eq!(model.attributes().unwrap()["status"], json!("one"));

        model.set("status", "two").unwrap();
        assert_eq!(model.attributes().unwrap()["status"], json!("two"));
    }

    #[test]
    fn test_raw_read_ignores_declaration() {
        let (registry, class) = registry();
        let mut model = Model::new(registry, class).unwrap();
        assert_eq!(model.read_attribute("status"), None);
        assert_eq!(model["some_attribute"], Value::Null);

        model.write_attribute("status", json!("draft"));
        assert_eq!(model["status"], json!("draft"));
        assert_eq!(model.read_attribute("status"), Some(&json!("draft")));
    }

    #[test]
    fn test_unknown_member_is_no_such_accessor() {
        let (registry, class) = registry();
        let mut model = Model::new(registry, class).unwrap();
        assert!(matches!(
            model.get("some_attribute"),
            Err(ModelError::NoSuchAccessor { .. })
        ));
        assert!(matches!(
            model.set("some_attribute", "test"),
            Err(ModelError::NoSuchAccessor { name, .. }) if name == "some_attribute="
        ));
    }

    #[test]
    fn test_invalid_class_id_rejected() {
        let (registry, _) = registry();
        assert!(matches!(
            Model::new(registry, ClassId(42)),
            Err(ModelError::UnknownClass(_))
        ));
    }

    #[test]
    fn test_build_runs_init_after_assignment() {
        let (registry, class) = registry();
        let model = Model::build(registry, class, &json!({"status": "open"}), |m| {
            assert_eq!(m["status"], json!("open"));
            m.write_attribute("status", json!("seen"));
        })
        .unwrap();
        assert_eq!(model["status"], json!("seen"));
    }
}
