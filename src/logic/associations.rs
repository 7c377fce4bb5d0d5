//! Simulated `belongs_to` / `has_many` relations.
//!
//! There is no database link to the related object. Each association pairs a
//! key attribute (`<name>_id`, or the pluralized ids attribute for has-many)
//! with a per-instance cache of the resolved record(s); the two invalidate
//! each other on write.

use crate::error::{ModelError, Result};
use crate::model::inflect::{camelize, pluralize, singularize};
use crate::model::{
    is_blank, is_truthy, presence, AssociationDef, AssociationOptions, AttributeOptions, ClassId,
    Model, Multiplicity, Reader, Registry, Value, Writer,
};
use crate::store::Record;
use log::{debug, trace};
use std::sync::Arc;

/// Resolved target(s) cached on an instance
#[derive(Debug, Clone)]
pub enum Related {
    One(Arc<dyn Record>),
    Many(Vec<Arc<dyn Record>>),
}

impl Related {
    fn as_json(&self) -> Value {
        match self {
            Related::One(record) => record.as_json(),
            Related::Many(records) => Value::Array(records.iter().map(|r| r.as_json()).collect()),
        }
    }
}

impl Registry {
    /// Declare a one-to-one association resolved through `find_by_id`.
    ///
    /// Defaults: target class `camelize(association)`, foreign key
    /// `<association>_id`.
    pub fn belongs_to(
        &mut self,
        class: ClassId,
        association: &str,
        options: AssociationOptions,
    ) -> Result<()> {
        let target = options
            .class_name
            .unwrap_or_else(|| camelize(association));
        let foreign_key = options
            .foreign_key
            .unwrap_or_else(|| format!("{}_id", association));

        self.ensure_undefined(class, association)?;
        self.attribute(class, &foreign_key, AttributeOptions::new())?;

        self.install_association(
            class,
            AssociationDef {
                name: association.to_string(),
                foreign_key,
                target,
                multiplicity: Multiplicity::One,
            },
        )
    }

    /// Declare a one-to-many association resolved through `find_all`.
    ///
    /// Defaults: target class `camelize(singularize(association))`, foreign
    /// key `<singular>_id`, ids attribute `pluralize(foreign_key)`. Both the
    /// association name and the ids attribute are declared attributes.
    pub fn has_many(
        &mut self,
        class: ClassId,
        association: &str,
        options: AssociationOptions,
    ) -> Result<()> {
        let singular = singularize(association);
        let target = options
            .class_name
            .unwrap_or_else(|| camelize(&singular));
        let foreign_key = options
            .foreign_key
            .unwrap_or_else(|| format!("{}_id", singular));
        let ids_attribute = pluralize(&foreign_key);

        self.ensure_undefined(class, association)?;
        self.ensure_undefined(class, &ids_attribute)?;
        self.attribute(class, association, AttributeOptions::new())?;
        self.attribute(class, &ids_attribute, AttributeOptions::new())?;

        self.install_association(
            class,
            AssociationDef {
                name: association.to_string(),
                foreign_key: ids_attribute,
                target,
                multiplicity: Multiplicity::Many,
            },
        )
    }

    pub fn association(&self, class: ClassId, name: &str) -> Option<&AssociationDef> {
        self.ancestors(class).find_map(|c| c.associations.get(name))
    }

    fn install_association(&mut self, class: ClassId, assoc: AssociationDef) -> Result<()> {
        let name = assoc.name.clone();
        let (key_reader, key_writer) = match assoc.multiplicity {
            Multiplicity::One => (
                Reader::ForeignKey {
                    association: name.clone(),
                },
                Writer::ForeignKey {
                    association: name.clone(),
                },
            ),
            Multiplicity::Many => (
                Reader::AssociationIds {
                    association: name.clone(),
                },
                Writer::AssociationIds {
                    association: name.clone(),
                },
            ),
        };

        let def = self.class_mut(class)?;
        def.readers.insert(assoc.foreign_key.clone(), key_reader);
        def.writers.insert(assoc.foreign_key.clone(), key_writer);
        def.readers.insert(
            name.clone(),
            Reader::Association {
                association: name.clone(),
            },
        );
        def.writers.insert(
            name.clone(),
            Writer::Association {
                association: name.clone(),
            },
        );
        debug!(
            "{:?} association {}#{} -> {} via {}",
            assoc.multiplicity, def.name, name, assoc.target, assoc.foreign_key
        );
        def.associations.insert(name, assoc);
        Ok(())
    }
}

impl Model {
    /// The single related record, resolving it when a key is set and either
    /// nothing is cached yet or `reload` is requested.
    pub fn related(&mut self, name: &str, reload: bool) -> Result<Option<Arc<dyn Record>>> {
        let def = self.association_with(name, Multiplicity::One)?;
        Ok(match self.resolve(&def, reload)? {
            Some(Related::One(record)) => Some(record),
            _ => None,
        })
    }

    /// Cache `record` as the related object and clear the stored foreign key;
    /// the key reader then reports the record's id.
    pub fn set_related(&mut self, name: &str, record: Option<Arc<dyn Record>>) -> Result<()> {
        let def = self.association_with(name, Multiplicity::One)?;
        self.store_related(&def, record.map(Related::One));
        Ok(())
    }

    /// The related collection; `Some(vec![])` when ids are set but none resolve.
    pub fn related_many(
        &mut self,
        name: &str,
        reload: bool,
    ) -> Result<Option<Vec<Arc<dyn Record>>>> {
        let def = self.association_with(name, Multiplicity::Many)?;
        Ok(match self.resolve(&def, reload)? {
            Some(Related::Many(records)) => Some(records),
            _ => None,
        })
    }

    pub fn set_related_many(
        &mut self,
        name: &str,
        records: Option<Vec<Arc<dyn Record>>>,
    ) -> Result<()> {
        let def = self.association_with(name, Multiplicity::Many)?;
        let related = records
            .filter(|records| !records.is_empty())
            .map(Related::Many);
        self.store_related(&def, related);
        Ok(())
    }

    pub(crate) fn association_def(&self, name: &str) -> Result<AssociationDef> {
        self.registry()
            .association(self.class_id(), name)
            .cloned()
            .ok_or_else(|| self.no_such_accessor(name))
    }

    fn association_with(&self, name: &str, multiplicity: Multiplicity) -> Result<AssociationDef> {
        let def = self.association_def(name)?;
        if def.multiplicity != multiplicity {
            return Err(ModelError::InvalidArgument(format!(
                "association {} is {:?}, not {:?}",
                name, def.multiplicity, multiplicity
            )));
        }
        Ok(def)
    }

    /// Stored key, else the id(s) of the cached record(s)
    pub(crate) fn association_key(&self, def: &AssociationDef) -> Value {
        if let Some(stored) = self.read_attribute(&def.foreign_key) {
            if is_truthy(stored) {
                return stored.clone();
            }
        }
        match self.related.get(&def.name) {
            Some(Related::One(record)) => record.id(),
            Some(Related::Many(records)) => Value::Array(records.iter().map(|r| r.id()).collect()),
            None => Value::Null,
        }
    }

    pub(crate) fn write_association_key(&mut self, def: &AssociationDef, value: Value) {
        self.write_attribute(&def.foreign_key, presence(value));
        if self.related.remove(&def.name).is_some() {
            trace!("{}: key changed, dropped cached {}", self.class_name(), def.name);
        }
    }

    /// Dynamic writer on the association name: only clearing is expressible
    /// with a JSON value.
    pub(crate) fn write_association_value(&mut self, name: &str, value: Value) -> Result<()> {
        if !is_blank(&value) {
            return Err(ModelError::InvalidArgument(format!(
                "association {} expects a record, got {}",
                name, value
            )));
        }
        let def = self.association_def(name)?;
        self.store_related(&def, None);
        Ok(())
    }

    pub(crate) fn related_json(&mut self, name: &str) -> Result<Value> {
        let def = self.association_def(name)?;
        Ok(self
            .resolve(&def, false)?
            .map(|related| related.as_json())
            .unwrap_or(Value::Null))
    }

    fn store_related(&mut self, def: &AssociationDef, related: Option<Related>) {
        match related {
            Some(related) => {
                self.related.insert(def.name.clone(), related);
            }
            None => {
                self.related.remove(&def.name);
            }
        }
        self.write_attribute(&def.foreign_key, Value::Null);
    }

    fn resolve(&mut self, def: &AssociationDef, reload: bool) -> Result<Option<Related>> {
        let key = self.association_key(def);
        if !is_truthy(&key) {
            return Ok(None);
        }

        if reload || !self.related.contains_key(&def.name) {
            let lookup = Arc::clone(self.registry().lookup(&def.target)?);
            trace!(
                "{}: resolving {} -> {} with {}",
                self.class_name(),
                def.name,
                def.target,
                key
            );
            let resolved = match def.multiplicity {
                Multiplicity::One => lookup.find_by_id(&key).map(Related::One),
                Multiplicity::Many => {
                    let ids = match key {
                        Value::Array(ids) => ids,
                        single => vec![single],
                    };
                    Some(Related::Many(lookup.find_all(&ids)))
                }
            };
            match resolved {
                Some(related) => {
                    self.related.insert(def.name.clone(), related);
                }
                None => {
                    self.related.remove(&def.name);
                }
            }
        }

        Ok(self.related.get(&def.name).cloned())
    }
}
