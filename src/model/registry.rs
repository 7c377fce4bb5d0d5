use crate::error::{ModelError, Result};
use crate::model::{
    Access, AttributeDef, AttributeOptions, ClassDef, ClassId, Model, Reader, Rule, TypeTag,
    Value, Writer,
};
use crate::store::RecordLookup;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;

/// Instance members every model has; attributes cannot shadow them.
pub const RESERVED_MEMBERS: &[&str] = &["attributes", "errors", "valid", "as_json", "to_json"];

/// Arena of class schema records plus the lookup collaborators for
/// association targets.
///
/// Declarations go through `&mut Registry` at definition time; once the
/// registry is shared behind an `Arc` it is read-only and instances created
/// from it see a fixed schema.
#[derive(Debug, Default)]
pub struct Registry {
    classes: Vec<ClassDef>,
    by_name: HashMap<String, ClassId>,
    lookups: HashMap<String, Arc<dyn RecordLookup>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a class record, optionally inheriting from `parent`
    pub fn define_class(&mut self, name: &str, parent: Option<ClassId>) -> Result<ClassId> {
        if self.by_name.contains_key(name) {
            return Err(ModelError::InvalidArgument(format!(
                "class {} is already defined",
                name
            )));
        }
        if let Some(parent) = parent {
            self.class(parent)?;
        }

        let id = ClassId(self.classes.len());
        self.classes.push(ClassDef::new(name, parent));
        self.by_name.insert(name.to_string(), id);
        debug!("defined class {} ({:?}, parent {:?})", name, id, parent);
        Ok(id)
    }

    pub fn class_id(&self, name: &str) -> Result<ClassId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| ModelError::UnknownClass(name.to_string()))
    }

    pub fn class(&self, id: ClassId) -> Result<&ClassDef> {
        self.classes
            .get(id.index())
            .ok_or_else(|| ModelError::UnknownClass(format!("#{}", id.index())))
    }

    pub(crate) fn class_mut(&mut self, id: ClassId) -> Result<&mut ClassDef> {
        self.classes
            .get_mut(id.index())
            .ok_or_else(|| ModelError::UnknownClass(format!("#{}", id.index())))
    }

    pub fn class_name(&self, id: ClassId) -> &str {
        self.classes
            .get(id.index())
            .map(|c| c.name.as_str())
            .unwrap_or("<unknown>")
    }

    /// The class itself followed by its parent chain
    pub fn ancestors(&self, id: ClassId) -> impl Iterator<Item = &ClassDef> + '_ {
        std::iter::successors(self.classes.get(id.index()), move |class| {
            class.parent.and_then(|p| self.classes.get(p.index()))
        })
    }

    /// Declare a virtual attribute with a default-aware reader and a storage writer.
    pub fn attribute(
        &mut self,
        class: ClassId,
        name: &str,
        options: AttributeOptions,
    ) -> Result<()> {
        self.ensure_undefined(class, name)?;

        let def = self.class_mut(class)?;
        def.attributes.push(AttributeDef {
            name: name.to_string(),
            default: options.default.clone(),
            type_tag: options.type_tag,
        });
        if let Some(default) = options.default {
            def.defaults.insert(name.to_string(), default);
        }
        def.readers.insert(name.to_string(), Reader::Attribute);
        def.writers.insert(name.to_string(), Writer::Attribute);
        debug!("declared attribute {}#{}", def.name, name);

        match options.type_tag {
            Some(TypeTag::Boolean) => self.boolean(class, name),
            Some(TypeTag::Percentage) => self.percentage(class, name),
            None => Ok(()),
        }
    }

    /// Plain storage accessor that is not part of the declared attribute list.
    pub fn accessor(&mut self, class: ClassId, name: &str, access: Access) -> Result<()> {
        let def = self.class_mut(class)?;
        def.readers.insert(name.to_string(), Reader::Attribute);
        if access == Access::ReadWrite {
            def.writers.insert(name.to_string(), Writer::Attribute);
        }
        Ok(())
    }

    pub(crate) fn ensure_undefined(&self, class: ClassId, name: &str) -> Result<()> {
        let class_def = self.class(class)?;
        if RESERVED_MEMBERS.contains(&name) || self.reader(class, name).is_some() {
            return Err(ModelError::AttributeAlreadyDefined {
                attribute: name.to_string(),
                class: class_def.name.clone(),
            });
        }
        Ok(())
    }

    pub fn reader(&self, class: ClassId, name: &str) -> Option<&Reader> {
        self.ancestors(class).find_map(|c| c.readers.get(name))
    }

    pub fn writer(&self, class: ClassId, name: &str) -> Option<&Writer> {
        self.ancestors(class).find_map(|c| c.writers.get(name))
    }

    /// Names declared on `class` itself, in declaration order
    pub fn declared_names(&self, class: ClassId) -> Vec<&str> {
        self.classes
            .get(class.index())
            .map(|c| c.attributes.iter().map(|a| a.name.as_str()).collect())
            .unwrap_or_default()
    }

    /// Declared names across the hierarchy, root class first
    pub fn attribute_names(&self, class: ClassId) -> Vec<String> {
        let mut chain: Vec<&ClassDef> = self.ancestors(class).collect();
        chain.reverse();

        let mut names: Vec<String> = Vec::new();
        for attribute in chain.iter().flat_map(|c| c.attributes.iter()) {
            if !names.contains(&attribute.name) {
                names.push(attribute.name.clone());
            }
        }
        names
    }

    /// Nearest declared default, walking from `class` up the parent chain
    pub fn default_for(&self, class: ClassId, name: &str) -> Option<&Value> {
        self.ancestors(class).find_map(|c| c.defaults.get(name))
    }

    pub fn validations(&self, class: ClassId) -> Vec<&Rule> {
        let mut chain: Vec<&ClassDef> = self.ancestors(class).collect();
        chain.reverse();
        chain.iter().flat_map(|c| c.validations.iter()).collect()
    }

    /// Register the lookup collaborator resolving association targets of `class_name`
    pub fn register_lookup(&mut self, class_name: &str, lookup: Arc<dyn RecordLookup>) {
        debug!("registered lookup for {}", class_name);
        self.lookups.insert(class_name.to_string(), lookup);
    }

    pub fn lookup(&self, class_name: &str) -> Result<&Arc<dyn RecordLookup>> {
        self.lookups
            .get(class_name)
            .ok_or_else(|| ModelError::UnknownClass(class_name.to_string()))
    }

    /// Build an instance of `class_name` and bulk-assign `values`
    pub fn instantiate(self: &Arc<Self>, class_name: &str, values: &Value) -> Result<Model> {
        let class = self.class_id(class_name)?;
        Model::with_attributes(Arc::clone(self), class, values)
    }
}
