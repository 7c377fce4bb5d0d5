use crate::model::{Value, ValueMap};
use crate::store::traits::{Record, RecordLookup};
use log::trace;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Plain record: an id plus arbitrary JSON fields
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord {
    pub id: Value,
    pub fields: ValueMap,
}

impl JsonRecord {
    pub fn new(id: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            fields: ValueMap::new(),
        }
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }
}

impl Record for JsonRecord {
    fn id(&self) -> Value {
        self.id.clone()
    }

    fn as_json(&self) -> Value {
        let mut object = ValueMap::new();
        object.insert("id".to_string(), self.id.clone());
        for (name, value) in &self.fields {
            object.insert(name.clone(), value.clone());
        }
        Value::Object(object)
    }
}

/// In-memory lookup collaborator. Records every id it is asked for so callers
/// can see which keys an association resolved.
#[derive(Debug, Default)]
pub struct MemoryLookup {
    records: RwLock<Vec<Arc<dyn Record>>>,
    queries: Mutex<Vec<Value>>,
}

impl MemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Record>>,
    {
        Self {
            records: RwLock::new(records.into_iter().collect()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, record: Arc<dyn Record>) {
        self.records.write().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Ids requested so far, in request order. The log grows with every
    /// lookup and is meant for tests; long-lived callers clear it with
    /// `clear_queries`.
    pub fn queries(&self) -> Vec<Value> {
        self.queries.lock().clone()
    }

    pub fn clear_queries(&self) {
        self.queries.lock().clear();
    }
}

impl RecordLookup for MemoryLookup {
    fn find_by_id(&self, id: &Value) -> Option<Arc<dyn Record>> {
        trace!("find_by_id {}", id);
        self.queries.lock().push(id.clone());
        self.records
            .read()
            .iter()
            .find(|record| record.id() == *id)
            .cloned()
    }

    fn find_all(&self, ids: &[Value]) -> Vec<Arc<dyn Record>> {
        trace!("find_all {:?}", ids);
        self.queries.lock().extend(ids.iter().cloned());
        self.records
            .read()
            .iter()
            .filter(|record| ids.contains(&record.id()))
            .cloned()
            .collect()
    }
}
