use crate::model::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// A related object an association can resolve to
pub trait Record: Debug + Send + Sync {
    /// Identifier stored in the owning model's foreign key
    fn id(&self) -> Value;

    /// Representation used when the association appears in an attribute snapshot
    fn as_json(&self) -> Value {
        serde_json::json!({ "id": self.id() })
    }
}

/// Lookup collaborator for one association target class.
/// A lookup that finds nothing reports absence, never an error.
pub trait RecordLookup: Debug + Send + Sync {
    fn find_by_id(&self, id: &Value) -> Option<Arc<dyn Record>>;

    /// All records whose id is in `ids` (the `where(id: ids)` shape)
    fn find_all(&self, ids: &[Value]) -> Vec<Arc<dyn Record>>;
}
