use modelx_rust::{
    AssociationOptions, ClassId, JsonRecord, MemoryLookup, Model, ModelError, Record, Registry,
    Value,
};
use serde_json::json;
use std::sync::Arc;

struct Fixture {
    registry: Registry,
    class: ClassId,
    records: Vec<Arc<dyn Record>>,
    lookup: Arc<MemoryLookup>,
}

impl Fixture {
    fn model(self) -> (Model, Vec<Arc<dyn Record>>, Arc<MemoryLookup>) {
        let model = Model::new(Arc::new(self.registry), self.class).unwrap();
        (model, self.records, self.lookup)
    }
}

fn fixture() -> Fixture {
    let records: Vec<Arc<dyn Record>> = vec![
        Arc::new(JsonRecord::new(0)),
        Arc::new(JsonRecord::new(1).with_field("name", "one")),
    ];
    let lookup = Arc::new(MemoryLookup::with_records(records.clone()));

    let mut registry = Registry::new();
    let class = registry.define_class("TestModel", None).unwrap();
    registry
        .belongs_to(class, "model_x_test_record", AssociationOptions::new())
        .unwrap();
    registry.register_lookup("ModelXTestRecord", lookup.clone());

    Fixture {
        registry,
        class,
        records,
        lookup,
    }
}

fn same(found: Option<Arc<dyn Record>>, expected: &Arc<dyn Record>) -> bool {
    found.map_or(false, |found| Arc::ptr_eq(&found, expected))
}

#[test]
fn test_non_existent_association() {
    let (mut model, _, _) = fixture().model();
    assert!(matches!(
        model.get("something"),
        Err(ModelError::NoSuchAccessor { .. })
    ));
    assert!(matches!(
        model.get("something_id"),
        Err(ModelError::NoSuchAccessor { .. })
    ));
    assert!(matches!(
        model.related("something", false),
        Err(ModelError::NoSuchAccessor { .. })
    ));
}

#[test]
fn test_existent_association() {
    let (mut model, _, _) = fixture().model();
    assert_eq!(model.get("model_x_test_record").unwrap(), Value::Null);
    assert_eq!(model.get("model_x_test_record_id").unwrap(), Value::Null);
    assert!(model.related("model_x_test_record", false).unwrap().is_none());
}

#[test]
fn test_foreign_key() {
    let (mut model, records, _) = fixture().model();

    model.set("model_x_test_record_id", Value::Null).unwrap();
    assert_eq!(model.get("model_x_test_record_id").unwrap(), Value::Null);

    model.set("model_x_test_record_id", 2).unwrap();
    assert_eq!(model.get("model_x_test_record_id").unwrap(), json!(2));

    model.set("model_x_test_record_id", 1).unwrap();
    assert_eq!(model.get("model_x_test_record_id").unwrap(), json!(1));

    model
        .set_related("model_x_test_record", Some(Arc::clone(&records[0])))
        .unwrap();
    assert_eq!(model.get("model_x_test_record_id").unwrap(), json!(0));
}

#[test]
fn test_blank_foreign_key_is_null() {
    let (mut model, _, _) = fixture().model();
    model.set("model_x_test_record_id", "").unwrap();
    assert_eq!(model["model_x_test_record_id"], Value::Null);
}

#[test]
fn test_association_without_id() {
    let (mut model, _, lookup) = fixture().model();
    assert!(model.related("model_x_test_record", false).unwrap().is_none());
    assert!(lookup.queries().is_empty());
}

#[test]
fn test_association_with_nonexisting_id() {
    let (mut model, _, _) = fixture().model();
    model.set("model_x_test_record_id", 2).unwrap();
    assert!(model.related("model_x_test_record", false).unwrap().is_none());
}

#[test]
fn test_association_with_existing_id() {
    let (mut model, records, lookup) = fixture().model();
    model.set("model_x_test_record_id", 1).unwrap();

    let found = model.related("model_x_test_record", false).unwrap();
    assert!(same(found, &records[1]));
    assert_eq!(
        model.get("model_x_test_record").unwrap(),
        json!({"id": 1, "name": "one"})
    );
    // the second read is served from the cache
    assert_eq!(lookup.queries(), vec![json!(1)]);
}

#[test]
fn test_association_with_existing_object() {
    let (mut model, records, lookup) = fixture().model();
    model
        .set_related("model_x_test_record", Some(Arc::clone(&records[1])))
        .unwrap();

    let found = model.related("model_x_test_record", false).unwrap();
    assert!(same(found, &records[1]));
    assert!(lookup.queries().is_empty());
}

#[test]
fn test_blank_value_clears_association() {
    let (mut model, records, _) = fixture().model();
    model
        .set_related("model_x_test_record", Some(Arc::clone(&records[1])))
        .unwrap();

    model.set("model_x_test_record", "").unwrap();
    assert!(model.related("model_x_test_record", false).unwrap().is_none());
    assert_eq!(model.get("model_x_test_record_id").unwrap(), Value::Null);

    assert!(matches!(
        model.set("model_x_test_record", 1),
        Err(ModelError::InvalidArgument(_))
    ));
}

#[test]
fn test_id_change_invalidates_cached_record() {
    let (mut model, records, _) = fixture().model();
    model
        .set_related("model_x_test_record", Some(Arc::clone(&records[1])))
        .unwrap();
    model.set("model_x_test_record_id", 0).unwrap();

    let found = model.related("model_x_test_record", false).unwrap();
    assert!(same(found, &records[0]));
}

#[test]
fn test_reload() {
    let (mut model, records, _) = fixture().model();
    model
        .set_related("model_x_test_record", Some(Arc::clone(&records[1])))
        .unwrap();
    // raw write bypasses invalidation
    model.write_attribute("model_x_test_record_id", json!(0));

    let cached = model.related("model_x_test_record", false).unwrap();
    assert!(same(cached, &records[1]));
    let reloaded = model.related("model_x_test_record", true).unwrap();
    assert!(same(reloaded, &records[0]));
}

#[test]
fn test_other_foreign_key() {
    let mut fixture = fixture();
    let other = Arc::new(MemoryLookup::with_records(vec![
        Arc::new(JsonRecord::new(1)) as Arc<dyn Record>
    ]));
    fixture
        .registry
        .belongs_to(
            fixture.class,
            "model_x_test_record2",
            AssociationOptions::new().foreign_key("related_object_id"),
        )
        .unwrap();
    fixture
        .registry
        .register_lookup("ModelXTestRecord2", other.clone());
    let (mut model, _, _) = fixture.model();

    assert!(model.responds_to("model_x_test_record2"));
    assert!(model.responds_to_writer("model_x_test_record2"));
    assert!(!model.responds_to("model_x_test_record2_id"));
    assert!(!model.responds_to_writer("model_x_test_record2_id"));
    assert!(model.responds_to("related_object_id"));
    assert!(model.responds_to_writer("related_object_id"));

    model.set("related_object_id", 1).unwrap();
    model.related("model_x_test_record2", false).unwrap();
    assert_eq!(other.queries(), vec![json!(1)]);

    let related: Arc<dyn Record> = Arc::new(JsonRecord::new(5));
    model
        .set_related("model_x_test_record2", Some(related))
        .unwrap();
    assert_eq!(model.get("related_object_id").unwrap(), json!(5));
}

#[test]
fn test_other_class_name() {
    let mut fixture = fixture();
    fixture
        .registry
        .belongs_to(
            fixture.class,
            "again_model_x_test_record",
            AssociationOptions::new().class_name("ModelXTestRecord"),
        )
        .unwrap();
    let (mut model, records, lookup) = fixture.model();

    model.set("again_model_x_test_record_id", 1).unwrap();
    let found = model.related("again_model_x_test_record", false).unwrap();
    assert!(same(found, &records[1]));
    assert_eq!(lookup.queries(), vec![json!(1)]);
}

#[test]
fn test_association_name_must_be_free() {
    let mut fixture = fixture();
    let err = fixture
        .registry
        .belongs_to(fixture.class, "model_x_test_record", AssociationOptions::new())
        .unwrap_err();
    assert!(matches!(err, ModelError::AttributeAlreadyDefined { .. }));
}

#[test]
fn test_missing_lookup() {
    let mut registry = Registry::new();
    let class = registry.define_class("Order", None).unwrap();
    registry
        .belongs_to(class, "customer", AssociationOptions::new())
        .unwrap();
    let mut model = Model::new(Arc::new(registry), class).unwrap();

    assert!(model.related("customer", false).unwrap().is_none());
    model.set("customer_id", 1).unwrap();
    assert!(matches!(
        model.related("customer", false),
        Err(ModelError::UnknownClass(ref name)) if name == "Customer"
    ));
}

fn has_many_model() -> (Model, Vec<Arc<dyn Record>>, Arc<MemoryLookup>) {
    let records: Vec<Arc<dyn Record>> = vec![
        Arc::new(JsonRecord::new(10).with_field("sku", "A")),
        Arc::new(JsonRecord::new(11).with_field("sku", "B")),
        Arc::new(JsonRecord::new(12).with_field("sku", "C")),
    ];
    let lookup = Arc::new(MemoryLookup::with_records(records.clone()));

    let mut registry = Registry::new();
    let class = registry.define_class("Order", None).unwrap();
    registry
        .has_many(class, "line_items", AssociationOptions::new())
        .unwrap();
    registry.register_lookup("LineItem", lookup.clone());

    let model = Model::new(Arc::new(registry), class).unwrap();
    (model, records, lookup)
}

#[test]
fn test_has_many_defaults() {
    let (model, _, _) = has_many_model();
    let registry = model.registry();
    let def = registry.association(model.class_id(), "line_items").unwrap();
    assert_eq!(def.target, "LineItem");
    assert_eq!(def.foreign_key, "line_item_ids");
    assert_eq!(
        registry.declared_names(model.class_id()),
        vec!["line_items", "line_item_ids"]
    );
}

#[test]
fn test_has_many_defaults_for_es_plurals() {
    let mut registry = Registry::new();
    let class = registry.define_class("Order", None).unwrap();
    registry
        .has_many(class, "statuses", AssociationOptions::new())
        .unwrap();
    registry
        .has_many(class, "quizzes", AssociationOptions::new())
        .unwrap();

    let statuses = registry.association(class, "statuses").unwrap();
    assert_eq!(statuses.target, "Status");
    assert_eq!(statuses.foreign_key, "status_ids");
    let quizzes = registry.association(class, "quizzes").unwrap();
    assert_eq!(quizzes.target, "Quiz");
    assert_eq!(quizzes.foreign_key, "quiz_ids");
    assert!(registry.writer(class, "status_ids").is_some());
}

#[test]
fn test_has_many_resolves_ids() {
    let (mut model, _, lookup) = has_many_model();
    assert!(model.related_many("line_items", false).unwrap().is_none());

    model.set("line_item_ids", json!([12, 10])).unwrap();
    let items = model.related_many("line_items", false).unwrap().unwrap();
    let ids: Vec<Value> = items.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![json!(10), json!(12)]);
    assert_eq!(lookup.queries(), vec![json!(12), json!(10)]);

    assert_eq!(
        model.get("line_items").unwrap(),
        json!([{"id": 10, "sku": "A"}, {"id": 12, "sku": "C"}])
    );
}

#[test]
fn test_has_many_unresolved_ids_give_empty_collection() {
    let (mut model, _, _) = has_many_model();
    model.set("line_item_ids", json!([99])).unwrap();
    assert_eq!(
        model.related_many("line_items", false).unwrap().map(|items| items.len()),
        Some(0)
    );
}

#[test]
fn test_has_many_ids_from_cached_collection() {
    let (mut model, records, _) = has_many_model();
    model
        .set_related_many("line_items", Some(records[..2].to_vec()))
        .unwrap();
    assert_eq!(model.get("line_item_ids").unwrap(), json!([10, 11]));

    model.set("line_item_ids", json!([12])).unwrap();
    let items = model.related_many("line_items", false).unwrap().unwrap();
    assert_eq!(items.len(), 1);
    assert!(Arc::ptr_eq(&items[0], &records[2]));

    model.set_related_many("line_items", Some(Vec::new())).unwrap();
    assert_eq!(model.get("line_item_ids").unwrap(), Value::Null);
    assert!(model.related_many("line_items", false).unwrap().is_none());
}

#[test]
fn test_has_many_reload() {
    let (mut model, records, _) = has_many_model();
    model
        .set_related_many("line_items", Some(vec![Arc::clone(&records[0])]))
        .unwrap();
    model.write_attribute("line_item_ids", json!([11]));

    let cached = model.related_many("line_items", false).unwrap().unwrap();
    assert!(Arc::ptr_eq(&cached[0], &records[0]));
    let reloaded = model.related_many("line_items", true).unwrap().unwrap();
    assert!(Arc::ptr_eq(&reloaded[0], &records[1]));
}

#[test]
fn test_multiplicity_mismatch() {
    let (mut model, _, _) = has_many_model();
    assert!(matches!(
        model.related("line_items", false),
        Err(ModelError::InvalidArgument(_))
    ));

    let (mut model, _, _) = fixture().model();
    assert!(matches!(
        model.related_many("model_x_test_record", false),
        Err(ModelError::InvalidArgument(_))
    ));
}

#[test]
fn test_snapshot_includes_foreign_key() {
    let (mut model, _, _) = fixture().model();
    model.set("model_x_test_record_id", 1).unwrap();
    assert_eq!(
        model.as_json().unwrap(),
        json!({"model_x_test_record_id": 1})
    );
}
