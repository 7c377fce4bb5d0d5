use crate::error::Result;
use crate::model::{Registry, SchemaDef, Value};
use crate::store::{JsonRecord, MemoryLookup, Record};
use serde_json::json;
use std::sync::Arc;

/// Sample order-entry schema used when no schema file is configured
pub const SEED_SCHEMA: &str = r#"{
    "description": "Order entry form",
    "classes": [
        {
            "name": "Document",
            "attributes": [
                { "name": "status", "default": "draft" },
                { "name": "archived", "type": "boolean" }
            ]
        },
        {
            "name": "Order",
            "parent": "Document",
            "attributes": [
                { "name": "reference" },
                { "name": "discount", "type": "percentage" },
                { "name": "vat_rate", "default": 0.25 },
                { "name": "gift_wrap" }
            ],
            "booleans": ["gift_wrap"],
            "percentages": ["vat_rate"],
            "belongs_to": [
                { "name": "customer" },
                { "name": "billing_contact", "class_name": "Customer", "foreign_key": "billing_id" }
            ],
            "has_many": [
                { "name": "line_items" }
            ],
            "display_names": {
                "vat_rate": "VAT"
            }
        }
    ]
}"#;

pub fn seed_schema() -> Result<SchemaDef> {
    SchemaDef::from_json_str(SEED_SCHEMA)
}

/// Register in-memory lookups for the association targets of the seed schema
pub fn register_seed_lookups(registry: &mut Registry) {
    let customers: Vec<Arc<dyn Record>> = vec![
        Arc::new(JsonRecord::new(1).with_field("name", "Ada Lovelace")),
        Arc::new(JsonRecord::new(2).with_field("name", "Charles Babbage")),
    ];
    let line_items: Vec<Arc<dyn Record>> = vec![
        Arc::new(
            JsonRecord::new(10)
                .with_field("sku", "GEAR-01")
                .with_field("quantity", 2),
        ),
        Arc::new(
            JsonRecord::new(11)
                .with_field("sku", "CARD-80")
                .with_field("quantity", 80),
        ),
    ];

    registry.register_lookup("Customer", Arc::new(MemoryLookup::with_records(customers)));
    registry.register_lookup("LineItem", Arc::new(MemoryLookup::with_records(line_items)));
}

/// Form input used when no input file is configured
pub fn sample_input() -> Value {
    json!({
        "reference": "PO-1042",
        "archived": "0",
        "gift_wrap": "yes",
        "discount_percentage": "15",
        "customer_id": 1,
        "billing_id": "",
        "line_item_ids": [10, 11]
    })
}
