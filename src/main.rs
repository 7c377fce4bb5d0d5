use modelx_rust::config::AppConfig;
use modelx_rust::seed;
use modelx_rust::{AssignOptions, Model, Registry, SchemaDef, Value};
use std::fs;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .init();

    println!("modelx: virtual attribute models");

    let schema = match &config.schema.path {
        Some(path) => {
            println!("Loading schema from {}", path);
            SchemaDef::from_json_str(&fs::read_to_string(path)?)?
        }
        None => seed::seed_schema()?,
    };
    let mut registry = Registry::from_schema(&schema)?;
    seed::register_seed_lookups(&mut registry);
    let registry = Arc::new(registry);

    let input: Value = match &config.input.path {
        Some(path) => {
            println!("Reading attributes from {}", path);
            serde_json::from_str(&fs::read_to_string(path)?)?
        }
        None => seed::sample_input(),
    };

    let class = registry.class_id(&config.input.class)?;
    let mut model = Model::new(Arc::clone(&registry), class)?;
    model.assign_attributes(
        &input,
        AssignOptions {
            missing: config.assign.missing,
        },
    )?;

    let valid = model.valid()?;
    println!("{}", serde_json::to_string_pretty(&model.as_json()?)?);

    if valid {
        println!("{} is valid", model.class_name());
    } else {
        println!("{} is invalid:", model.class_name());
        for message in model.full_messages() {
            println!("  - {}", message);
        }
    }

    Ok(())
}
