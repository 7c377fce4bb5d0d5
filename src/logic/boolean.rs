use crate::error::{ModelError, Result};
use crate::model::{is_blank, ClassId, Reader, Registry, Value, Writer};
use log::debug;

/// Form-style boolean coercion.
///
/// Blank values, `"0"`, numeric zero and the strings `"off"`, `"no"` and
/// `"false"` are false; everything else is true. String matching is
/// case-sensitive.
pub fn normalize_boolean(value: &Value) -> bool {
    if is_blank(value) {
        return false;
    }
    match value {
        Value::String(s) => !matches!(s.as_str(), "0" | "off" | "no" | "false"),
        Value::Number(n) => n.as_f64() != Some(0.0),
        _ => true,
    }
}

impl Registry {
    /// Wrap the existing writer of `attribute` so assigned values are
    /// normalized to true/false, and add an `attribute?` predicate reader.
    pub fn boolean(&mut self, class: ClassId, attribute: &str) -> Result<()> {
        let inner = self.writer(class, attribute).cloned().ok_or_else(|| {
            ModelError::InvalidArgument(format!(
                "cannot add boolean attribute {} - no existing attribute exists",
                attribute
            ))
        })?;

        let def = self.class_mut(class)?;
        def.writers.insert(
            attribute.to_string(),
            Writer::Boolean {
                inner: Box::new(inner),
            },
        );
        def.readers.insert(
            format!("{}?", attribute),
            Reader::Alias {
                target: attribute.to_string(),
            },
        );
        debug!("boolean accessor {}#{}", def.name, attribute);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_false_values() {
        for value in [
            json!(false),
            json!(null),
            json!(""),
            json!("0"),
            json!(0),
            json!(0.0),
            json!("off"),
            json!("no"),
            json!("false"),
            json!([]),
        ] {
            assert!(!normalize_boolean(&value), "{} should be false", value);
        }
    }

    #[test]
    fn test_true_values() {
        for value in [
            json!(true),
            json!("1"),
            json!(1),
            json!("true"),
            json!("on"),
            json!("yes"),
            json!("anything-else"),
            json!("False"),
            json!("OFF"),
            json!(-1),
        ] {
            assert!(normalize_boolean(&value), "{} should be true", value);
        }
    }
}
