use crate::error::{ModelError, Result};
use crate::model::{
    is_blank, is_present, number, to_f, ClassId, Model, Reader, Registry, Rule, Value, Writer,
};
use log::debug;

pub const PERCENTAGE_SUFFIX: &str = "_percentage";

impl Registry {
    /// Add `<attribute>_percentage` (value × 100) plus the multiplier helpers.
    ///
    /// The attribute must already be readable. The percentage writer and its
    /// numericality rule are only added when the attribute is also writable.
    pub fn percentage(&mut self, class: ClassId, attribute: &str) -> Result<()> {
        if self.reader(class, attribute).is_none() {
            return Err(ModelError::InvalidArgument(format!(
                "cannot add percentage attribute {} - no existing attribute exists",
                attribute
            )));
        }
        let writable = self.writer(class, attribute).is_some();

        let multiplier = format!("{}_multiplier", attribute);
        let percentage = format!("{}{}", attribute, PERCENTAGE_SUFFIX);

        let def = self.class_mut(class)?;
        def.readers.insert(
            multiplier.clone(),
            Reader::Multiplier {
                attribute: attribute.to_string(),
                increase: false,
            },
        );
        def.readers.insert(
            format!("{}_increase_multiplier", attribute),
            Reader::Multiplier {
                attribute: attribute.to_string(),
                increase: true,
            },
        );
        def.readers.insert(
            format!("{}_decrease_multiplier", attribute),
            Reader::Alias { target: multiplier },
        );
        def.readers.insert(
            percentage.clone(),
            Reader::Percentage {
                attribute: attribute.to_string(),
            },
        );
        def.strips_percentage_suffix = true;

        if writable {
            def.writers.insert(
                percentage.clone(),
                Writer::Percentage {
                    attribute: attribute.to_string(),
                },
            );
            def.validations.push(Rule::Numericality {
                attribute: percentage,
                allow_blank: true,
            });
        }

        debug!(
            "percentage accessor {}#{} (writable: {})",
            def.name, attribute, writable
        );
        Ok(())
    }
}

impl Model {
    pub(crate) fn percentage_value(&mut self, attribute: &str) -> Result<Value> {
        if let Some(cached) = self.percentages.get(attribute) {
            return Ok(cached.clone());
        }

        let value = self.get(attribute)?;
        if is_blank(&value) {
            return Ok(Value::Null);
        }
        let scaled = number(to_f(&value) * 100.0);
        // out-of-range products are not cached
        if !scaled.is_null() {
            self.percentages.insert(attribute.to_string(), scaled.clone());
        }
        Ok(scaled)
    }

    pub(crate) fn multiplier(&mut self, attribute: &str, increase: bool) -> Result<Value> {
        let base = to_f(&self.get(attribute)?);
        Ok(number(if increase { 1.0 + base } else { 1.0 - base }))
    }

    // The underlying write drops the cache, so the raw input is cached after it.
    pub(crate) fn write_percentage(&mut self, attribute: &str, value: Value) -> Result<()> {
        if is_present(&value) {
            self.set(attribute, number(to_f(&value) / 100.0))?;
            self.percentages.insert(attribute.to_string(), value);
        } else {
            self.set(attribute, Value::Null)?;
            self.percentages.remove(attribute);
        }
        Ok(())
    }
}
