use crate::error::Result;
use crate::model::{is_blank, is_numeric, Model, Rule};
use serde::Serialize;

pub const NOT_A_NUMBER: &str = "is not a number";

/// Validation messages keyed by attribute, in the order attributes first failed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Errors {
    messages: Vec<(String, Vec<String>)>,
}

impl Errors {
    pub fn add(&mut self, attribute: &str, message: &str) {
        match self.messages.iter().position(|(name, _)| name == attribute) {
            Some(index) => self.messages[index].1.push(message.to_string()),
            None => self
                .messages
                .push((attribute.to_string(), vec![message.to_string()])),
        }
    }

    /// Messages for `attribute`, empty when it is valid
    pub fn on(&self, attribute: &str) -> &[String] {
        self.messages
            .iter()
            .find(|(name, _)| name == attribute)
            .map(|(_, messages)| messages.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.iter().map(|(_, messages)| messages.len()).sum()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages.iter().flat_map(|(attribute, messages)| {
            messages
                .iter()
                .map(move |message| (attribute.as_str(), message.as_str()))
        })
    }
}

impl Model {
    /// Run every rule of the class chain; errors from a previous run are discarded.
    pub fn valid(&mut self) -> Result<bool> {
        self.errors.clear();

        let rules: Vec<Rule> = self
            .registry()
            .validations(self.class_id())
            .into_iter()
            .cloned()
            .collect();

        for rule in &rules {
            match rule {
                Rule::Numericality {
                    attribute,
                    allow_blank,
                } => {
                    let value = self.get(attribute)?;
                    if *allow_blank && is_blank(&value) {
                        continue;
                    }
                    if !is_numeric(&value) {
                        self.errors.add(attribute, NOT_A_NUMBER);
                    }
                }
            }
        }

        Ok(self.errors.is_empty())
    }

    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// `"<Human attribute name> <message>"` for every error
    pub fn full_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|(attribute, message)| {
                format!(
                    "{} {}",
                    self.registry()
                        .human_attribute_name(self.class_id(), attribute),
                    message
                )
            })
            .collect()
    }
}
