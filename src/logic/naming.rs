use crate::error::Result;
use crate::logic::percentage::PERCENTAGE_SUFFIX;
use crate::model::inflect::humanize;
use crate::model::{ClassId, Registry};

impl Registry {
    /// Override the display name of `attribute` for `class` and its subclasses
    pub fn set_display_name(&mut self, class: ClassId, attribute: &str, label: &str) -> Result<()> {
        self.class_mut(class)?
            .display_names
            .insert(attribute.to_string(), label.to_string());
        Ok(())
    }

    /// Display name of `attribute`: nearest override, else its humanized form.
    /// Classes with percentage accessors name `x_percentage` after `x`.
    pub fn human_attribute_name(&self, class: ClassId, attribute: &str) -> String {
        let strips = self.ancestors(class).any(|c| c.strips_percentage_suffix);
        let attribute = match attribute.strip_suffix(PERCENTAGE_SUFFIX) {
            Some(base) if strips => base,
            _ => attribute,
        };

        self.ancestors(class)
            .find_map(|c| c.display_names.get(attribute))
            .cloned()
            .unwrap_or_else(|| humanize(attribute))
    }
}
