//! Contains the `Field` struct, which describes a single Munin data source.
use crate::data::{
    attribute::{FieldAttribute, FieldOptions},
    Error,
};

/// A single data source within a graph.
///
/// Fields are created through [`Definition::declare_field`][crate::data::Definition::declare_field]
/// and never change afterwards. Two fields are equal when both their names and their
/// full option sets are equal.
///
/// # Example
///
/// ```rust
/// use munin_plugin::data::{Field, FieldAttribute, FieldOptions};
///
/// let field = Field::new("open_files", FieldOptions::new().kind("gauge")).unwrap();
/// assert_eq!(field.option(FieldAttribute::Label), Some("open files"));
/// assert_eq!(
///     field.config(),
///     vec![
///         ("open_files.label".to_string(), "open files".to_string()),
///         ("open_files.type".to_string(), "GAUGE".to_string()),
///     ]
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    name: String,
    options: FieldOptions,
}

impl Field {
    /// Create a new field.
    ///
    /// If `options` has no `label`, one is derived from the name using
    /// [`Field::default_label`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyFieldName`] if `name` is empty.
    pub fn new(name: impl Into<String>, mut options: FieldOptions) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyFieldName);
        }
        if !options.contains(FieldAttribute::Label) {
            options.set(FieldAttribute::Label, Self::default_label(&name));
        }
        Ok(Self { name, options })
    }

    /// The label used when none is given: the name with underscores replaced by spaces.
    pub fn default_label(name: &str) -> String {
        name.replace('_', " ")
    }

    /// The name of this field.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw value of an option, as it was declared.
    pub fn option(&self, attribute: FieldAttribute) -> Option<&str> {
        self.options.get(attribute)
    }

    /// All options of this field, including the defaulted label.
    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    /// The configuration lines for this field as `(key, value)` pairs.
    ///
    /// Keys have the form `<name>.<attribute>` and follow the fixed attribute order.
    /// The `type` attribute is upper-cased; every other value is passed through verbatim.
    pub fn config(&self) -> Vec<(String, String)> {
        self.options
            .iter()
            .map(|(attribute, value)| {
                let value = match attribute {
                    FieldAttribute::Type => value.to_uppercase(),
                    _ => value.to_string(),
                };
                (format!("{}.{}", self.name, attribute), value)
            })
            .collect()
    }
}
