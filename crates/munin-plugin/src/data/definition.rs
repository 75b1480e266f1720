//! Plugin definitions: the graph attributes and fields declared for a plugin type.
use std::fmt;

use crate::data::{
    attribute::{Attribute, FieldAttribute, GraphAttribute, GraphOptions, Options},
    field::Field,
    Error, FieldOptions,
};

/// The `graph_args` value used unless a definition overrides it.
pub const DEFAULT_GRAPH_ARGS: &str = "--base 1000";

/// The metadata describing one type of plugin: its graph attributes and its fields.
///
/// A definition is built once, by the plugin's
/// [`MuninPlugin::definition`][crate::backend::MuninPlugin::definition] function, and each
/// [`Plugin`][crate::backend::Plugin] instance takes its own copy of it.
/// Field order is significant: fields are rendered in the order they were declared.
///
/// # Example
///
/// ```rust
/// use munin_plugin::data::{Definition, FieldOptions, GraphOptions};
///
/// let mut definition =
///     Definition::with_graph("Sessions", GraphOptions::new().category("Application"));
/// definition.declare_field("count", FieldOptions::new().min(0))?;
///
/// // Share options between several fields.
/// let mut scope = definition.with_options(FieldOptions::new().draw("STACK"));
/// scope.declare_field("active", FieldOptions::new())?;
/// scope.declare_field("idle", FieldOptions::new().draw("AREA"))?;
///
/// assert_eq!(definition.fields().len(), 3);
/// # Ok::<_, munin_plugin::data::Error>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Definition {
    graph: GraphOptions,
    fields: Vec<Field>,
}

impl Definition {
    /// Create a definition for a graph with the given title and no fields.
    pub fn new(title: impl fmt::Display) -> Self {
        Self::with_graph(title, GraphOptions::new())
    }

    /// Create a definition with no fields whose graph attributes are set as by
    /// [`graph_attributes`][Definition::graph_attributes].
    pub fn with_graph(title: impl fmt::Display, options: GraphOptions) -> Self {
        let mut definition = Self {
            graph: GraphOptions::new(),
            fields: Vec::new(),
        };
        definition.graph_attributes(title, options);
        definition
    }

    /// Set the graph attributes of this definition.
    ///
    /// The graph options become `title` and `args` (defaulting to
    /// [`DEFAULT_GRAPH_ARGS`]) overlaid with `options`; keys in `options` win.
    /// Any previously declared graph attributes are discarded.
    pub fn graph_attributes(
        &mut self,
        title: impl fmt::Display,
        options: GraphOptions,
    ) -> &mut Self {
        let mut graph = GraphOptions::new().title(title).args(DEFAULT_GRAPH_ARGS);
        graph.merge(&options);
        self.graph = graph;
        self
    }

    /// Declare a field, appending it to the field list.
    ///
    /// Declaring a name that already exists replaces the earlier field in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyFieldName`] if `name` is empty.
    pub fn declare_field(
        &mut self,
        name: impl Into<String>,
        options: FieldOptions,
    ) -> Result<&mut Self, Error> {
        let field = Field::new(name, options)?;
        match self.fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(existing) => {
                tracing::warn!(field = field.name(), "field declared twice, replacing");
                *existing = field;
            }
            None => self.fields.push(field),
        }
        Ok(self)
    }

    /// Return a scope which merges `options` into every declaration made through it.
    ///
    /// Options passed to the individual declaration take precedence over the
    /// scope's options.
    pub fn with_options<A: Attribute>(&mut self, options: Options<A>) -> OptionScope<'_, A> {
        OptionScope {
            definition: self,
            options,
        }
    }

    /// The graph attributes of this definition.
    pub fn graph_options(&self) -> &GraphOptions {
        &self.graph
    }

    /// The declared fields, in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a declared field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub(crate) fn into_parts(self) -> (GraphOptions, Vec<Field>) {
        (self.graph, self.fields)
    }
}

/// A view of a [`Definition`] which merges a fixed set of options into each declaration.
///
/// Created by [`Definition::with_options`]. A scope over [`FieldAttribute`]s offers
/// [`declare_field`][OptionScope::declare_field]; a scope over [`GraphAttribute`]s offers
/// [`graph_attributes`][OptionScope::graph_attributes].
pub struct OptionScope<'a, A: Attribute> {
    definition: &'a mut Definition,
    options: Options<A>,
}

impl<A: Attribute> OptionScope<'_, A> {
    /// The options merged into each declaration.
    pub fn options(&self) -> &Options<A> {
        &self.options
    }

    /// Return a nested scope whose options are this scope's overlaid with `options`.
    pub fn with_options(&mut self, options: Options<A>) -> OptionScope<'_, A> {
        OptionScope {
            options: options.merged_over(&self.options),
            definition: &mut *self.definition,
        }
    }
}

impl OptionScope<'_, FieldAttribute> {
    /// Declare a field with the scope's options merged under `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyFieldName`] if `name` is empty.
    pub fn declare_field(
        &mut self,
        name: impl Into<String>,
        options: FieldOptions,
    ) -> Result<&mut Self, Error> {
        self.definition
            .declare_field(name, options.merged_over(&self.options))?;
        Ok(self)
    }
}

impl OptionScope<'_, GraphAttribute> {
    /// Set the graph attributes with the scope's options merged under `options`.
    pub fn graph_attributes(
        &mut self,
        title: impl fmt::Display,
        options: GraphOptions,
    ) -> &mut Self {
        self.definition
            .graph_attributes(title, options.merged_over(&self.options));
        self
    }
}

impl<A: Attribute> fmt::Debug for OptionScope<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionScope")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
