//! Error types returned while declaring plugin metadata.
use thiserror::Error;

/// Errors that can occur when declaring graphs and fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A field was declared with an empty name.
    ///
    /// Munin keys every data source line by the field name, so an empty
    /// name would produce lines such as `.label` which the node cannot parse.
    #[error("field name must not be empty")]
    EmptyFieldName,

    /// An attribute name did not match any attribute recognised by Munin.
    ///
    /// This is only returned when parsing an attribute explicitly (for example via
    /// [`str::parse`]). The string-keyed setters on [`Options`][crate::data::Options]
    /// ignore unknown names instead.
    #[error("unknown {kind} attribute: {name}")]
    UnknownAttribute {
        /// Which attribute set was being parsed (`graph` or `field`).
        kind: &'static str,
        /// The name that failed to parse.
        name: String,
    },
}
