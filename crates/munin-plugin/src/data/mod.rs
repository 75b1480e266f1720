//! Data types describing a plugin: graph and field attributes, fields, definitions and values.
//!
//! The attribute enums are marked `#[non_exhaustive]` because Munin may gain
//! further attributes; use their `ALL` constants rather than matching exhaustively.
//!
//! For example:
//!
//! ```
//! use munin_plugin::data::{Definition, FieldAttribute, FieldOptions, GraphOptions};
//!
//! let mut definition = Definition::with_graph(
//!     "Mail queue",
//!     GraphOptions::new().category("Mail").vlabel("messages"),
//! );
//! definition.declare_field("deferred", FieldOptions::new().min(0).warning(100))?;
//!
//! let deferred = definition.field("deferred").unwrap();
//! assert_eq!(deferred.option(FieldAttribute::Label), Some("deferred"));
//! # Ok::<_, munin_plugin::data::Error>(())
//! ```
mod attribute;
mod definition;
mod error;
mod field;
mod values;

pub use attribute::{
    Attribute, FieldAttribute, FieldOptions, GraphAttribute, GraphOptions, Options,
};
pub use definition::{Definition, OptionScope, DEFAULT_GRAPH_ARGS};
pub use error::Error;
pub use field::Field;
pub use values::Values;
