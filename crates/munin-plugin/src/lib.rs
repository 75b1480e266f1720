/*! Declarative helpers for writing [Munin] plugins in Rust.

A Munin plugin prints one of two things, depending on how munin-node calls it:
a description of its graph and data sources (when called with `config`) or the
current value of each data source (otherwise). This crate is divided into two modules:

- [`data`] contains the plugin metadata model: [`GraphAttribute`][data::GraphAttribute]s
  and [`FieldAttribute`][data::FieldAttribute]s, [`Field`][data::Field]s, the
  [`Definition`][data::Definition] grouping them, and the [`Values`][data::Values] a plugin
  reports.
- [`backend`] contains the [`MuninPlugin`][backend::MuninPlugin] trait implemented by each
  plugin, the [`Plugin`][backend::Plugin] which runs it, and the logging setup.

The [`prelude`] re-exports the names needed by most plugins, and the [`main`] attribute
macro generates a `main` function for a plugin.

# Example

```rust,no_run
use munin_plugin::prelude::*;

struct Sessions;

impl MuninPlugin for Sessions {
    type Config = serde::de::IgnoredAny;
    type Error = std::convert::Infallible;

    fn definition() -> Result<Definition, munin_plugin::data::Error> {
        let mut definition =
            Definition::with_graph("Sessions", GraphOptions::new().category("Application"));
        definition.declare_field("count", FieldOptions::new().min(0))?;
        Ok(definition)
    }

    fn retrieve_values(&self, _: &Self::Config) -> Result<Values, Self::Error> {
        Ok(Values::new().with("count", 5))
    }
}

#[munin_plugin::main(init_subscriber = true)]
fn plugin() -> Sessions {
    Sessions
}
```

[Munin]: https://guide.munin-monitoring.org/en/latest/develop/plugins/howto-write-plugins.html
*/
#![warn(missing_docs)]

#[doc(hidden)]
pub use serde_json;

pub mod backend;
pub mod data;

/// The names needed to declare and run most plugins.
pub mod prelude {
    pub use crate::backend::{ConfigMap, MuninPlugin, Plugin};
    pub use crate::data::{Definition, FieldOptions, GraphOptions, Values};
}

#[doc(inline)]
pub use munin_plugin_macros::main;
