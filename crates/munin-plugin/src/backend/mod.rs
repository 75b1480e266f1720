/*! Functionality for running plugins.

A Munin plugin is an executable that munin-node runs once per request. When called
with the single argument `config` it prints a description of its graph and fields;
called with anything else (usually no argument at all) it prints the current value
of each field. Both outputs are `<key> <value>` lines on stdout.

The basic requirements for a plugin are:

- a type implementing [`MuninPlugin`], which declares the plugin's [`Definition`] and
  knows how to retrieve its current [`Values`]
- a `main` function which wraps that type in a [`Plugin`] and calls [`Plugin::run`].
  The [`#[munin_plugin::main]`][crate::main] attribute generates this function.

# Logging and `tracing`

Stdout belongs to munin-node, so anything other than protocol lines must go to stderr.
The [`layer`] function returns a preconfigured [`tracing_subscriber::fmt::Layer`] writing
to stderr, and [`init_subscriber`] installs it with a filter taken from the `RUST_LOG`
environment variable (defaulting to `warn`). munin-node copies a plugin's stderr into
its own log.

# Example

```rust,no_run
use munin_plugin::{backend, data};
use serde::Deserialize;

#[derive(Debug)]
struct Sessions;

#[derive(Debug, Default, Deserialize)]
struct Config {
    #[serde(default)]
    path: Option<String>,
}

impl backend::MuninPlugin for Sessions {
    type Config = Config;
    type Error = std::io::Error;

    fn definition() -> Result<data::Definition, data::Error> {
        let mut definition = data::Definition::with_graph(
            "Sessions",
            data::GraphOptions::new().category("Application"),
        );
        definition.declare_field("count", data::FieldOptions::new().min(0))?;
        Ok(definition)
    }

    fn retrieve_values(&self, config: &Config) -> Result<data::Values, Self::Error> {
        let dir = config.path.as_deref().unwrap_or("/var/lib/php/sessions");
        let count = std::fs::read_dir(dir)?.count();
        Ok(data::Values::new().with("count", count))
    }
}

fn main() -> Result<(), backend::Error> {
    backend::init_subscriber();
    backend::Plugin::new(Sessions, backend::ConfigMap::new())?.run()
}
```
*/
use std::{fmt, io, path::Path};

use itertools::Itertools;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing_subscriber::{fmt::time::UtcTime, prelude::*, registry::LookupSpan, EnvFilter};

use crate::data::{self, Definition, Field, GraphAttribute, GraphOptions, Values};

mod protocol;

pub use protocol::{Emitter, Mode};

/// Untyped plugin configuration, as supplied by the caller or discovered from the
/// program name.
///
/// It is deserialized into the plugin's own [`MuninPlugin::Config`] type.
pub type ConfigMap = serde_json::Map<String, serde_json::Value>;

/// The behaviour specific to one type of plugin.
///
/// Only [`definition`][MuninPlugin::definition] and
/// [`retrieve_values`][MuninPlugin::retrieve_values] are required; the remaining methods
/// have no-op defaults.
pub trait MuninPlugin {
    /// The configuration this plugin reads.
    ///
    /// Use [`ConfigMap`] to accept any keys, or [`serde::de::IgnoredAny`] if the plugin
    /// has no configuration.
    type Config: DeserializeOwned;

    /// The error returned when values cannot be retrieved.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Declare the graph attributes and fields of this plugin.
    ///
    /// This is called once for each [`Plugin`] created, which keeps its own copy.
    fn definition() -> Result<Definition, data::Error>;

    /// Retrieve the current value of each field.
    ///
    /// Values for names which were not declared as fields are not printed.
    fn retrieve_values(&self, config: &Self::Config) -> Result<Values, Self::Error>;

    /// Derive configuration from the name the plugin was invoked as.
    ///
    /// This supports wildcard plugins: a plugin linked as `if_eth0` can return
    /// `{"interface": "eth0"}` here. Keys returned override those passed to [`Plugin::new`].
    fn config_from_filename(_program: &str) -> Option<ConfigMap> {
        None
    }

    /// Called once the plugin's configuration is finalized, before any output.
    fn after_initialize(&mut self, _config: &Self::Config) {}
}

/// One invocation of a plugin.
///
/// A `Plugin` owns the plugin's state, its deserialized configuration and a snapshot of
/// its [`Definition`]. Changes made through the graph attribute setters only affect this
/// instance.
///
/// # Example
///
/// ```rust
/// use munin_plugin::{backend, data};
///
/// struct Uptime;
///
/// impl backend::MuninPlugin for Uptime {
///     type Config = serde::de::IgnoredAny;
///     type Error = std::convert::Infallible;
///
///     fn definition() -> Result<data::Definition, data::Error> {
///         let mut definition =
///             data::Definition::with_graph("Uptime", data::GraphOptions::new().vlabel("days"));
///         definition.declare_field("uptime", data::FieldOptions::new().draw("AREA"))?;
///         Ok(definition)
///     }
///
///     fn retrieve_values(&self, _: &Self::Config) -> Result<data::Values, Self::Error> {
///         Ok(data::Values::new().with("uptime", 12.5))
///     }
/// }
///
/// let plugin = backend::Plugin::new(Uptime, backend::ConfigMap::new())?
///     .hostname("db01.example.com");
///
/// let mut out = Vec::new();
/// plugin.run_with(Some("config"), &mut out)?;
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "host_name db01.example.com\n\
///      graph_title Uptime\n\
///      graph_args --base 1000\n\
///      graph_vlabel days\n\
///      uptime.label uptime\n\
///      uptime.draw AREA\n",
/// );
/// # Ok::<_, backend::Error>(())
/// ```
pub struct Plugin<P: MuninPlugin> {
    collector: P,
    config: P::Config,
    hostname: Option<String>,
    graph: GraphOptions,
    fields: Vec<Field>,
}

impl<P: MuninPlugin> Plugin<P> {
    /// Create a plugin instance from `collector` and the supplied configuration.
    ///
    /// The program name used for [`MuninPlugin::config_from_filename`] is the file name of
    /// the running executable.
    ///
    /// # Errors
    ///
    /// See [`Plugin::with_program`].
    pub fn new(collector: P, config: ConfigMap) -> Result<Self, Error> {
        let program = program_name();
        Self::with_program(collector, config, program.as_deref())
    }

    /// Create a plugin instance, using `program` as the invocation name.
    ///
    /// Configuration discovered from `program` is merged over `config`, the result is
    /// deserialized into `P::Config`, the definition is captured and finally
    /// [`MuninPlugin::after_initialize`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the merged configuration cannot be
    /// deserialized, or [`Error::Definition`] if the plugin's definition is invalid.
    pub fn with_program(
        mut collector: P,
        mut config: ConfigMap,
        program: Option<&str>,
    ) -> Result<Self, Error> {
        if let Some(program) = program {
            if let Some(discovered) = P::config_from_filename(program) {
                tracing::debug!(
                    program,
                    keys = %discovered.keys().join(", "),
                    "Merging config discovered from program name"
                );
                config.extend(discovered);
            }
        }
        let config = read_config::<P::Config>(config)?;
        let (graph, fields) = P::definition()?.into_parts();
        collector.after_initialize(&config);
        Ok(Self {
            collector,
            config,
            hostname: None,
            graph,
            fields,
        })
    }

    /// Report the graph as belonging to `hostname`.
    ///
    /// This emits a `host_name` line at the top of the configuration output, which
    /// munin uses to attribute graphs to a host other than the node itself.
    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.set_hostname(hostname);
        self
    }

    /// Set or replace the reported host name.
    pub fn set_hostname(&mut self, hostname: impl Into<String>) {
        self.hostname = Some(hostname.into());
    }

    /// The reported host name, if any.
    pub fn host_name(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// The deserialized configuration.
    pub fn config(&self) -> &P::Config {
        &self.config
    }

    /// The plugin's own state.
    pub fn collector(&self) -> &P {
        &self.collector
    }

    /// The graph attributes of this instance.
    pub fn graph_options(&self) -> &GraphOptions {
        &self.graph
    }

    /// The fields of this instance, in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Get a graph attribute by its wire name, without the `graph_` prefix.
    pub fn graph_option(&self, name: &str) -> Option<&str> {
        self.graph.get_named(name)
    }

    /// Set a graph attribute by its wire name, without the `graph_` prefix.
    ///
    /// Unknown names are ignored. Returns `true` if the name was recognised.
    pub fn set_graph_option(&mut self, name: &str, value: impl fmt::Display) -> bool {
        self.graph.set_named(name, value)
    }

    /// Write the configuration description to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if writing fails.
    pub fn print_config_to<W: io::Write>(&self, writer: &mut W) -> Result<(), Error> {
        let mut out = Emitter::new(writer);
        if let Some(hostname) = &self.hostname {
            out.line("host_name", hostname)?;
        }
        for (attribute, value) in self.graph.iter() {
            out.line(format_args!("graph_{attribute}"), value)?;
        }
        for field in &self.fields {
            for (key, value) in field.config() {
                out.line(key, value)?;
            }
        }
        tracing::debug!(lines = out.lines(), "Printed config");
        out.finish()?;
        Ok(())
    }

    /// Retrieve the current values and write them to `writer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Collect`] if the plugin fails to retrieve its values, in which
    /// case nothing is written, or [`Error::Output`] if writing fails.
    pub fn print_values_to<W: io::Write>(&self, writer: &mut W) -> Result<(), Error> {
        let values = self
            .collector
            .retrieve_values(&self.config)
            .map_err(|e| Error::Collect(Box::new(e)))?;
        let mut out = Emitter::new(writer);
        for (name, value) in values.iter() {
            if self.fields.iter().any(|f| f.name() == name) {
                out.line(format_args!("{name}.value"), value)?;
            } else {
                tracing::debug!(field = name, "Skipping value for undeclared field");
            }
        }
        tracing::debug!(lines = out.lines(), "Printed values");
        out.finish()?;
        Ok(())
    }

    /// Run the pass selected by `arg`, writing to `writer`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Plugin::print_config_to`] or [`Plugin::print_values_to`].
    pub fn run_with<W: io::Write>(&self, arg: Option<&str>, writer: &mut W) -> Result<(), Error> {
        let mode = Mode::from_arg(arg);
        tracing::debug!(?mode, "Running plugin");
        match mode {
            Mode::Config => self.print_config_to(writer),
            Mode::Values => self.print_values_to(writer),
        }
    }

    /// Write the configuration description to stdout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Output`] if writing fails.
    pub fn print_config(&self) -> Result<(), Error> {
        self.print_config_to(&mut io::stdout().lock())
    }

    /// Retrieve the current values and write them to stdout.
    ///
    /// # Errors
    ///
    /// See [`Plugin::print_values_to`].
    pub fn print_values(&self) -> Result<(), Error> {
        self.print_values_to(&mut io::stdout().lock())
    }

    /// Run the plugin, choosing the pass from the first command line argument.
    ///
    /// # Errors
    ///
    /// See [`Plugin::run_with`].
    pub fn run(&self) -> Result<(), Error> {
        let arg = std::env::args().nth(1);
        self.run_with(arg.as_deref(), &mut io::stdout().lock())
    }
}

macro_rules! graph_accessors {
    ($($name:ident => $variant:ident),+ $(,)?) => {
        paste::paste! {
            impl<P: MuninPlugin> Plugin<P> {
                $(
                    #[doc = "The `graph_" $name "` attribute, if set."]
                    pub fn [<graph_ $name>](&self) -> Option<&str> {
                        self.graph.get(GraphAttribute::$variant)
                    }

                    #[doc = "Set the `graph_" $name "` attribute for this instance."]
                    pub fn [<set_graph_ $name>](&mut self, value: impl fmt::Display) {
                        self.graph.set(GraphAttribute::$variant, value);
                    }
                )+
            }
        }
    };
}

graph_accessors! {
    title => Title,
    args => Args,
    category => Category,
    info => Info,
    order => Order,
    vlabel => Vlabel,
    total => Total,
    scale => Scale,
    period => Period,
    vtitle => Vtitle,
    width => Width,
    height => Height,
    printf => Printf,
}

impl<P> fmt::Debug for Plugin<P>
where
    P: MuninPlugin + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("collector", &self.collector)
            .field("hostname", &self.hostname)
            .field("graph", &self.graph)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

fn program_name() -> Option<String> {
    let arg0 = std::env::args_os().next()?;
    Path::new(&arg0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

fn read_config<T: DeserializeOwned>(config: ConfigMap) -> Result<T, Error> {
    let keys = config.keys().cloned().collect::<Vec<_>>();
    T::deserialize(serde_json::Value::Object(config))
        .map_err(|err| Error::InvalidConfig { err, keys })
}

const LOG_TIME_FORMAT: &[time::format_description::FormatItem] = time::macros::format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
);

/// Create a `tracing` [`Layer`][tracing_subscriber::Layer] which logs to stderr.
///
/// The returned layer should be installed into the tracing subscriber registry, with an
/// optional env filter.
///
/// # Example
///
/// ```rust
/// use munin_plugin::backend;
/// use tracing_subscriber::{prelude::*, EnvFilter};
///
/// tracing_subscriber::registry()
///     .with(backend::layer())
///     .with(EnvFilter::from_default_env())
///     .init();
/// ```
pub fn layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .with_timer(UtcTime::new(LOG_TIME_FORMAT))
        .with_writer(io::stderr as fn() -> io::Stderr)
        .with_ansi(false)
}

/// Install a global subscriber logging to stderr.
///
/// The filter is read from the `RUST_LOG` environment variable, defaulting to `warn`.
///
/// # Panics
///
/// This will panic if a global subscriber has already been installed. Use [`layer`] to
/// compose the plugin's layer into your own subscriber instead.
pub fn init_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(layer())
        .with(filter)
        .init();
}

/// Errors returned while running a plugin.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The plugin's definition was invalid.
    #[error("invalid plugin definition: {0}")]
    Definition(#[from] data::Error),
    /// The plugin configuration could not be deserialized.
    #[error("invalid plugin config (got keys: [{}]): {err}", .keys.join(", "))]
    InvalidConfig {
        /// The underlying JSON error.
        err: serde_json::Error,
        /// The keys present in the configuration.
        ///
        /// Values are not shown because they may contain credentials.
        keys: Vec<String>,
    },
    /// The plugin failed to retrieve its values.
    #[error("error retrieving values: {0}")]
    Collect(Box<dyn std::error::Error + Send + Sync>),
    /// Output could not be written.
    #[error("error writing output: {0}")]
    Output(#[from] io::Error),
}
