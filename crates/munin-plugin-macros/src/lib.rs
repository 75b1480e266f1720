use proc_macro::TokenStream;
use proc_macro2::Span;

use quote::{quote, quote_spanned, ToTokens};
use syn::{meta::ParseNestedMeta, parenthesized, parse::ParseBuffer, parse_macro_input, Lit};

fn token_stream_with_error(mut tokens: TokenStream, error: syn::Error) -> TokenStream {
    tokens.extend(TokenStream::from(error.into_compile_error()));
    tokens
}

#[derive(Default)]
struct Configuration {
    init_subscriber: Option<bool>,
    hostname: Option<String>,
}

impl Configuration {
    fn get_accidental_nested_meta(input: &ParseBuffer) -> Result<Lit, syn::Error> {
        let content;
        parenthesized!(content in input);
        let x: Lit = content.parse()?;
        Ok(x)
    }

    fn set_init_subscriber(&mut self, init_subscriber: ParseNestedMeta) -> Result<(), syn::Error> {
        if self.init_subscriber.is_some() {
            return Err(init_subscriber.error("`init_subscriber` set multiple times."));
        }
        let value = init_subscriber.value().map_err(|_| {
            init_subscriber.error(format!(
                "`init_subscriber` should be specified as `init_subscriber = {}`",
                Self::get_accidental_nested_meta(init_subscriber.input)
                    .ok()
                    .and_then(|x| if let Lit::Bool(b) = x {
                        Some(b.value)
                    } else {
                        None
                    })
                    .unwrap_or(true)
            ))
        })?;
        let s: syn::LitBool = value
            .parse()
            .map_err(|e| syn::Error::new(e.span(), "`init_subscriber` must be a bool literal."))?;
        self.init_subscriber = Some(s.value);
        Ok(())
    }

    fn set_hostname(&mut self, hostname: ParseNestedMeta) -> Result<(), syn::Error> {
        if self.hostname.is_some() {
            return Err(hostname.error("`hostname` set multiple times."));
        }
        let value = hostname.value().map_err(|_| {
            let name = Self::get_accidental_nested_meta(hostname.input)
                .ok()
                .and_then(|x| {
                    if let Lit::Str(s) = x {
                        Some(s.value())
                    } else {
                        None
                    }
                })
                .unwrap_or_else(|| "<hostname>".to_string());
            hostname.error(format!(
                r#"`hostname` should be specified as `hostname = "{}"`"#,
                name
            ))
        })?;
        let s: syn::LitStr = value
            .parse()
            .map_err(|e| syn::Error::new(e.span(), "`hostname` must be a string literal."))?;
        if s.value().is_empty() {
            return Err(syn::Error::new(s.span(), "`hostname` must not be empty."));
        }
        self.hostname = Some(s.value());
        Ok(())
    }

    fn parse(&mut self, meta: ParseNestedMeta) -> Result<(), syn::Error> {
        if meta.path.is_ident("init_subscriber") {
            self.set_init_subscriber(meta)?;
        } else if meta.path.is_ident("hostname") {
            self.set_hostname(meta)?;
        } else {
            return Err(meta.error(
                "Unknown attribute. Only `init_subscriber` and `hostname` are supported.",
            ));
        }
        Ok(())
    }

    fn build(self) -> FinalConfig {
        FinalConfig {
            init_subscriber: self.init_subscriber.unwrap_or_default(),
            hostname: self.hostname,
        }
    }
}

#[derive(Default)]
struct FinalConfig {
    init_subscriber: bool,
    hostname: Option<String>,
}

fn parse_knobs(input: syn::ItemFn, config: FinalConfig) -> TokenStream {
    // If type mismatch occurs, the current rustc points to the last statement.
    let last_stmt_start_span = {
        let mut last_stmt = input
            .block
            .stmts
            .last()
            .map(ToTokens::into_token_stream)
            .unwrap_or_default()
            .into_iter();
        last_stmt.next().map_or_else(Span::call_site, |t| t.span())
    };

    let body = input.block;

    let init = if config.init_subscriber {
        quote! { ::munin_plugin::backend::init_subscriber(); }
    } else {
        quote! {}
    };

    let mut plugin = quote_spanned! {last_stmt_start_span=>
        ::munin_plugin::backend::Plugin::new(
            collector,
            ::munin_plugin::serde_json::Map::new(),
        )?
    };
    if let Some(hostname) = config.hostname {
        plugin = quote! { #plugin.hostname(#hostname) };
    }

    let expanded = quote! {
        fn main() -> ::std::result::Result<(), ::munin_plugin::backend::Error> {
            #init
            let collector = #body;
            #plugin.run()
        }
    };
    TokenStream::from(expanded)
}

/**
Generates a `main` function that runs a [`Plugin`](../munin_plugin/backend/struct.Plugin.html)
built from the returned value.

The annotated function must be named `plugin`, take no arguments, and return a type
implementing [`MuninPlugin`](../munin_plugin/backend/trait.MuninPlugin.html). The generated
`main` creates the plugin with an empty supplied configuration (configuration discovered
from the program name still applies), then runs the config or values pass depending on
the first command line argument.

# Attributes

## `init_subscriber`

Whether to install the crate's stderr logging subscriber using
[`init_subscriber`](../munin_plugin/backend/fn.init_subscriber.html) before anything else
runs. Defaults to `false`. This must be a boolean.

## `hostname`

A host name to report in a `host_name` line, for plugins which monitor a host other than
the one they run on. This must be a non-empty string.

# Example

```rust
use munin_plugin::prelude::*;

struct Load;

impl MuninPlugin for Load {
    type Config = serde::de::IgnoredAny;
    type Error = std::convert::Infallible;

    fn definition() -> Result<Definition, munin_plugin::data::Error> {
        let mut definition = Definition::new("Load average");
        definition.declare_field("load", FieldOptions::new())?;
        Ok(definition)
    }

    fn retrieve_values(&self, _: &Self::Config) -> Result<Values, Self::Error> {
        Ok(Values::new().with("load", 0.42))
    }
}

#[munin_plugin::main(init_subscriber = true, hostname = "switch01")]
fn plugin() -> Load {
    Load
}
```

# Macro expansion

The example above expands to:

```rust
# use munin_plugin::prelude::*;
# struct Load;
# impl MuninPlugin for Load {
#     type Config = serde::de::IgnoredAny;
#     type Error = std::convert::Infallible;
#     fn definition() -> Result<Definition, munin_plugin::data::Error> {
#         Ok(Definition::new("Load average"))
#     }
#     fn retrieve_values(&self, _: &Self::Config) -> Result<Values, Self::Error> {
#         Ok(Values::new())
#     }
# }
fn main() -> Result<(), munin_plugin::backend::Error> {
    munin_plugin::backend::init_subscriber();
    let collector = { Load };
    munin_plugin::backend::Plugin::new(collector, munin_plugin::serde_json::Map::new())?
        .hostname("switch01")
        .run()
}
```
*/
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    // If any of the steps for this macro fail, we still want to expand to an item that is as close
    // to the expected output as possible. This helps out IDEs such that completions and other
    // related features keep working.
    let input: syn::ItemFn = match syn::parse(item.clone()) {
        Ok(it) => it,
        Err(e) => return token_stream_with_error(item, e),
    };

    let res = if input.sig.ident != "plugin" {
        let msg = "the plugin function must be named 'plugin'";
        Err(syn::Error::new_spanned(&input.sig.ident, msg))
    } else if !input.sig.inputs.is_empty() {
        let msg = "the plugin function cannot accept arguments";
        Err(syn::Error::new_spanned(&input.sig.inputs, msg))
    } else if let Some(asyncness) = input.sig.asyncness {
        let msg = "the plugin function must not be `async`";
        Err(syn::Error::new_spanned(asyncness, msg))
    } else {
        let mut config = Configuration::default();
        let config_parser = syn::meta::parser(|meta| config.parse(meta));
        parse_macro_input!(args with config_parser);
        Ok(config)
    };

    match res {
        Ok(c) => parse_knobs(input, c.build()),
        Err(e) => token_stream_with_error(parse_knobs(input, FinalConfig::default()), e),
    }
}
