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

#[munin_plugin::main]
fn plugin() -> Sessions {
    Sessions
}
