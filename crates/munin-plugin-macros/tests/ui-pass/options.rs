use std::collections::HashMap;

use munin_plugin::prelude::*;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("no such queue: {0}")]
struct MissingQueue(String);

#[derive(Debug, Default, Deserialize)]
struct Config {
    #[serde(default)]
    queue: Option<String>,
}

#[derive(Default)]
struct Queues {
    depths: HashMap<String, u64>,
    queue: String,
}

impl MuninPlugin for Queues {
    type Config = Config;
    type Error = MissingQueue;

    fn definition() -> Result<Definition, munin_plugin::data::Error> {
        let mut definition = Definition::new("Queue depth");
        definition
            .with_options(FieldOptions::new().min(0).draw("LINE2"))
            .declare_field("depth", FieldOptions::new())?;
        Ok(definition)
    }

    fn after_initialize(&mut self, config: &Self::Config) {
        self.queue = config.queue.clone().unwrap_or_else(|| "default".to_string());
    }

    fn retrieve_values(&self, _: &Self::Config) -> Result<Values, Self::Error> {
        let depth = self
            .depths
            .get(&self.queue)
            .ok_or_else(|| MissingQueue(self.queue.clone()))?;
        Ok(Values::new().with("depth", depth))
    }
}

#[munin_plugin::main(init_subscriber = true, hostname = "mq01.example.com")]
fn plugin() -> Queues {
    let mut depths = HashMap::new();
    depths.insert("default".to_string(), 12);
    Queues {
        depths,
        ..Default::default()
    }
}
