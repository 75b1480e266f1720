//! A wildcard plugin reporting traffic for the interface in its name.
//!
//! Link it as `if_eth0` and munin-node will graph `eth0`.
use std::io;

use munin_plugin::{backend, prelude::*};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct Config {
    interface: String,
}

#[derive(Debug, Error)]
enum TrafficError {
    #[error("error reading /proc/net/dev: {0}")]
    Read(#[from] io::Error),
    #[error("interface {0} not found")]
    NotFound(String),
}

struct Interface;

impl MuninPlugin for Interface {
    type Config = Config;
    type Error = TrafficError;

    fn definition() -> Result<Definition, munin_plugin::data::Error> {
        let mut definition = Definition::with_graph(
            "Interface traffic",
            GraphOptions::new()
                .args("--base 1000")
                .category("network")
                .vlabel("bits in (-) / out (+) per ${graph_period}")
                .order("down up"),
        );
        let mut scope = definition.with_options(
            FieldOptions::new()
                .kind("derive")
                .min(0)
                .max(1_000_000_000),
        );
        scope
            .declare_field(
                "down",
                FieldOptions::new().label("received").graph("no").cdef("down,8,*"),
            )?
            .declare_field(
                "up",
                FieldOptions::new().label("bps").negative("down").cdef("up,8,*"),
            )?;
        Ok(definition)
    }

    fn config_from_filename(program: &str) -> Option<backend::ConfigMap> {
        let interface = program.strip_prefix("if_")?;
        let mut config = backend::ConfigMap::new();
        config.insert("interface".to_string(), interface.into());
        Some(config)
    }

    fn retrieve_values(&self, config: &Config) -> Result<Values, Self::Error> {
        let dev = std::fs::read_to_string("/proc/net/dev")?;
        let counters = dev
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim() == config.interface)
            .map(|(_, counters)| counters.split_whitespace().collect::<Vec<_>>())
            .ok_or_else(|| TrafficError::NotFound(config.interface.clone()))?;
        let bytes = |i: usize| counters.get(i).copied().unwrap_or("U");
        Ok(Values::new().with("down", bytes(0)).with("up", bytes(8)))
    }
}

#[munin_plugin::main(init_subscriber = true)]
fn plugin() -> Interface {
    Interface
}
