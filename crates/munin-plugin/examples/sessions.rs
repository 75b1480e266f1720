//! Counts session files, optionally only those modified recently.
//!
//! Run with `cargo run --example sessions -- config` to see the graph description.
use std::{io, path::PathBuf, time::Duration};

use munin_plugin::prelude::*;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use tracing::debug;

#[serde_as]
#[derive(Debug, Deserialize)]
struct Config {
    #[serde(default = "default_dir")]
    dir: PathBuf,
    /// Only count sessions touched within this many seconds.
    #[serde_as(as = "Option<DisplayFromStr>")]
    max_age: Option<u64>,
}

fn default_dir() -> PathBuf {
    PathBuf::from("/var/lib/php/sessions")
}

struct Sessions;

impl MuninPlugin for Sessions {
    type Config = Config;
    type Error = io::Error;

    fn definition() -> Result<Definition, munin_plugin::data::Error> {
        let mut definition = Definition::with_graph(
            "Sessions",
            GraphOptions::new().category("Application").vlabel("sessions"),
        );
        definition.declare_field("count", FieldOptions::new().min(0))?;
        definition
            .with_options(FieldOptions::new().min(0).draw("LINE1"))
            .declare_field("recent", FieldOptions::new().label("active recently"))?;
        Ok(definition)
    }

    fn retrieve_values(&self, config: &Config) -> Result<Values, Self::Error> {
        let max_age = config.max_age.map(Duration::from_secs);
        let mut count = 0_u64;
        let mut recent = 0_u64;
        for entry in std::fs::read_dir(&config.dir)? {
            let metadata = entry?.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            count += 1;
            let age = metadata.modified()?.elapsed().unwrap_or_default();
            if max_age.map_or(true, |max| age <= max) {
                recent += 1;
            }
        }
        debug!(dir = %config.dir.display(), count, recent, "Counted sessions");
        Ok(Values::new().with("count", count).with("recent", recent))
    }
}

#[munin_plugin::main(init_subscriber = true)]
fn plugin() -> Sessions {
    Sessions
}
