#![allow(dead_code, unused_variables)]

mod a {
    use munin_plugin::prelude::*;

    struct Sessions;

    impl MuninPlugin for Sessions {
        type Config = serde::de::IgnoredAny;
        type Error = std::convert::Infallible;

        fn definition() -> Result<Definition, munin_plugin::data::Error> {
            Ok(Definition::new("Sessions"))
        }

        fn retrieve_values(&self, _: &Self::Config) -> Result<Values, Self::Error> {
            Ok(Values::new())
        }
    }

    #[munin_plugin::main(init_subscriber = "yes")]
    fn plugin() -> Sessions {
        Sessions
    }
}

mod b {
    use munin_plugin::prelude::*;

    struct Sessions;

    impl MuninPlugin for Sessions {
        type Config = serde::de::IgnoredAny;
        type Error = std::convert::Infallible;

        fn definition() -> Result<Definition, munin_plugin::data::Error> {
            Ok(Definition::new("Sessions"))
        }

        fn retrieve_values(&self, _: &Self::Config) -> Result<Values, Self::Error> {
            Ok(Values::new())
        }
    }

    #[munin_plugin::main(init_subscriber(false))]
    fn plugin() -> Sessions {
        Sessions
    }
}

fn main() {}
