#[cfg(test)]
pub mod test {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use crate::Decode;

    #[derive(Decode, Debug, Default, PartialEq)]
    pub struct Server {
        #[pathfig(cfg = "host")]
        pub host: String,

        #[pathfig(cfg = "port")]
        pub port: u16,

        #[pathfig(cfg = "timeout")]
        pub timeout: Duration,
    }

    /// Every field optional and lenient, for "nothing set" checks.
    #[derive(Decode, Debug, Default, PartialEq)]
    pub struct Sparse {
        #[pathfig(cfg = "name")]
        pub name: String,

        #[pathfig(cfg = "limits.max")]
        pub max: Option<u32>,
    }

    #[derive(Decode, Debug, Default, PartialEq)]
    pub struct Endpoint {
        #[pathfig(cfg = "name")]
        pub name: String,

        #[pathfig(cfg = "ports")]
        pub ports: BTreeMap<String, u16>,
    }

    #[derive(Decode, Debug, Default, PartialEq)]
    pub struct Tagged {
        #[pathfig(cfg = "primary", alt = "ALT_NAME")]
        pub name: String,

        #[pathfig(skip)]
        pub untouched: bool,
    }

    #[test]
    fn blank_is_field_wise() {
        let blank = <Server as crate::Decode>::blank();
        assert_eq!(blank, Server::default());
    }
}
