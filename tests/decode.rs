use std::collections::HashMap;
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

use pathfig::{
    BoxError, ConfigSet, CustomDecode, Decode, DecodeOptions, JsonLoader, LoadOptions,
    PathfigError, Value,
};
use url::Url;

const PRIMITIVES: &str = r#"{
    "test_bool": true,
    "test_int": 42,
    "test_int_string": "64",
    "test_float": 3.25,
    "test_string": "efes",
    "test_slice": "test1;test2;test3",
    "arr": ["aleph", "beth", "gimel"]
}"#;

const COMPOSITE: &str = r#"{
    "test_section": {"test_string": "efes", "test_int": 7},
    "test_map": {"a": 1, "b": 2, "c": "three"},
    "test_list": [1, 2, "three", 4],
    "test_flags": {"true": 1, "maybe": 2}
}"#;

const COMMON: &str = r#"{
    "timeout": "15s",
    "bad_timeout": "fifteen seconds",
    "addr": "192.168.1.10",
    "url": "https://example.com/api",
    "bad_url": "http://[::1",
    "started": "2024-03-01T12:00:00Z",
    "started_epoch": 1709294400,
    "raw": {"nested": [1, 2]}
}"#;

fn config(json: &str) -> ConfigSet {
    let mut set = ConfigSet::new();
    set.load(JsonLoader::new().from_str(json), LoadOptions::default())
        .unwrap();
    set
}

// -- primitives -----------------------------------------------------------------

#[derive(Decode, Debug, Default)]
struct Primitives {
    #[pathfig(cfg = "test_bool")]
    flag: bool,
    #[pathfig(cfg = "test_int")]
    count: u8,
    #[pathfig(cfg = "test_int_string")]
    parsed: i64,
    #[pathfig(cfg = "test_float")]
    ratio: f32,
    #[pathfig(cfg = "test_string")]
    name: String,
    #[pathfig(cfg = "test_int")]
    count_as_text: String,
}

#[test]
fn primitives_decode() {
    let set = config(PRIMITIVES);
    let mut target = Primitives::default();
    let n = set.strict_decode(&mut target).unwrap();

    assert_eq!(n, 6);
    assert!(target.flag);
    assert_eq!(target.count, 42);
    assert_eq!(target.parsed, 64);
    assert_eq!(target.ratio, 3.25);
    assert_eq!(target.name, "efes");
    assert_eq!(target.count_as_text, "42");
}

#[test]
fn optional_pointer_field() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_bool")]
        flag: Option<bool>,
        #[pathfig(cfg = "missing")]
        absent: Option<bool>,
    }

    let set = config(PRIMITIVES);
    let mut target = Target::default();
    set.decode(&mut target).unwrap();
    assert_eq!(target.flag, Some(true));
    assert_eq!(target.absent, None);
}

#[test]
fn optional_struct_with_failing_strict_field_sets_nothing() {
    #[derive(Decode, Default)]
    struct Section {
        #[pathfig(cfg = "test_string,strict")]
        flag: bool,
    }

    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_section")]
        section: Option<Section>,
    }

    let set = config(COMPOSITE);
    let mut target = Target::default();
    let err = set.decode(&mut target).unwrap_err();
    assert!(matches!(err, PathfigError::NoFieldsSet));
    assert!(target.section.is_none());
}

// -- policy ---------------------------------------------------------------------

#[test]
fn default_applies_to_missing_value() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_missing_string,default=defaultValue")]
        name: String,
        #[pathfig(cfg = "test_missing_port,default=8080")]
        port: u16,
    }

    let set = config(PRIMITIVES);
    let mut target = Target::default();
    assert_eq!(set.decode(&mut target).unwrap(), 2);
    assert_eq!(target.name, "defaultValue");
    assert_eq!(target.port, 8080);
}

#[test]
fn required_and_default_conflict() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_string,required,default=test")]
        name: String,
    }

    let set = config(PRIMITIVES);
    let mut target = Target::default();
    let err = set.decode(&mut target).unwrap_err();
    assert!(matches!(err, PathfigError::RequiredWithDefault { .. }));
}

#[test]
fn required_missing_field() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_string")]
        present: String,
        #[pathfig(cfg = "test_missing_string,required")]
        missing: String,
    }

    let set = config(PRIMITIVES);
    let mut target = Target::default();
    let err = set.decode(&mut target).unwrap_err();
    assert!(
        matches!(err, PathfigError::RequiredField { ref path, .. } if path == "test_missing_string")
    );
}

#[test]
fn absent_optional_fields_are_no_fields_set() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_missing_string")]
        name: String,
    }

    let set = config(PRIMITIVES);
    let mut target = Target::default();
    assert!(matches!(set.decode(&mut target), Err(PathfigError::NoFieldsSet)));
}

#[test]
fn empty_path_decodes_parent_value() {
    #[derive(Decode, Default)]
    struct Inner {
        #[pathfig(cfg = "test_string")]
        name: String,
    }

    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "")]
        inner: Inner,
        untagged: Inner,
    }

    let set = config(PRIMITIVES);
    let mut target = Target::default();
    assert_eq!(set.decode(&mut target).unwrap(), 2);
    assert_eq!(target.inner.name, "efes");
    assert_eq!(target.untagged.name, "efes");
}

#[test]
fn skipped_field_is_left_alone() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_string")]
        name: String,
        #[pathfig(skip)]
        cache: String,
    }

    let set = config(PRIMITIVES);
    let mut target = Target {
        cache: "warm".into(),
        ..Target::default()
    };
    assert_eq!(set.decode(&mut target).unwrap(), 1);
    assert_eq!(target.cache, "warm");
}

// -- collections ----------------------------------------------------------------

#[test]
fn slice_from_separated_string() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_slice")]
        items: Vec<String>,
    }

    let set = config(PRIMITIVES);
    let mut target = Target::default();
    set.decode(&mut target).unwrap();
    assert_eq!(target.items, vec!["test1", "test2", "test3"]);
}

#[test]
fn slice_from_map_is_fatal() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_map")]
        items: Vec<String>,
    }

    let set = config(COMPOSITE);
    let mut target = Target::default();
    let err = set.decode(&mut target).unwrap_err();
    assert!(matches!(err, PathfigError::UnexpectedShape { expected: "list", .. }));
}

#[test]
fn slice_elements_strict_and_lenient() {
    #[derive(Decode, Default)]
    struct Strict {
        #[pathfig(cfg = "test_list,strict")]
        items: Vec<i32>,
    }

    #[derive(Decode, Default)]
    struct Lenient {
        #[pathfig(cfg = "test_list")]
        items: Vec<i32>,
    }

    let set = config(COMPOSITE);

    let err = set.decode(&mut Strict::default()).unwrap_err();
    assert!(matches!(err, PathfigError::Field { ref path, .. } if path == "test_list[2]"));

    let mut lenient = Lenient::default();
    assert_eq!(set.decode(&mut lenient).unwrap(), 3);
    assert_eq!(lenient.items, vec![1, 2, 4]);
}

#[test]
fn map_values_strict_and_lenient() {
    #[derive(Decode, Default)]
    struct Strict {
        #[pathfig(cfg = "test_map,strict")]
        map: HashMap<String, i32>,
    }

    #[derive(Decode, Default)]
    struct Lenient {
        #[pathfig(cfg = "test_map")]
        map: HashMap<String, i32>,
    }

    let set = config(COMPOSITE);

    assert!(set.decode(&mut Strict::default()).is_err());

    let mut lenient = Lenient::default();
    set.decode(&mut lenient).unwrap();
    assert_eq!(lenient.map, HashMap::from([("a".into(), 1), ("b".into(), 2)]));
}

#[test]
fn strict_map_key_failure() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_flags,strict")]
        flags: HashMap<bool, i32>,
    }

    let set = config(COMPOSITE);
    let err = set.decode(&mut Target::default()).unwrap_err();
    assert!(matches!(err, PathfigError::MapKey { ref key, .. } if key == "maybe"));
}

#[test]
fn nested_struct_list() {
    #[derive(Decode, Debug, Default, PartialEq)]
    struct Replica {
        #[pathfig(cfg = "host")]
        host: String,
        #[pathfig(cfg = "port,default=5432")]
        port: u16,
    }

    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "db.replicas")]
        replicas: Vec<Replica>,
        #[pathfig(cfg = "db.replicas[1].host")]
        second: String,
    }

    let set = config(
        r#"{"db": {"replicas": [{"host": "a", "port": 6000}, {"host": "b"}]}}"#,
    );
    let mut target = Target::default();
    set.strict_decode(&mut target).unwrap();
    assert_eq!(
        target.replicas,
        vec![
            Replica { host: "a".into(), port: 6000 },
            Replica { host: "b".into(), port: 5432 },
        ]
    );
    assert_eq!(target.second, "b");
}

// -- common types ---------------------------------------------------------------

#[derive(Decode, Default)]
struct Common {
    #[pathfig(cfg = "timeout")]
    timeout: Duration,
    #[pathfig(cfg = "addr")]
    addr: Option<IpAddr>,
    #[pathfig(cfg = "url")]
    url: Option<Url>,
    #[pathfig(cfg = "started")]
    started: chrono::DateTime<chrono::Utc>,
    #[pathfig(cfg = "raw")]
    raw: serde_json::Value,
}

#[test]
fn common_types_decode() {
    let set = config(COMMON);
    let mut target = Common::default();
    assert_eq!(set.strict_decode(&mut target).unwrap(), 5);

    assert_eq!(target.timeout, Duration::from_secs(15));
    assert_eq!(target.addr, Some("192.168.1.10".parse().unwrap()));
    assert_eq!(target.url.unwrap().path(), "/api");
    assert_eq!(target.started.to_rfc3339(), "2024-03-01T12:00:00+00:00");
    assert_eq!(target.raw, serde_json::json!({"nested": [1, 2]}));
}

#[test]
fn invalid_duration_fails_strict() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "bad_timeout")]
        timeout: Duration,
    }

    let set = config(COMMON);
    let err = set.strict_decode(&mut Target::default()).unwrap_err();
    assert!(matches!(err, PathfigError::Field { ref path, .. } if path == "bad_timeout"));
}

#[test]
fn invalid_url_fails_strict() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "bad_url")]
        url: Option<Url>,
    }

    let set = config(COMMON);
    assert!(set.strict_decode(&mut Target::default()).is_err());
}

#[test]
fn numeric_timestamp_is_rejected() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "started_epoch")]
        started: chrono::DateTime<chrono::Utc>,
    }

    let set = config(COMMON);
    match set.strict_decode(&mut Target::default()).unwrap_err() {
        PathfigError::Field { source, .. } => {
            assert!(matches!(*source, PathfigError::NonStringTimestamp { found: "integer" }));
        }
        other => panic!("expected a field error, got {other}"),
    }
}

// -- custom and from_str --------------------------------------------------------

#[derive(Decode, Debug, Default, PartialEq)]
#[pathfig(custom)]
struct Upper {
    value: String,
}

impl CustomDecode for Upper {
    fn decode_raw(&mut self, raw: &Value) -> Result<(), BoxError> {
        let text = raw.as_str().ok_or("value is not a string")?;
        self.value = text.to_uppercase();
        Ok(())
    }
}

#[test]
fn custom_decoder() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_section.test_string")]
        custom: Upper,
    }

    let set = config(COMPOSITE);
    let mut target = Target::default();
    set.decode(&mut target).unwrap();
    assert_eq!(target.custom.value, "EFES");
}

#[test]
fn custom_decoder_failure_is_fatal() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_section")]
        custom: Upper,
    }

    let set = config(COMPOSITE);
    let err = set.decode(&mut Target::default()).unwrap_err();
    assert!(matches!(err, PathfigError::Custom { ref path, .. } if path == "test_section"));
}

#[derive(Decode, Debug, Default, PartialEq)]
#[pathfig(from_str)]
struct SmallNumber(u8);

impl FromStr for SmallNumber {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(SmallNumber)
    }
}

#[derive(Decode, Debug, Default, PartialEq)]
#[pathfig(from_str)]
enum Level {
    #[default]
    Info,
    Debug,
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            other => Err(format!("unknown level '{other}'")),
        }
    }
}

#[test]
fn from_str_types() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_int_string")]
        number: SmallNumber,
        #[pathfig(cfg = "level,default=debug")]
        level: Level,
    }

    let set = config(PRIMITIVES);
    let mut target = Target::default();
    set.decode(&mut target).unwrap();
    assert_eq!(target.number, SmallNumber(64));
    assert_eq!(target.level, Level::Debug);
}

#[test]
fn from_str_failure_is_fatal_when_lenient() {
    #[derive(Decode, Default)]
    struct Target {
        #[pathfig(cfg = "test_string")]
        name: String,
        #[pathfig(cfg = "test_bool")]
        number: SmallNumber,
    }

    let set = config(PRIMITIVES);
    let err = set.decode(&mut Target::default()).unwrap_err();
    assert!(matches!(err, PathfigError::Unmarshal { ref path, .. } if path == "test_bool"));
}

// -- tags and prefixes ----------------------------------------------------------

#[derive(Decode, Debug, Default)]
struct Database {
    #[pathfig(cfg = "url,required", env = "DATABASE_URL,required")]
    url: String,
    #[pathfig(cfg = "pool.size,default=5", env = "DATABASE_POOL_SIZE,default=5")]
    pool_size: u32,
}

#[test]
fn same_struct_from_nested_and_flat_sources() {
    let nested = config(r#"{"db": {"url": "postgres://nested", "pool": {"size": 20}}}"#);
    let mut db = Database::default();
    nested
        .decode_with(&mut db, DecodeOptions::default().from_prefix("db"))
        .unwrap();
    assert_eq!(db.url, "postgres://nested");
    assert_eq!(db.pool_size, 20);

    let mut flat = ConfigSet::with_tag("env");
    flat.load_value(
        Value::from_iter([("DATABASE_URL", "postgres://flat")]),
        LoadOptions::default(),
    )
    .unwrap();
    let mut db = Database::default();
    flat.decode(&mut db).unwrap();
    assert_eq!(db.url, "postgres://flat");
    assert_eq!(db.pool_size, 5);
}

#[test]
fn generic_struct() {
    #[derive(Decode, Default)]
    struct Pair<T> {
        #[pathfig(cfg = "left")]
        left: T,
        #[pathfig(cfg = "right")]
        right: T,
    }

    let set = config(r#"{"left": "1", "right": 2}"#);
    let mut pair: Pair<u64> = Pair::default();
    set.strict_decode(&mut pair).unwrap();
    assert_eq!((pair.left, pair.right), (1, 2));
}

#[test]
fn concurrent_decodes_share_the_set() {
    let set = config(PRIMITIVES);
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut target = Primitives::default();
                set.decode(&mut target).unwrap();
                assert_eq!(target.name, "efes");
            });
        }
    });
}
