use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Runtime configuration, resolved once from defaults and `TEMPLE_*` env vars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Master key for private cookies. Must be at least 64 bytes.
    /// When unset a random key is generated and sessions end on restart.
    pub cookie_secret: Option<String>,
    pub insecure_cookie: bool,
    pub db_max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:temple_management.db".to_string(),
            listen_addr: "0.0.0.0:5000".to_string(),
            loglevel: "info".to_string(),
            cookie_secret: None,
            insecure_cookie: false,
            db_max_connections: 5,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("TEMPLE_"))
            .extract()
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});

/// Catalog seeded into an empty `items` table at startup.
pub const DEFAULT_ITEMS: [&str; 18] = [
    "Prasad 1",
    "Prasad 2",
    "Prasad 3",
    "Prasad 4",
    "Prasad 5",
    "Prasad 6",
    "Prasad 7",
    "Prasad 8",
    "Prasad 9",
    "Prasad 10",
    "Prasad 11",
    "Prasad 12",
    "Prasad 13",
    "Prasad 14",
    "Prasad 15",
    "Prasad 16",
    "Prasad 17",
    "Prasad 18",
];

/// Number of devotees shown by the top-devotees report before "Others".
pub const TOP_DEVOTEES_LIMIT: i64 = 10;
