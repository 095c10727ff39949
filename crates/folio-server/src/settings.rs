//! Configuration layer: typed settings with layered precedence (defaults → file → env).

use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::cache::{CacheRegion, CacheSettings, RegionSettings};
use crate::service::DEFAULT_STORE_TIMEOUT;

const LOCAL_CONFIG_BASENAME: &str = "folio";
const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG";
const ENV_PREFIX: &str = "FOLIO";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CACHE_OPERATION_TIMEOUT_MS: u64 = 250;

/// Settings resueltas y validadas del servidor.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub store: StoreSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Fallback level when `RUST_LOG` is not set.
    pub level: LevelFilter,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Deadline applied to every store call.
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: String, reason: String },
}

impl LoadError {
    fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence.
///
/// Sources, lowest precedence first: built-in defaults, `folio.toml` in the
/// working directory, the file named by `FOLIO_CONFIG` (must exist if set),
/// then `FOLIO__SECTION__KEY` environment variables.
pub fn load() -> Result<Settings, LoadError> {
    let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    load_from(path.as_deref())
}

/// Same as [`load`] with an explicit configuration file.
pub fn load_from(path: Option<&Path>) -> Result<Settings, LoadError> {
    let mut builder =
        Config::builder().add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    from_builder(builder)
}

fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Settings, LoadError> {
    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    store: RawStoreSettings,
    cache: RawCacheSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStoreSettings {
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCacheSettings {
    operation_timeout_ms: Option<u64>,
    regions: HashMap<String, RawRegionSettings>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRegionSettings {
    ttl_seconds: Option<u64>,
    max_capacity: Option<u64>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            store,
            cache,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            store: build_store_settings(store)?,
            cache: build_cache_settings(cache)?,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            },
            logging: LoggingSettings {
                level: LevelFilter::INFO,
                json: false,
            },
            store: StoreSettings {
                timeout: DEFAULT_STORE_TIMEOUT,
            },
            cache: CacheSettings::default(),
        }
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = server.port.unwrap_or(DEFAULT_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let ip = IpAddr::from_str(host.trim())
        .map_err(|err| LoadError::invalid("server.host", format!("invalid address: {err}")))?;

    Ok(ServerSettings {
        addr: SocketAddr::new(ip, port),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    Ok(LoggingSettings {
        level,
        json: logging.json.unwrap_or(false),
    })
}

fn build_store_settings(store: RawStoreSettings) -> Result<StoreSettings, LoadError> {
    let timeout = match store.timeout_ms {
        Some(0) => {
            return Err(LoadError::invalid(
                "store.timeout_ms",
                "must be greater than zero",
            ));
        }
        Some(ms) => Duration::from_millis(ms),
        None => DEFAULT_STORE_TIMEOUT,
    };

    Ok(StoreSettings { timeout })
}

fn build_cache_settings(cache: RawCacheSettings) -> Result<CacheSettings, LoadError> {
    let operation_timeout_ms = cache
        .operation_timeout_ms
        .unwrap_or(DEFAULT_CACHE_OPERATION_TIMEOUT_MS);
    if operation_timeout_ms == 0 {
        return Err(LoadError::invalid(
            "cache.operation_timeout_ms",
            "must be greater than zero",
        ));
    }

    let mut settings = CacheSettings {
        operation_timeout: Duration::from_millis(operation_timeout_ms),
        ..CacheSettings::default()
    };

    for (name, raw) in cache.regions {
        // Environment keys arrive lowercased
        let region = CacheRegion::ALL
            .into_iter()
            .find(|region| region.name().eq_ignore_ascii_case(&name))
            .ok_or_else(|| {
                LoadError::invalid(format!("cache.regions.{name}"), "unknown cache region")
            })?;

        *settings.region_mut(region) = build_region_settings(&name, raw)?;
    }

    Ok(settings)
}

fn build_region_settings(name: &str, raw: RawRegionSettings) -> Result<RegionSettings, LoadError> {
    let defaults = RegionSettings::default();

    let ttl = match raw.ttl_seconds {
        Some(0) => {
            return Err(LoadError::invalid(
                format!("cache.regions.{name}.ttl_seconds"),
                "must be greater than zero",
            ));
        }
        Some(secs) => Duration::from_secs(secs),
        None => defaults.ttl,
    };

    let max_capacity = match raw.max_capacity {
        Some(0) => {
            return Err(LoadError::invalid(
                format!("cache.regions.{name}.max_capacity"),
                "must be greater than zero",
            ));
        }
        Some(capacity) => capacity,
        None => defaults.max_capacity,
    };

    Ok(RegionSettings { ttl, max_capacity })
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(source: &str) -> Result<Settings, LoadError> {
        from_builder(Config::builder().add_source(File::from_str(source, FileFormat::Toml)))
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

        assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
        assert_eq!(settings.logging.level, LevelFilter::INFO);
        assert!(!settings.logging.json);
        assert_eq!(settings.store.timeout, DEFAULT_STORE_TIMEOUT);
        assert_eq!(settings.cache, CacheSettings::default());
    }

    #[test]
    fn toml_overrides_every_section() {
        let settings = from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9090

            [logging]
            level = "debug"
            json = true

            [store]
            timeout_ms = 1500

            [cache]
            operation_timeout_ms = 100

            [cache.regions.booksByCategory]
            ttl_seconds = 60
            max_capacity = 500

            [cache.regions.bookByTitleAndAuthor]
            ttl_seconds = 120
            "#,
        )
        .expect("valid settings");

        assert_eq!(settings.server.addr, "127.0.0.1:9090".parse().unwrap());
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
        assert!(settings.logging.json);
        assert_eq!(settings.store.timeout, Duration::from_millis(1500));
        assert_eq!(settings.cache.operation_timeout, Duration::from_millis(100));
        assert_eq!(settings.cache.books_by_category.ttl, Duration::from_secs(60));
        assert_eq!(settings.cache.books_by_category.max_capacity, 500);
        assert_eq!(
            settings.cache.book_by_title_and_author.ttl,
            Duration::from_secs(120)
        );
        assert_eq!(
            settings.cache.book_by_title_and_author.max_capacity,
            RegionSettings::default().max_capacity
        );
    }

    #[test]
    fn region_names_match_case_insensitively() {
        let mut raw = RawSettings::default();
        raw.cache.regions.insert(
            "booksbycategory".to_string(),
            RawRegionSettings {
                ttl_seconds: Some(42),
                max_capacity: None,
            },
        );

        let settings = Settings::from_raw(raw).expect("valid settings");
        assert_eq!(settings.cache.books_by_category.ttl, Duration::from_secs(42));
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let err = from_toml(
            r#"
            [cache.regions.booksByCategory]
            ttl_seconds = 0
            "#,
        )
        .unwrap_err();

        match err {
            LoadError::Invalid { key, .. } => {
                assert!(key.starts_with("cache.regions."));
                assert!(key.ends_with(".ttl_seconds"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_region_is_rejected() {
        let err = from_toml(
            r#"
            [cache.regions.booksByPublisher]
            ttl_seconds = 10
            "#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("unknown cache region"));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let mut raw = RawSettings::default();
        raw.logging.level = Some("loud".to_string());

        let err = Settings::from_raw(raw).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { ref key, .. } if key == "logging.level"));
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut raw = RawSettings::default();
        raw.server.port = Some(0);

        assert!(Settings::from_raw(raw).is_err());
    }

    #[test]
    fn zero_store_timeout_is_rejected() {
        let mut raw = RawSettings::default();
        raw.store.timeout_ms = Some(0);

        assert!(Settings::from_raw(raw).is_err());
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load_from(Some(Path::new("/nonexistent/folio-settings.toml")));
        assert!(matches!(result, Err(LoadError::Build(_))));
    }
}
