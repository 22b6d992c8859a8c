//! Runtime [`Config`] of the rental backend.

use std::time;

use common::Currency;
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use service::infra::postgres;
use smart_default::SmartDefault;

/// Prefix of environment variables overriding the [`Config`] file.
const ENV_PREFIX: &str = "RENTAL";

/// Everything the rental backend reads on startup.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP [`Server`] settings.
    pub server: Server,

    /// Business defaults of the rental [`Service`].
    pub service: Service,

    /// [`Postgres`] connection settings.
    pub postgres: Postgres,

    /// [`Log`] settings.
    pub log: Log,
}

impl Config {
    /// Assembles a [`Config`] from the following layers, each overriding the
    /// previous one:
    /// 1. built-in defaults;
    /// 2. the TOML file at `path`, if it exists;
    /// 3. `RENTAL_`-prefixed environment variables with `__` separating
    ///    nested keys, e.g. `RENTAL_POSTGRES__HOST=db`.
    ///
    /// # Errors
    ///
    /// If the file is malformed or any value has a wrong type.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}

/// HTTP server settings.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Address to listen on.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to listen on.
    #[default(8080)]
    pub port: u16,

    /// Cross-origin access to the API.
    pub cors: Cors,
}

/// [CORS] settings.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// Origins allowed to call the API, `*` meaning any.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// Business defaults of the rental service.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// [`Currency`] of period reports requested without one.
    #[default(Currency::Rub)]
    pub default_currency: Currency,

    /// How long a rental lasts when opened without a planned return moment,
    /// e.g. `"1day"` or `"36h"`.
    #[default(time::Duration::from_secs(24 * 60 * 60))]
    #[serde(with = "humantime_serde")]
    pub default_rental_duration: time::Duration,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        Self {
            default_currency: value.default_currency,
            default_rental_duration: value.default_rental_duration,
        }
    }
}

/// PostgreSQL connection settings.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Server address.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Server port.
    #[default(5432)]
    pub port: u16,

    /// Role to log in as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password of the [`Postgres::user`].
    #[default("postgres".to_owned())]
    pub password: String,

    /// Database holding the rental tables.
    #[default("postgres".to_owned())]
    pub dbname: String,

    /// Maximum number of pooled connections.
    #[default(16)]
    pub pool_size: usize,
}

impl From<Postgres> for postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
            pool_size,
        } = value;

        let mut conf = Self::new();
        conf.host = Some(host);
        conf.port = Some(port);
        conf.user = Some(user);
        conf.password = Some(password);
        conf.dbname = Some(dbname);
        conf.pool = Some(postgres::PoolConfig::new(pool_size));
        conf
    }
}

/// Logging settings.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Most verbose [`LogLevel`] to emit.
    pub level: LogLevel,
}

/// Verbosity of emitted log events.
///
/// `WARN` and `ERROR` events go to stderr, the rest go to stdout.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Every span and query.
    Trace,

    /// Command and query internals.
    Debug,

    /// Requests and business events.
    #[default]
    Info,

    /// Rejected operations and client mistakes.
    Warn,

    /// Failures only.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::Currency;

    use super::{Config, LogLevel};

    #[test]
    fn falls_back_to_defaults_without_file() {
        let conf = Config::new("definitely/missing/rental.toml")
            .expect("missing file is optional");

        assert_eq!(conf.server.port, 8080);
        assert_eq!(conf.server.cors.origins, vec!["*".to_owned()]);
        assert_eq!(conf.service.default_currency, Currency::Rub);
        assert_eq!(
            conf.service.default_rental_duration,
            Duration::from_secs(24 * 60 * 60),
        );
        assert_eq!(conf.postgres.pool_size, 16);
        assert!(matches!(conf.log.level, LogLevel::Info));
    }

    #[test]
    fn fills_missing_sections_with_defaults() {
        let path = std::env::temp_dir()
            .join(format!("rental-partial-{}.toml", std::process::id()));
        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();

        let conf = Config::new(path.to_str().unwrap());
        std::fs::remove_file(&path).unwrap();
        let conf = conf.expect("absent sections are defaulted");

        assert_eq!(conf.server.port, 9000);
        assert_eq!(conf.server.host, "0.0.0.0");
        assert_eq!(conf.service.default_currency, Currency::Rub);
        assert_eq!(conf.postgres.pool_size, 16);
        assert!(matches!(conf.log.level, LogLevel::Info));
    }

    #[test]
    fn converts_into_pool_config() {
        let conf = Config::default();

        let pg: service::infra::postgres::Config = conf.postgres.into();

        assert_eq!(pg.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(pg.port, Some(5432));
        assert_eq!(pg.pool.map(|p| p.max_size), Some(16));
    }
}
