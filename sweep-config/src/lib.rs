//! Loader for tweet-sweep configuration with YAML + environment overlays.
//!
//! Sources, lowest precedence first: an optional or required YAML file, inline
//! YAML snippets, then `SWEEP__`-prefixed environment variables using `__` as the
//! nesting separator (`SWEEP__TWITTER__ACCESS_TOKEN` sets `twitter.access_token`).
//! String values may reference `${VAR}`; placeholders are expanded after merging.
//!
//! ```yaml
//! server:
//!   bind: "0.0.0.0:8080"
//! twitter:
//!   access_token: "${TWITTER_BEARER_TOKEN}"
//!   keyword: "API"
//!   handles: ["to:TwitterDev", "to:TwitterAPI", "to:prgaut"]
//!   timeout_secs: 15
//! logging:
//!   format: json
//! ```
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use sweep_common::LogFormat;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "SWEEP";

/// Key holding the bearer credential for the upstream search endpoint.
pub const ACCESS_TOKEN_KEY: &str = "twitter.access_token";

#[derive(Debug, Deserialize)]
pub struct SweepConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub server: ServerConfig,
    pub twitter: TwitterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            worker_threads: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TwitterConfig {
    pub access_token: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Falls back to the compiled-in keyword when absent.
    #[serde(default)]
    pub keyword: Option<String>,
    /// Falls back to the compiled-in account list when absent.
    #[serde(default)]
    pub handles: Option<Vec<String>>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: usize,
    #[serde(default)]
    pub max_results: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default = "default_true")]
    pub emit_stderr: bool,
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            emit_stderr: true,
            filter: default_filter(),
            dir: None,
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".into()
}
fn default_base_url() -> String {
    "https://api.twitter.com".into()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_true() -> bool {
    true
}
fn default_filter() -> String {
    "info".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct SweepConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for SweepConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepConfigLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Attach a file that must exist; format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be missing, for env-only deployments.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use sweep_config::SweepConfigLoader;
    ///
    /// let cfg = SweepConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "1"
    /// twitter:
    ///   access_token: "example"
    ///   handles: ["to:TwitterDev"]
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("1"));
    /// assert_eq!(cfg.twitter.timeout_secs, 15);
    /// assert_eq!(cfg.twitter.handles.as_deref().map(<[String]>::len), Some(1));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders, and deserialize.
    ///
    /// Environment overrides are layered last, so they win over any file.
    pub fn load(self) -> Result<SweepConfig, ConfigError> {
        let merged = self
            .builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("twitter.handles"),
            )
            .build()?;

        let mut v: Value = merged.try_deserialize()?;
        expand_env_in_value(&mut v);

        // Feed the expanded tree back through `config` so env-provided strings
        // still coerce into numbers and bools.
        let expanded =
            serde_json::to_string(&v).map_err(|e| ConfigError::Message(e.to_string()))?;
        let cfg = Config::builder()
            .add_source(File::from_str(&expanded, FileFormat::Json))
            .build()?;

        let token: String = cfg
            .get(ACCESS_TOKEN_KEY)
            .map_err(|_| ConfigError::NotFound(ACCESS_TOKEN_KEY.into()))?;
        validate_token(&token)?;

        cfg.try_deserialize()
    }
}

fn validate_token(token: &str) -> Result<(), ConfigError> {
    if token.trim().is_empty() {
        return Err(ConfigError::Message(format!("`{ACCESS_TOKEN_KEY}` is empty")));
    }
    if token.contains("${") {
        return Err(ConfigError::Message(format!(
            "`{ACCESS_TOKEN_KEY}` references an unset environment variable"
        )));
    }
    Ok(())
}
