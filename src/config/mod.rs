//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `COPYLESS_*` environment variables.
//! The scoring engine only ever sees the [`EngineConfig`] value built here.

pub mod engine;
pub mod error;

#[cfg(test)]
mod tests;

pub use engine::EngineConfig;
pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_CORPUS_PATH, DEFAULT_MAX_CHUNKS_PER_PAGE, DEFAULT_MAX_SEARCH_RESULTS,
};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `COPYLESS_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Reference corpus file. Default: `./corpus/fixed_corpus.txt`.
    pub corpus_path: PathBuf,

    /// Directory holding `config.json`, `model.safetensors` and `tokenizer.json`.
    /// When unset the embedder runs in stub mode.
    pub model_path: Option<PathBuf>,

    /// Scoring-engine parameters.
    pub engine: EngineConfig,

    /// Serper API key. Web comparison returns nothing without it.
    pub serper_api_key: Option<String>,

    /// Organic results requested per web search. Default: `5`.
    pub max_search_results: usize,

    /// Paragraph chunks embedded per fetched page. Default: `10`.
    pub max_chunks_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            corpus_path: PathBuf::from(DEFAULT_CORPUS_PATH),
            model_path: None,
            engine: EngineConfig::default(),
            serper_api_key: None,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            max_chunks_per_page: DEFAULT_MAX_CHUNKS_PER_PAGE,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "COPYLESS_PORT";
    const ENV_BIND_ADDR: &'static str = "COPYLESS_BIND_ADDR";
    const ENV_CORPUS_PATH: &'static str = "COPYLESS_CORPUS_PATH";
    const ENV_MODEL_PATH: &'static str = "COPYLESS_MODEL_PATH";
    const ENV_MODEL_ID: &'static str = "COPYLESS_MODEL_ID";
    const ENV_PERMUTATIONS: &'static str = "COPYLESS_LSH_PERMUTATIONS";
    const ENV_LSH_THRESHOLD: &'static str = "COPYLESS_LSH_THRESHOLD";
    const ENV_K_SEMANTIC: &'static str = "COPYLESS_K_SEMANTIC";
    const ENV_K_LEXICAL: &'static str = "COPYLESS_K_LEXICAL";
    const ENV_WEIGHT_LEXICAL: &'static str = "COPYLESS_WEIGHT_LEXICAL";
    const ENV_WEIGHT_SEMANTIC: &'static str = "COPYLESS_WEIGHT_SEMANTIC";
    const ENV_SERPER_API_KEY: &'static str = "COPYLESS_SERPER_API_KEY";
    const ENV_SERPER_API_KEY_BARE: &'static str = "SERPER_API_KEY";
    const ENV_MAX_SEARCH_RESULTS: &'static str = "COPYLESS_MAX_SEARCH_RESULTS";
    const ENV_MAX_CHUNKS_PER_PAGE: &'static str = "COPYLESS_MAX_CHUNKS_PER_PAGE";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let engine_defaults = defaults.engine.clone();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let corpus_path = Self::parse_path_from_env(Self::ENV_CORPUS_PATH, defaults.corpus_path);
        let model_path = Self::parse_optional_path_from_env(Self::ENV_MODEL_PATH);

        let engine = EngineConfig {
            permutations: Self::parse_from_env(
                Self::ENV_PERMUTATIONS,
                engine_defaults.permutations,
            )?,
            lsh_threshold: Self::parse_from_env(
                Self::ENV_LSH_THRESHOLD,
                engine_defaults.lsh_threshold,
            )?,
            k_semantic: Self::parse_from_env(Self::ENV_K_SEMANTIC, engine_defaults.k_semantic)?,
            k_lexical: Self::parse_from_env(Self::ENV_K_LEXICAL, engine_defaults.k_lexical)?,
            weight_lexical: Self::parse_from_env(
                Self::ENV_WEIGHT_LEXICAL,
                engine_defaults.weight_lexical,
            )?,
            weight_semantic: Self::parse_from_env(
                Self::ENV_WEIGHT_SEMANTIC,
                engine_defaults.weight_semantic,
            )?,
            embedding_model_id: Self::parse_string_from_env(
                Self::ENV_MODEL_ID,
                engine_defaults.embedding_model_id,
            ),
        };

        let serper_api_key = Self::parse_optional_string_from_env(Self::ENV_SERPER_API_KEY)
            .or_else(|| Self::parse_optional_string_from_env(Self::ENV_SERPER_API_KEY_BARE));

        let max_search_results =
            Self::parse_from_env(Self::ENV_MAX_SEARCH_RESULTS, defaults.max_search_results)?;
        let max_chunks_per_page =
            Self::parse_from_env(Self::ENV_MAX_CHUNKS_PER_PAGE, defaults.max_chunks_per_page)?;

        Ok(Self {
            port,
            bind_addr,
            corpus_path,
            model_path,
            engine,
            serper_api_key,
            max_search_results,
            max_chunks_per_page,
        })
    }

    /// Validates engine ranges and the model directory.
    ///
    /// A missing corpus file is deliberately not an error here: the service reports
    /// itself not-ready instead of refusing to start.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;

        if let Some(ref path) = self.model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.corpus_path.is_dir() {
            return Err(ConfigError::NotAFile {
                path: self.corpus_path.clone(),
            });
        }

        Ok(())
    }

    /// Returns the engine parameters.
    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_from_env<T>(name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match env::var(name) {
            Ok(value) if !value.trim().is_empty() => {
                value
                    .trim()
                    .parse()
                    .map_err(|e: T::Err| ConfigError::InvalidValue {
                        name,
                        value: value.clone(),
                        reason: e.to_string(),
                    })
            }
            _ => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }
}
