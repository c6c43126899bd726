pub mod schema;

use schema::{ConfigSchemaError, Validate};
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

pub use schema::ConfigModel;

/// Errors related to loading and parsing the bootstrap configuration.
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {reason}")]
    CannotReadFile { path: PathBuf, reason: String },

    /// TOML could not be parsed into the expected structure.
    #[error("toml error: {0}")]
    CannotParseToml(String),

    #[error("toml serialize error: {0}")]
    CannotSerialize(String),

    /// A section required by the requested entry point is absent.
    #[error("missing config value: {0}")]
    Missing(&'static str),

    /// Wrapper for data schema-level errors.
    #[error(transparent)]
    ConfigSchema(#[from] ConfigSchemaError),
}

///
/// Config
///

pub struct Config;

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml(config_str: &str) -> Result<ConfigModel, ConfigError> {
        let config: ConfigModel =
            toml::from_str(config_str).map_err(|e| ConfigError::CannotParseToml(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<ConfigModel, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::CannotReadFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        Self::from_toml(&raw)
    }

    /// Render a config back to TOML.
    pub fn to_toml(config: &ConfigModel) -> Result<String, ConfigError> {
        toml::to_string_pretty(config).map_err(|e| ConfigError::CannotSerialize(e.to_string()))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        [chain]
        endpoints = ["ws://127.0.0.1:9944"]
        network_id = 42

        [signer]
        seed = "//Alice"

        [log]
        level = "debug"

        [bootstrap]
        boot_nodes = [0, 1, 2]
        joins = [1, 2]

        [[bootstrap.validators]]
        name = "node0"
        validator_id = "0x0101010101010101010101010101010101010101010101010101010101010101"
        p2p_id = "0x0202020202020202020202020202020202020202020202020202020202020202"
        endpoint = { ipv4 = "192.168.110.205", port = 30110 }

        [[bootstrap.validators]]
        name = "node1"
        validator_id = "0x0303030303030303030303030303030303030303030303030303030303030303"
        p2p_id = "0x0404040404040404040404040404040404040404040404040404040404040404"
        endpoint = { ipv4 = "192.168.110.205", port = 30120 }

        [[bootstrap.validators]]
        name = "node2"
        validator_id = "0x0505050505050505050505050505050505050505050505050505050505050505"
        p2p_id = "0x0606060606060606060606060606060606060606060606060606060606060606"
        endpoint = { ipv4 = "192.168.110.205", port = 30130 }

        [workers]
        region = "defalut"

        [[workers.nodes]]
        name = "worker0"
        p2p_id = "0x0707070707070707070707070707070707070707070707070707070707070707"
        endpoint = { domain = "xiaobai.asyou.me", port = 10000 }
        level = 1

        [[workers.nodes.mortgages]]
        cpu = 10000
        mem = 10000
        disk = 1000000
        deposit = 10000000
    "#;

    #[test]
    fn full_document_parses_and_validates() {
        let cfg = Config::from_toml(FULL).expect("valid config");

        assert_eq!(cfg.chain.network_id, 42);
        assert_eq!(cfg.bootstrap.validators.len(), 3);
        assert_eq!(cfg.bootstrap.boot_nodes, vec![0, 1, 2]);

        let workers = cfg.workers.expect("workers section");
        assert_eq!(workers.nodes[0].mortgages[0].deposit, 10_000_000);
        assert_eq!(workers.nodes[0].mortgages[0].gpu, 0);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = Config::from_toml("[chain]\nendpoint = \"ws://x\"\n").unwrap_err();

        assert!(matches!(err, ConfigError::CannotParseToml(_)));
    }

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = Config::from_toml("").expect("defaults are valid");

        assert_eq!(cfg.signer.seed, "//Alice");
        assert!(cfg.chain.wait_finality);
        assert!(cfg.workers.is_none());
    }

    #[test]
    fn round_trips_through_toml() {
        let cfg = Config::from_toml(FULL).expect("valid config");
        let rendered = Config::to_toml(&cfg).expect("render");
        let back = Config::from_toml(&rendered).expect("reparse");

        assert_eq!(back.bootstrap.validators, cfg.bootstrap.validators);
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let err = Config::load("/nonexistent/bootstrap.toml").unwrap_err();

        assert!(err.to_string().contains("/nonexistent/bootstrap.toml"));
    }
}
