//! # mkl-config
//!
//! Layered configuration loading for `gen-mkl-rs` using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Command-line overrides
//! 2. Environment variables (`MKLGEN_*` prefix)
//! 3. Project-level `gen-mkl.toml`
//! 4. User-level `~/.config/gen-mkl/config.toml`
//! 5. Built-in defaults
//!
//! When no header is configured it is derived from `MKLROOT`
//! (`$MKLROOT/include/mkl.h`), falling back to the default oneAPI location.

mod error;
mod mode;

pub use error::ConfigError;
pub use mode::OutputMode;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing at an MKL installation.
pub const MKLROOT_VAR: &str = "MKLROOT";
/// Installation used when `MKLROOT` is unset.
pub const DEFAULT_MKLROOT: &str = "/opt/intel/oneapi/mkl/latest";
/// Project-local config file name.
pub const PROJECT_CONFIG_FILE: &str = "gen-mkl.toml";

fn default_provider_crate() -> String {
    "crate".to_string()
}

fn default_trait_name() -> String {
    "MKLRoutines".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Path to `mkl.h`. Derived from `MKLROOT` when unset.
    #[serde(default)]
    pub mkl_header: Option<PathBuf>,

    /// Path the generated `use` line imports from.
    #[serde(default = "default_provider_crate")]
    pub provider_crate: String,

    /// Name of the generated trait.
    #[serde(default = "default_trait_name")]
    pub trait_name: String,

    #[serde(default)]
    pub mode: OutputMode,

    /// Extra directories searched for `#include`d headers.
    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            mkl_header: None,
            provider_crate: default_provider_crate(),
            trait_name: default_trait_name(),
            mode: OutputMode::default(),
            include_dirs: Vec::new(),
        }
    }
}

/// Values given on the command line. `None` leaves lower layers in effect.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mkl_header: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_crate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trait_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<OutputMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_dirs: Option<Vec<PathBuf>>,
}

impl GeneratorConfig {
    /// Load configuration from all sources, command-line values on top.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a source fails to parse or a value is invalid.
    pub fn load(overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let config: Self = Self::figment()
            .merge(Serialized::defaults(overrides))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support, so `MKLROOT` can live
    /// in a project `.env`.
    ///
    /// # Errors
    /// Same as [`Self::load`].
    pub fn load_with_dotenv(overrides: &CliOverrides) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(overrides)
    }

    /// Build the figment provider chain without command-line overrides.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("MKLGEN_"))
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gen-mkl").join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.provider_crate.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "provider_crate".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !is_identifier(&self.trait_name) {
            return Err(ConfigError::InvalidValue {
                field: "trait_name".to_string(),
                reason: format!("'{}' is not a valid Rust identifier", self.trait_name),
            });
        }
        Ok(())
    }

    /// The header to parse: the configured path, else `$MKLROOT/include/mkl.h`,
    /// else the default oneAPI install.
    #[must_use]
    pub fn header_path(&self) -> PathBuf {
        let mkl_root = std::env::var(MKLROOT_VAR).ok();
        resolve_header_path(self.mkl_header.as_deref(), mkl_root.as_deref())
    }
}

/// Header path resolution, independent of the process environment.
#[must_use]
pub fn resolve_header_path(explicit: Option<&Path>, mkl_root: Option<&str>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let root = mkl_root.filter(|r| !r.is_empty()).unwrap_or(DEFAULT_MKLROOT);
    Path::new(root).join("include").join("mkl.h")
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
