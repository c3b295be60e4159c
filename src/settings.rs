use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::config::{CRITICAL_ANGLE_TOLERANCE, SINGULAR_TOLERANCE};

/// Numerical tolerances shared by the ray tracer and the exact solvers.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Settings {
    /// Relative conditioning `|det(M)| / prod(|row_i|)` below which a
    /// boundary-condition matrix is rejected as singular.
    #[serde(default = "default_singular_tolerance")]
    pub singular_tolerance: f64,
    /// Transmitted sines within this distance above 1 are grazing, not post-critical.
    #[serde(default = "default_critical_angle_tolerance")]
    pub critical_angle_tolerance: f64,
}

fn default_singular_tolerance() -> f64 {
    SINGULAR_TOLERANCE
}

fn default_critical_angle_tolerance() -> f64 {
    CRITICAL_ANGLE_TOLERANCE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            singular_tolerance: SINGULAR_TOLERANCE,
            critical_angle_tolerance: CRITICAL_ANGLE_TOLERANCE,
        }
    }
}

/// Load the settings shipped in `config/default.toml`.
pub fn load_default_config() -> Result<Settings> {
    let root = retrieve_project_root()?;
    let default_config_file = root.join("config/default.toml");

    let settings = Config::builder()
        .add_source(File::from(default_config_file.clone()).required(true))
        .build()
        .with_context(|| format!("failed to load {}", default_config_file.display()))?;

    let config: Settings = settings
        .try_deserialize()
        .context("failed to deserialize default configuration")?;

    validate_config(&config)?;

    Ok(config)
}

/// Load settings from `config/local.toml` if it exists, otherwise from
/// `config/default.toml`, then apply `REFLECTIVITY_*` environment overrides.
pub fn load_config() -> Result<Settings> {
    let root = retrieve_project_root()?;

    let default_config_file = root.join("config/default.toml");
    let local_config = root.join("config/local.toml");

    let config_file = if local_config.exists() {
        log::debug!("using local configuration: {:?}", local_config);
        local_config
    } else {
        log::debug!("using default configuration: {:?}", default_config_file);
        default_config_file
    };

    let settings = Config::builder()
        .add_source(File::from(config_file.clone()).required(true))
        .add_source(Environment::with_prefix("reflectivity"))
        .build()
        .with_context(|| format!("failed to load {}", config_file.display()))?;

    let config: Settings = settings
        .try_deserialize()
        .context("failed to deserialize configuration")?;

    validate_config(&config)?;

    log::debug!("{}", config);

    Ok(config)
}

/// Retrieve the project root directory.
/// This function tries to find the project root directory in different ways:
/// 1. If the CARGO_MANIFEST_DIR environment variable is set, use it.
/// 2. If the REFLECTIVITY_ROOT_DIR environment variable is set, use it.
/// 3. If the "config" subdirectory is found in the executable directory or any of its parents, use it.
fn retrieve_project_root() -> Result<PathBuf> {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        return Ok(PathBuf::from(manifest_dir));
    }
    if let Ok(path) = env::var("REFLECTIVITY_ROOT_DIR") {
        return Ok(PathBuf::from(path));
    }

    let exe_path = env::current_exe().context("failed to get current executable path")?;
    let mut current_dir = exe_path
        .parent()
        .context("failed to get executable directory")?
        .to_path_buf();

    loop {
        if current_dir.join("config").is_dir() {
            return Ok(current_dir);
        }
        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => anyhow::bail!("could not find project root directory"),
        }
    }
}

fn validate_config(config: &Settings) -> Result<()> {
    anyhow::ensure!(
        config.singular_tolerance.is_finite()
            && config.singular_tolerance > 0.0
            && config.singular_tolerance < 1.0,
        "singular tolerance must lie in (0, 1), got {}",
        config.singular_tolerance
    );
    anyhow::ensure!(
        config.critical_angle_tolerance.is_finite()
            && config.critical_angle_tolerance >= 0.0
            && config.critical_angle_tolerance < 1.0,
        "critical angle tolerance must lie in [0, 1), got {}",
        config.critical_angle_tolerance
    );
    Ok(())
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings:
  - Singular Tolerance: {:e}
  - Critical Angle Tolerance: {:e}
  ",
            self.singular_tolerance, self.critical_angle_tolerance,
        )
    }
}
