//! Calibration configuration for loopscore
//!
//! Every field defaults to the named constant it mirrors, so an empty file is
//! the default calibration. Lookup order: explicit path, `./loopscore.toml`,
//! then `config.toml` in the global config directory.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::bail_config;
use crate::error::{LoopscoreError, Result};

pub use types::{CalibrationConfig, ScoringCalibration, SegmentCalibration};

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = "loopscore.toml";

const CONFIG_DIR: &str = "loopscore";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "LOOPSCORE_CONFIG_DIR";

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in defaults, no file found
    Defaults,
    /// Loaded from this file
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Defaults => write!(f, "built-in defaults"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl CalibrationConfig {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| LoopscoreError::io_operation("read config", path.display(), e))?;
        let config: CalibrationConfig =
            toml::from_str(&content).map_err(|e| LoopscoreError::invalid_config(path, e))?;

        config.validate(path)?;
        Ok(config)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit path must exist; discovered files are optional.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit {
            let config = Self::load(path)?;
            return Ok((config, ConfigSource::File(path.to_path_buf())));
        }

        let local = cwd.join(LOCAL_CONFIG_FILE);
        if local.is_file() {
            let config = Self::load(&local)?;
            return Ok((config, ConfigSource::File(local)));
        }

        if let Some(global) = global_config_path() {
            if global.is_file() {
                let config = Self::load(&global)?;
                return Ok((config, ConfigSource::File(global)));
            }
        }

        debug!("no calibration file found, using defaults");
        Ok((Self::default(), ConfigSource::Defaults))
    }

    /// Reject calibrations that would break the scoring contracts
    pub fn validate(&self, path: &Path) -> Result<()> {
        let seg = &self.segment;
        let sc = &self.scoring;

        let finite = [
            ("segment.base_quality", seg.base_quality),
            ("segment.structure_bonus", seg.structure_bonus),
            ("segment.coherence_bonus", seg.coherence_bonus),
            ("segment.content_bonus", seg.content_bonus),
            ("segment.length_bonus_max", seg.length_bonus_max),
            ("segment.trivial_length_penalty", seg.trivial_length_penalty),
            ("segment.recovery_threshold", seg.recovery_threshold),
            ("segment.tail_fraction", seg.tail_fraction),
            ("scoring.efficiency_penalty", sc.efficiency_penalty),
            ("scoring.min_recovery_floor", sc.min_recovery_floor),
            ("scoring.failure_score_cap", sc.failure_score_cap),
            ("scoring.max_score", sc.max_score),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                bail_config!(path, format!("{} must be finite, got {}", name, value));
            }
        }

        let non_negative = [
            ("segment.structure_bonus", seg.structure_bonus),
            ("segment.coherence_bonus", seg.coherence_bonus),
            ("segment.content_bonus", seg.content_bonus),
            ("segment.length_bonus_max", seg.length_bonus_max),
            ("segment.trivial_length_penalty", seg.trivial_length_penalty),
            ("scoring.efficiency_penalty", sc.efficiency_penalty),
            ("scoring.min_recovery_floor", sc.min_recovery_floor),
            ("scoring.failure_score_cap", sc.failure_score_cap),
        ];
        for (name, value) in non_negative {
            if value < 0.0 {
                bail_config!(path, format!("{} must be non-negative, got {}", name, value));
            }
        }

        if !(1..=3).contains(&seg.min_recovery_indicators) {
            bail_config!(
                path,
                format!(
                    "segment.min_recovery_indicators must be between 1 and 3, got {}",
                    seg.min_recovery_indicators
                )
            );
        }

        if seg.tail_fraction <= 0.0 || seg.tail_fraction > 1.0 {
            bail_config!(
                path,
                format!(
                    "segment.tail_fraction must be in (0, 1], got {}",
                    seg.tail_fraction
                )
            );
        }

        if sc.max_score > 100.0 {
            bail_config!(
                path,
                format!("scoring.max_score must not exceed 100, got {}", sc.max_score)
            );
        }

        if sc.min_recovery_floor > sc.max_score || sc.failure_score_cap > sc.max_score {
            bail_config!(
                path,
                "scoring.min_recovery_floor and scoring.failure_score_cap must not exceed scoring.max_score"
            );
        }

        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| LoopscoreError::Other(format!("failed to serialize config: {}", e)))
    }
}

/// Global config file location, honoring the directory override variable
fn global_config_path() -> Option<PathBuf> {
    let dir = match std::env::var(CONFIG_DIR_ENV_VAR) {
        Ok(env_dir) => PathBuf::from(env_dir),
        Err(_) => dirs::config_dir()?.join(CONFIG_DIR),
    };
    Some(dir.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{scoring, segment};
    use tempfile::tempdir;

    #[test]
    fn test_default_config_mirrors_constants() {
        let config = CalibrationConfig::default();
        assert_eq!(config.segment.base_quality, segment::BASE_QUALITY);
        assert_eq!(config.segment.recovery_threshold, 70.0);
        assert_eq!(config.segment.min_recovery_indicators, 2);
        assert_eq!(config.scoring.efficiency_penalty, scoring::EFFICIENCY_PENALTY);
        assert_eq!(config.scoring.min_recovery_floor, 15.0);
        assert_eq!(config.scoring.failure_score_cap, 10.0);
    }

    #[test]
    fn test_empty_file_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loopscore.toml");
        fs::write(&path, "").unwrap();

        let loaded = CalibrationConfig::load(&path).unwrap();
        assert_eq!(loaded, CalibrationConfig::default());
    }

    #[test]
    fn test_partial_file_overrides_one_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loopscore.toml");
        fs::write(&path, "[scoring]\nefficiency_penalty = 8.0\n").unwrap();

        let loaded = CalibrationConfig::load(&path).unwrap();
        assert_eq!(loaded.scoring.efficiency_penalty, 8.0);
        assert_eq!(loaded.scoring.min_recovery_floor, scoring::MIN_RECOVERY_FLOOR);
        assert_eq!(loaded.segment, SegmentCalibration::default());
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loopscore.toml");

        let mut config = CalibrationConfig::default();
        config.segment.tail_fraction = 0.5;
        fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        assert_eq!(CalibrationConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_floor_above_ceiling_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loopscore.toml");
        fs::write(&path, "[scoring]\nmin_recovery_floor = 99.0\nmax_score = 90.0\n").unwrap();

        let err = CalibrationConfig::load(&path).unwrap_err();
        assert!(matches!(err, LoopscoreError::InvalidConfig { .. }));
    }

    #[test]
    fn test_indicator_requirement_out_of_range_is_rejected() {
        let mut config = CalibrationConfig::default();
        config.segment.min_recovery_indicators = 4;
        assert!(config.validate(Path::new("x.toml")).is_err());
    }

    #[test]
    fn test_negative_penalty_is_rejected() {
        let mut config = CalibrationConfig::default();
        config.scoring.efficiency_penalty = -1.0;
        assert!(config.validate(Path::new("x.toml")).is_err());
    }

    #[test]
    fn test_malformed_toml_is_data_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("loopscore.toml");
        fs::write(&path, "[scoring\n").unwrap();

        let err = CalibrationConfig::load(&path).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::ExitCode::Data);
    }

    #[test]
    fn test_discover_prefers_explicit_then_local() {
        let dir = tempdir().unwrap();
        let local = dir.path().join(LOCAL_CONFIG_FILE);
        fs::write(&local, "[segment]\ntail_fraction = 0.5\n").unwrap();

        let (config, source) = CalibrationConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.segment.tail_fraction, 0.5);
        assert_eq!(source, ConfigSource::File(local));

        let explicit = dir.path().join("other.toml");
        fs::write(&explicit, "[segment]\ntail_fraction = 1.0\n").unwrap();
        let (config, source) =
            CalibrationConfig::discover(Some(&explicit), dir.path()).unwrap();
        assert_eq!(config.segment.tail_fraction, 1.0);
        assert_eq!(source, ConfigSource::File(explicit));
    }

    #[test]
    fn test_discover_missing_explicit_file_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(CalibrationConfig::discover(Some(&missing), dir.path()).is_err());
    }
}
