//! YAML configuration file
//!
//! ```yaml
//! pins: [17, 27]
//! off: ["temperature:gt:30:and"]
//! on: ["temperature:lt:20:and"]
//! off_first: false
//! rpc:
//!   enabled: true
//!   listen: 0.0.0.0
//!   port: 15555
//! sensor:
//!   command: temper
//!   args: ["--json"]
//! interval_secs: 1
//! reset_on_exit: true
//! gpio_root: /sys/class/gpio
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{ConfigError, ConfigResult};

/// Query server section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RpcSection {
    pub enabled: bool,
    pub listen: Option<String>,
    pub port: Option<u16>,
}

/// Sensor reader section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorSection {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Contents of the configuration file; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub pins: Vec<u32>,
    pub off: Vec<String>,
    pub on: Vec<String>,
    pub off_first: bool,
    pub rpc: RpcSection,
    pub verbose: bool,
    pub sensor: Option<SensorSection>,
    pub interval_secs: Option<u64>,
    pub reset_on_exit: Option<bool>,
    pub gpio_root: Option<PathBuf>,
}

impl ConfigFile {
    /// The file named by `--config`, or an empty one
    pub fn for_cli(cli: &Cli) -> ConfigResult<Self> {
        match &cli.config {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Load and parse a configuration file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&contents, path)
    }

    /// Parse file contents; `path` is only used for error reporting
    pub fn parse(contents: &str, path: &Path) -> ConfigResult<Self> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(contents).map_err(|e| ConfigError::ParseYaml {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_full_file() {
        let file = ConfigFile::parse(
            r#"
pins: [17, 27]
off: ["temperature:gt:30:and"]
on: ["temperature:lt:20:and"]
off_first: true
rpc:
  enabled: true
  listen: 127.0.0.1
  port: 16000
sensor:
  command: temper
  args: ["--json", "--force", "413d:2107"]
interval_secs: 5
reset_on_exit: false
gpio_root: /tmp/gpio
"#,
            Path::new("rpioalert.yaml"),
        )
        .unwrap();

        assert_eq!(file.pins, vec![17, 27]);
        assert!(file.off_first);
        assert_eq!(
            file.rpc,
            RpcSection {
                enabled: true,
                listen: Some("127.0.0.1".to_string()),
                port: Some(16000),
            }
        );
        assert_eq!(file.sensor.unwrap().args.len(), 3);
        assert_eq!(file.interval_secs, Some(5));
        assert_eq!(file.reset_on_exit, Some(false));
        assert_eq!(file.gpio_root, Some(PathBuf::from("/tmp/gpio")));
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(
            ConfigFile::parse("   \n", Path::new("empty.yaml")).unwrap(),
            ConfigFile::default()
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = ConfigFile::parse("pinz: [17]\n", Path::new("typo.yaml"));
        assert!(matches!(result, Err(ConfigError::ParseYaml { .. })));
    }

    #[test]
    fn test_load_from_disk() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "pins: [4]\nverbose: true").unwrap();

        let file = ConfigFile::load(tmp.path()).unwrap();

        assert_eq!(file.pins, vec![4]);
        assert!(file.verbose);
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigFile::load("/nonexistent/rpioalert.yaml");
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
