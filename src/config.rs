use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml;

use error::{Error, Result};

pub const USAGE: &str = "Usage: ./husrm <input_file> <min_utility> [output_file]\n       ./husrm --config <config.yaml>";

/// Settings for one mining run. Every field may be left out of a YAML file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Dataset with one sequence per line.
    pub input: PathBuf,
    /// Receives one line per rule, truncated at the start of a run.
    pub output: PathBuf,
    /// One line is appended per run.
    pub execution_log: PathBuf,
    pub min_utility: f64,
    /// Also print every rule to stdout.
    pub echo_rules: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: PathBuf::from("test.txt"),
            output: PathBuf::from("output.txt"),
            execution_log: PathBuf::from("execution_log.txt"),
            min_utility: 65.0,
            echo_rules: true,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        let yaml = fs::read_to_string(path).map_err(Error::io("read", path))?;
        let config: Config = serde_yaml::from_str(&yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a config from command line arguments, program name excluded.
    pub fn from_args(args: &[String]) -> Result<Config> {
        let config = match args.len() {
            2 if args[0] == "--config" => return Config::from_file(Path::new(&args[1])),
            2 | 3 => {
                let mut config = Config {
                    input: PathBuf::from(&args[0]),
                    min_utility: parse_threshold(&args[1])?,
                    ..Config::default()
                };
                if let Some(output) = args.get(2) {
                    config.output = PathBuf::from(output);
                }
                config
            }
            _ => return Err(Error::Usage(format!("expected 2 or 3 arguments, got {}", args.len()))),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.min_utility.is_finite() {
            return Err(Error::InvalidThreshold(self.min_utility.to_string()));
        }
        Ok(())
    }
}

fn parse_threshold(value: &str) -> Result<f64> {
    value
        .parse()
        .map_err(|_| Error::InvalidThreshold(value.to_string()))
}
