use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::error::Error;

/// Settings read from a YAML file. Every field is optional in the file;
/// command-line flags override what the file sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub source_ext: String,
    pub output_ext: String,
    pub jobs: usize,
    pub combine: bool,
    pub strict: bool,
    pub output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_ext: "jack".to_string(),
            output_ext: "vm".to_string(),
            jobs: 1,
            combine: false,
            strict: false,
            output: None,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::FileRead(path.to_string(), e))?;
        serde_yaml::from_reader(BufReader::new(file)).map_err(|e| Error::Config(path.to_string(), e))
    }

    pub fn from_yaml(path: &str, text: &str) -> Result<Self, Error> {
        serde_yaml::from_str(text).map_err(|e| Error::Config(path.to_string(), e))
    }

    /// Worker count, never zero.
    pub fn workers(&self) -> usize {
        self.jobs.max(1)
    }
}
