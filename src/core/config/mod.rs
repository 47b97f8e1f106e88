use std::fmt;
use std::path::PathBuf;

mod loader;
mod paths;

use crate::flags::Flags;
use crate::process::jobs::DEFAULT_MAX_JOBS;
use loader::ConfigLoader;
use paths::ConfigPaths;

pub const DEFAULT_PROMPT: &str = ": ";
pub const DEFAULT_LINE_LIMIT: usize = 2048;

/// Runtime settings: built-in defaults, then the settings file, then flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub max_jobs: usize,
    pub line_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            max_jobs: DEFAULT_MAX_JOBS,
            line_limit: DEFAULT_LINE_LIMIT,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(flags: &Flags) -> Result<Self, ConfigError> {
        let mut config = Config::new();

        match flags.get_value("config") {
            // An explicitly requested file has to exist.
            Some(path) => ConfigLoader::new().load_file(&PathBuf::from(path), &mut config)?,
            None => {
                if let Some(paths) = ConfigPaths::new() {
                    if paths.rc_path.exists() {
                        ConfigLoader::new().load_file(&paths.rc_path, &mut config)?;
                    }
                }
            }
        }

        if let Some(value) = flags.get_value("max-jobs") {
            config.set("max_jobs", value)?;
        }

        log::debug!("effective config: {:?}", config);
        Ok(config)
    }

    /// Apply one `key = value` setting.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "prompt" => self.prompt = unquote(value).to_string(),
            "max_jobs" => self.max_jobs = parse_number(key, value, 1)?,
            "line_limit" => self.line_limit = parse_number(key, value, 2)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}

fn unquote(value: &str) -> &str {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

fn parse_number(key: &str, value: &str, min: usize) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(n) if n >= min => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ConfigFileNotFound(String),
    IoError(std::io::Error),
    UnknownKey(String),
    InvalidValue { key: String, value: String },
    Syntax { line: usize, content: String },
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::IoError(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ConfigFileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::UnknownKey(key) => write!(f, "unknown setting: {}", key),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {}: {:?}", key, value)
            }
            ConfigError::Syntax { line, content } => {
                write!(f, "line {}: expected key = value, found {:?}", line, content)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
