use std::{fs, io, path::Path};

use super::{Config, ConfigError};

/// Reads `key = value` settings files. Blank lines and `#` comments are
/// skipped; unknown keys are warned about and ignored.
#[derive(Default)]
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn new() -> Self {
        Self
    }

    pub fn load_file(&self, path: &Path, config: &mut Config) -> Result<(), ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => {
                ConfigError::ConfigFileNotFound(path.to_string_lossy().to_string())
            }
            _ => ConfigError::IoError(e),
        })?;
        log::debug!("loading settings from {}", path.display());
        self.load_str(&content, config)
    }

    fn load_str(&self, content: &str, config: &mut Config) -> Result<(), ConfigError> {
        for (index, line) in content.lines().enumerate() {
            self.process_line(index + 1, line, config)?;
        }
        Ok(())
    }

    fn process_line(&self, number: usize, line: &str, config: &mut Config) -> Result<(), ConfigError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let (key, value) = line.split_once('=').ok_or_else(|| ConfigError::Syntax {
            line: number,
            content: line.to_string(),
        })?;

        match config.set(key.trim(), value.trim()) {
            Err(ConfigError::UnknownKey(key)) => {
                log::warn!("ignoring unknown setting {:?} on line {}", key, number);
                Ok(())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_str() {
        let content = r#"
            # shell settings
            prompt = "> "
            max_jobs=12

            line_limit = 100
            colour = always
        "#;
        let mut config = Config::new();
        ConfigLoader::new().load_str(content, &mut config).unwrap();

        assert_eq!(config.prompt, "> ");
        assert_eq!(config.max_jobs, 12);
        assert_eq!(config.line_limit, 100);
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let mut config = Config::new();
        let result = ConfigLoader::new().load_str("prompt = x\njust words\n", &mut config);
        assert!(matches!(result, Err(ConfigError::Syntax { line: 2, .. })));
    }

    #[test]
    fn test_load_file() {
        let file_path = env::temp_dir().join(format!("smallshrc-{}", std::process::id()));
        fs::write(&file_path, "max_jobs = 2\n").unwrap();

        let mut config = Config::new();
        ConfigLoader::new().load_file(&file_path, &mut config).unwrap();
        assert_eq!(config.max_jobs, 2);

        let _ = fs::remove_file(file_path);
    }
}
