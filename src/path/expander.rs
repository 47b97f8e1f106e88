use std::env;
use std::path::{Path, PathBuf};

use crate::core::commands::CommandError;

#[derive(Clone)]
pub struct PathExpander;

impl Default for PathExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl PathExpander {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `path` against `cwd`. A leading `~` or `~/` means the home
    /// directory; absolute paths are returned unchanged.
    pub fn resolve(&self, path: &str, cwd: &Path) -> Result<PathBuf, CommandError> {
        if path == "~" {
            return self.get_home_dir();
        }
        if let Some(rest) = path.strip_prefix("~/") {
            let mut home_path = self.get_home_dir()?;
            for part in rest.split('/').filter(|part| !part.is_empty()) {
                home_path.push(part);
            }
            return Ok(home_path);
        }
        // "~user" is left alone
        Ok(cwd.join(path))
    }

    /// `$HOME` if it is set and non-empty, otherwise whatever the platform
    /// reports for the current user.
    pub fn get_home_dir(&self) -> Result<PathBuf, CommandError> {
        match env::var_os("HOME") {
            Some(home) if !home.is_empty() => Ok(PathBuf::from(home)),
            _ => dirs::home_dir().ok_or(CommandError::HomeDirNotFound),
        }
    }
}
