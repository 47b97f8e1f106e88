use std::env;
use std::path::PathBuf;

const RC_FILE: &str = ".smallshrc";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub rc_path: PathBuf,
}

impl ConfigPaths {
    /// `None` when there is no home directory to look in.
    pub fn new() -> Option<Self> {
        let home = env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir)?;

        Some(ConfigPaths {
            rc_path: home.join(RC_FILE),
        })
    }
}
