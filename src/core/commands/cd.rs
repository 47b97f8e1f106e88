use super::{Command, CommandError, Flow};
use crate::core::state::ShellState;
use crate::path::PathExpander;
use std::env;

#[derive(Clone)]
pub struct CdCommand {
    path_expander: PathExpander,
}

impl Default for CdCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl CdCommand {
    pub fn new() -> Self {
        Self {
            path_expander: PathExpander::new(),
        }
    }
}

impl Command for CdCommand {
    fn execute(&self, args: &[String], _state: &mut ShellState) -> Result<Flow, CommandError> {
        let (shown, target) = match args.first() {
            Some(path) => {
                let cwd = env::current_dir()?;
                (path.clone(), self.path_expander.resolve(path, &cwd)?)
            }
            None => {
                let home = self.path_expander.get_home_dir()?;
                (home.to_string_lossy().into_owned(), home)
            }
        };

        env::set_current_dir(&target).map_err(|source| CommandError::Directory {
            path: shown,
            source,
        })?;
        log::debug!("changed directory to {}", target.display());
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    fn run(args: &[&str]) -> Result<Flow, CommandError> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        CdCommand::new().execute(&args, &mut ShellState::new(1))
    }

    #[test]
    #[serial]
    fn test_cd_home() {
        let start = env::current_dir().unwrap();
        run(&[env::temp_dir().to_str().unwrap()]).unwrap();

        assert_eq!(run(&[]).unwrap(), Flow::Continue);
        assert_eq!(
            env::current_dir().unwrap(),
            PathExpander::new().get_home_dir().unwrap().canonicalize().unwrap()
        );

        env::set_current_dir(start).unwrap();
    }

    #[test]
    #[serial]
    fn test_cd_relative_to_cwd() {
        let start = env::current_dir().unwrap();
        let base = env::temp_dir()
            .canonicalize()
            .unwrap()
            .join(format!("smallsh-cd-{}", std::process::id()));
        fs::create_dir_all(base.join("child")).unwrap();

        env::set_current_dir(&base).unwrap();
        run(&["child"]).unwrap();
        assert_eq!(env::current_dir().unwrap(), base.join("child"));

        run(&[".."]).unwrap();
        assert_eq!(env::current_dir().unwrap(), base);

        env::set_current_dir(start).unwrap();
        fs::remove_dir_all(base).unwrap();
    }

    #[test]
    #[serial]
    fn test_cd_invalid_leaves_cwd_unchanged() {
        let before = env::current_dir().unwrap();
        let result = run(&["/nonexistent/smallsh/path"]);

        match result {
            Err(CommandError::Directory { path, .. }) => {
                assert_eq!(path, "/nonexistent/smallsh/path");
            }
            other => panic!("expected a directory error, got {:?}", other),
        }
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
