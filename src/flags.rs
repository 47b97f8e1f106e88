use crate::error::ShellError;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct Flags {
    flags: BTreeMap<String, Flag>,
}

#[derive(Debug, Clone)]
pub struct Flag {
    pub short: String,
    pub long: String,
    pub description: String,
    pub takes_value: bool,
    pub value: Option<String>,
}

impl Flag {
    fn new(short: &str, long: &str, description: &str, takes_value: bool) -> Self {
        Flag {
            short: short.to_string(),
            long: long.to_string(),
            description: description.to_string(),
            takes_value,
            value: None,
        }
    }
}

impl Default for Flags {
    fn default() -> Self {
        Self::new()
    }
}

impl Flags {
    pub fn new() -> Self {
        let mut flags = BTreeMap::new();

        flags.insert(
            "help".to_string(),
            Flag::new("-h", "--help", "Print this help message", false),
        );
        flags.insert(
            "version".to_string(),
            Flag::new("-v", "--version", "Show version information", false),
        );
        flags.insert(
            "config".to_string(),
            Flag::new("-c", "--config", "Read settings from this file", true),
        );
        flags.insert(
            "quiet".to_string(),
            Flag::new("-q", "--quiet", "Do not print the prompt or exit notice", false),
        );
        flags.insert(
            "debug".to_string(),
            Flag::new("-d", "--debug", "Enable debug logging", false),
        );
        flags.insert(
            "max-jobs".to_string(),
            Flag::new("-j", "--max-jobs", "Maximum number of background jobs", true),
        );

        Flags { flags }
    }

    pub fn parse(&mut self, args: &[String]) -> Result<(), ShellError> {
        let mut args = args.iter();
        while let Some(arg) = args.next() {
            let flag = self
                .flags
                .values_mut()
                .find(|flag| arg == &flag.short || arg == &flag.long)
                .ok_or_else(|| ShellError::FlagError(format!("Unknown flag {}", arg)))?;

            if flag.takes_value {
                let value = args.next().ok_or_else(|| {
                    ShellError::FlagError(format!("Flag {} requires a value", arg))
                })?;
                flag.value = Some(value.clone());
            } else {
                flag.value = Some("true".to_string());
            }
        }
        Ok(())
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.flags
            .get(name)
            .and_then(|f| f.value.as_ref())
            .is_some()
    }

    pub fn get_value(&self, name: &str) -> Option<&String> {
        self.flags.get(name).and_then(|f| f.value.as_ref())
    }

    pub fn print_help(&self) {
        println!("Usage: smallsh [OPTIONS]");
        println!("\nOptions:");
        for flag in self.flags.values() {
            let long = if flag.takes_value {
                format!("{} <value>", flag.long)
            } else {
                flag.long.clone()
            };
            println!("  {}, {:<20} {}", flag.short, long, flag.description);
        }
    }
}
