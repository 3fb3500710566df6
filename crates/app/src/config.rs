//! Environment configuration

use std::path::PathBuf;

const DATA_DIR_VAR: &str = "TASKS_DATA_DIR";
const IN_MEMORY_VAR: &str = "TASKS_IN_MEMORY";
const DEFAULT_DATA_DIR: &str = ".tasks-data";
const DATABASE_FILE: &str = "tasks.db";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the task database
    pub data_dir: PathBuf,
    /// Keep tasks in memory only
    pub in_memory: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        Self {
            data_dir,
            in_memory: parse_flag(lookup(IN_MEMORY_VAR), false),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }
}

fn parse_flag(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.data_dir, PathBuf::from(".tasks-data"));
        assert!(!config.in_memory);
        assert_eq!(config.database_path(), PathBuf::from(".tasks-data/tasks.db"));
    }

    #[test]
    fn test_reads_overrides() {
        let config = config_from(&[("TASKS_DATA_DIR", "/var/lib/tasks"), ("TASKS_IN_MEMORY", "Yes")]);
        assert_eq!(config.database_path(), PathBuf::from("/var/lib/tasks/tasks.db"));
        assert!(config.in_memory);
    }

    #[test]
    fn test_flag_parsing() {
        assert!(parse_flag(Some(" on ".to_string()), false));
        assert!(!parse_flag(Some("0".to_string()), true));
        assert!(parse_flag(Some("maybe".to_string()), true));
        assert!(!parse_flag(None, false));
    }
}
