use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default)]
    pub database_dir: Option<PathBuf>,
    #[serde(default = "default_blastdbcmd")]
    pub blastdbcmd: String,
}

fn default_database() -> String {
    "nt".to_string()
}

fn default_blastdbcmd() -> String {
    "blastdbcmd".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            database_dir: None,
            blastdbcmd: default_blastdbcmd(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("com", "readsim", "readsim") {
            let config_dir = proj_dirs.config_dir();
            let config_path = config_dir.join("config.toml");

            if config_path.exists() {
                if let Ok(content) = fs::read_to_string(config_path) {
                    if let Ok(config) = toml::from_str(&content) {
                        return config;
                    }
                }
            }
        }
        Config::default()
    }

    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "readsim", "readsim") {
            let config_dir = proj_dirs.config_dir();
            fs::create_dir_all(config_dir)?;

            let config_path = config_dir.join("config.toml");
            let content = toml::to_string_pretty(self)?;
            fs::write(config_path, content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_the_nt_database() {
        let config = Config::default();
        assert_eq!(config.database, "nt");
        assert_eq!(config.blastdbcmd, "blastdbcmd");
        assert!(config.database_dir.is_none());
    }

    #[test]
    fn partial_config_files_fill_in_defaults() {
        let config: Config = toml::from_str(r#"database = "nt_prok""#).unwrap();
        assert_eq!(config.database, "nt_prok");
        assert_eq!(config.blastdbcmd, "blastdbcmd");
    }
}
