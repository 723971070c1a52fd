use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api: Api,
    pub storage: Storage,
    pub log: Log,
}

#[derive(Debug, Deserialize)]
pub struct Api {
    pub backend: String, // "fake" or "real"
    pub base_url: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Unset means the transport's own default applies.
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
    pub backend: String, // "memory" or "file"
    #[serde(default = "default_storage_path")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

fn default_login_path() -> String {
    "/login/".to_string()
}

fn default_storage_path() -> String {
    ".careermatch/session.json".to_string()
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_bundled_settings() {
        let dev = parse_settings(Some("settings/dev.toml")).unwrap();
        assert_eq!(dev.api.backend, "fake");
        assert_eq!(dev.api.login_path, "/login/");
        assert_eq!(dev.storage.backend, "file");

        let release = parse_settings(Some("settings/release.toml")).unwrap();
        assert_eq!(release.api.backend, "real");
        assert_eq!(release.api.timeout_secs, None);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_settings(Some("settings/does-not-exist.toml")).is_err());
    }
}
