use serde::Deserialize;

/// Optional file-based defaults for the CLI. Every field is optional; CLI
/// flags always win over the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocSyncConfig {
    pub base_url: Option<String>,
    pub pid: Option<String>,
    pub version: Option<String>,
    pub group: Option<String>,
    pub upload_language: Option<String>,
    pub languages: Option<Vec<String>>,
    pub file_pattern: Option<String>,
    pub output_path: Option<String>,
    pub fail_empty: Option<bool>,
    pub insecure: Option<bool>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{0}")]
    Other(String),
}

/// Load and merge configuration files.
/// Search order: CWD/locsync.toml, then <config dir>/locsync/locsync.toml.
/// First found value wins per field; unreadable or invalid files are
/// ignored.
pub fn load_config() -> Result<LocSyncConfig, ConfigError> {
    let mut merged = LocSyncConfig::default();

    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join("locsync.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<LocSyncConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }

    if let Some(base) = dirs::config_dir() {
        let path = base.join("locsync").join("locsync.toml");
        if let Ok(s) = std::fs::read_to_string(&path) {
            if let Ok(cfg) = toml::from_str::<LocSyncConfig>(&s) {
                merged = merge(merged, cfg);
            }
        }
    }

    Ok(merged)
}

fn merge(mut a: LocSyncConfig, b: LocSyncConfig) -> LocSyncConfig {
    if a.base_url.is_none() {
        a.base_url = b.base_url;
    }
    if a.pid.is_none() {
        a.pid = b.pid;
    }
    if a.version.is_none() {
        a.version = b.version;
    }
    if a.group.is_none() {
        a.group = b.group;
    }
    if a.upload_language.is_none() {
        a.upload_language = b.upload_language;
    }
    if a.languages.is_none() {
        a.languages = b.languages;
    }
    if a.file_pattern.is_none() {
        a.file_pattern = b.file_pattern;
    }
    if a.output_path.is_none() {
        a.output_path = b.output_path;
    }
    if a.fail_empty.is_none() {
        a.fail_empty = b.fail_empty;
    }
    if a.insecure.is_none() {
        a.insecure = b.insecure;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_first_found_values() {
        let first = LocSyncConfig {
            pid: Some("PID168".to_string()),
            ..Default::default()
        };
        let second = LocSyncConfig {
            pid: Some("OTHER".to_string()),
            group: Some("LG725".to_string()),
            ..Default::default()
        };

        let merged = merge(first, second);

        assert_eq!(merged.pid.as_deref(), Some("PID168"));
        assert_eq!(merged.group.as_deref(), Some("LG725"));
    }

    #[test]
    fn parses_a_full_config_file() {
        let cfg: LocSyncConfig = toml::from_str(
            r#"
            base_url = "https://loc.example.com"
            pid = "PID168"
            version = "2.0"
            group = "LG725"
            languages = ["de", "fr"]
            fail_empty = true
            "#,
        )
        .unwrap();

        assert_eq!(cfg.base_url.as_deref(), Some("https://loc.example.com"));
        assert_eq!(cfg.languages.as_deref(), Some(&["de".to_string(), "fr".to_string()][..]));
        assert_eq!(cfg.fail_empty, Some(true));
    }
}
